mod helpers;
mod runner;

pub use helpers::*;
pub use runner::{count_pixels, pixel, CaptureSurface, TestRunner, TestRunnerBuilder};
