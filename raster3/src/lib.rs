//! Software 3D renderer.
//!
//! Every frame takes the instances of a [`types::Scene`] through a vertex
//! stage ([`vertex`]), a scanline rasterizer with a depth buffer ([`raster`])
//! and a lighting stage ([`fragment`]) before presenting the [`canvas`] to a
//! [`surface::Surface`].

pub mod camera;
pub mod canvas;
pub mod controls;
pub mod fragment;
mod instruction;
pub mod interpolation;
pub mod raster;
mod renderer;
pub mod scheduler;
pub mod statistics;
pub mod surface;
pub mod vertex;

/// Reexport of the types crate.
pub use raster3_types as types;

pub use canvas::{Canvas, CanvasError};
pub use renderer::{error::*, Renderer};
pub use surface::{FrameView, Surface, SurfaceError};
