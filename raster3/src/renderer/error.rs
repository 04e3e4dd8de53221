use thiserror::Error;

use crate::{canvas::CanvasError, surface::SurfaceError};

/// Reason why the renderer failed to initialize.
#[derive(Error, Debug)]
pub enum RendererInitializationError {
    #[error("Failed to allocate the render target")]
    MissingRenderTarget(#[source] CanvasError),
}

/// Reason why a frame or a renderer mutation failed.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to present the frame")]
    Present(#[from] SurfaceError),
    #[error("Invalid canvas")]
    Canvas(#[from] CanvasError),
}
