use thiserror::Error;

/// Reason why a surface could not show a frame.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Surface was lost and must be recreated")]
    Lost,
    #[error("Surface expected a {expected_width}x{expected_height} frame but got {width}x{height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },
    #[error("Surface failed to present the frame")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A finished frame, borrowed from the canvas for the duration of a present.
#[derive(Debug, Copy, Clone)]
pub struct FrameView<'a> {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels, top row first.
    pub pixels: &'a [u8],
}

/// Something that can display the color buffer: a window, an image, a test capture.
pub trait Surface {
    fn present(&mut self, frame: FrameView<'_>) -> Result<(), SurfaceError>;
}

/// Surface that discards every frame.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn present(&mut self, _frame: FrameView<'_>) -> Result<(), SurfaceError> {
        Ok(())
    }
}
