//! Color and depth buffers.
//!
//! All coordinates taken by the canvas are center-origin pixels with +y up:
//! `(0, 0)` is the pixel just right of and just above the center of the canvas.

use thiserror::Error;

use crate::{
    surface::{FrameView, Surface, SurfaceError},
    types::Color,
};

/// Reason why a canvas could not be allocated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("Canvas of {width}x{height} pixels has no area")]
    ZeroSize { width: u32, height: u32 },
}

/// Inclusive range of center-origin coordinates that land on the canvas.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ViewportBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl ViewportBounds {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Width x height color buffer plus a parallel depth buffer.
///
/// Depth values only ever decrease between two calls to [`Canvas::clear`].
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    color: Vec<Color>,
    depth: Vec<f32>,
}

impl Canvas {
    /// Allocates a cleared canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::ZeroSize { width, height });
        }

        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            color: vec![Color::TRANSPARENT; len],
            depth: vec![f32::INFINITY; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn bounds(&self) -> ViewportBounds {
        let half_width = (self.width / 2) as i32;
        let half_height = (self.height / 2) as i32;
        ViewportBounds {
            min_x: -half_width,
            max_x: self.width as i32 - 1 - half_width,
            min_y: half_height - self.height as i32,
            max_y: half_height - 1,
        }
    }

    /// Resets every pixel to transparent black and every depth to infinity.
    pub fn clear(&mut self) {
        profiling::scope!("Canvas::clear");
        self.color.fill(Color::TRANSPARENT);
        self.depth.fill(f32::INFINITY);
    }

    /// Maps center-origin coordinates to a row-major buffer offset.
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let column = (self.width / 2) as i64 + x as i64;
        let row = (self.height / 2) as i64 - y as i64 - 1;
        if column < 0 || row < 0 || column >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(row as usize * self.width as usize + column as usize)
    }

    /// Writes a pixel. Coordinates outside the canvas are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(offset) = self.offset(x, y) {
            self.color[offset] = color;
        }
    }

    /// Stores `z` if it is strictly nearer than what the pixel holds.
    ///
    /// Returns true if the caller should draw the pixel. Coordinates outside the
    /// canvas always return false.
    pub fn update_nearest_z(&mut self, x: i32, y: i32, z: f32) -> bool {
        match self.offset(x, y) {
            Some(offset) if z < self.depth[offset] => {
                self.depth[offset] = z;
                true
            }
            _ => false,
        }
    }

    /// Color at center-origin coordinates.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.offset(x, y).map(|offset| self.color[offset])
    }

    /// Depth at center-origin coordinates.
    pub fn depth(&self, x: i32, y: i32) -> Option<f32> {
        self.offset(x, y).map(|offset| self.depth[offset])
    }

    /// Row-major colors, top row first.
    pub fn pixels(&self) -> &[Color] {
        &self.color
    }

    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            width: self.width,
            height: self.height,
            pixels: bytemuck::cast_slice(&self.color),
        }
    }

    /// Hands the color buffer to the surface.
    pub fn present(&self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        profiling::scope!("Canvas::present");
        surface.present(self.frame())
    }
}
