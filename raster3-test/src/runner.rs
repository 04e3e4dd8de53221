use std::{fs::create_dir_all, ops::Deref, path::Path, sync::Arc};

use anyhow::{ensure, Context, Result};
use glam::Vec3;
use raster3::{
    statistics::FrameStatistics,
    types::{Camera, CameraProjection, Handedness, RenderOptions, Scene},
    FrameView, Renderer, Surface, SurfaceError,
};

/// Surface that keeps the last presented frame as an image.
#[derive(Debug, Default)]
pub struct CaptureSurface {
    frame: Option<image::RgbaImage>,
    presented: usize,
}

impl CaptureSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&image::RgbaImage> {
        self.frame.as_ref()
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl Surface for CaptureSurface {
    fn present(&mut self, frame: FrameView<'_>) -> Result<(), SurfaceError> {
        let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.pixels.to_vec()).ok_or_else(|| {
            let message = format!(
                "{} bytes is too small for a {}x{} frame",
                frame.pixels.len(),
                frame.width,
                frame.height
            );
            SurfaceError::Other(message.into())
        })?;
        self.frame = Some(image);
        self.presented += 1;
        Ok(())
    }
}

pub struct TestRunnerBuilder {
    size: u32,
    options: RenderOptions,
}

impl TestRunnerBuilder {
    pub fn new() -> Self {
        Self {
            size: 64,
            options: RenderOptions::default(),
        }
    }

    pub fn size(mut self, size: u32) -> Result<Self> {
        ensure!(size % 2 == 0, "Size must be a multiple of 2, is {}", size);
        self.size = size;
        Ok(self)
    }

    pub fn handedness(mut self, handedness: Handedness) -> Self {
        self.options.handedness = handedness;
        self
    }

    pub fn options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<TestRunner> {
        let _ = env_logger::builder().is_test(true).try_init();

        let renderer =
            Renderer::new(self.size, self.size, self.options).context("Renderer initialization failed")?;

        Ok(TestRunner {
            renderer,
            scene: Scene::new(),
            surface: CaptureSurface::new(),
        })
    }
}

impl Default for TestRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A square renderer, a scene to fill and a surface capturing its frames.
pub struct TestRunner {
    pub renderer: Arc<Renderer>,
    pub scene: Scene,
    pub surface: CaptureSurface,
}

impl Deref for TestRunner {
    type Target = Arc<Renderer>;

    fn deref(&self) -> &Self::Target {
        &self.renderer
    }
}

impl TestRunner {
    pub fn builder() -> TestRunnerBuilder {
        TestRunnerBuilder::new()
    }

    /// Points the camera from `eye` at the origin, +Y up.
    pub fn look_at_origin(&self, eye: Vec3, projection: CameraProjection) {
        let handedness = self.renderer.options().handedness;
        self.renderer
            .set_camera_data(Camera::look_at(eye, Vec3::ZERO, Vec3::Y, projection, handedness));
    }

    pub fn render_frame(&mut self) -> Result<(image::RgbaImage, FrameStatistics)> {
        let stats = self
            .renderer
            .render(&self.scene, &mut self.surface)
            .context("Failed to render frame")?;
        let frame = self.surface.last_frame().context("No frame was presented")?.clone();
        Ok((frame, stats))
    }

    /// Saves a frame as a PNG, creating parent directories as needed.
    pub fn save_frame(frame: &image::RgbaImage, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let parent_path = path.parent().context("Path given had no parent")?;
        create_dir_all(parent_path).context("Could not create parent directory")?;
        frame.save(path).context("Could not save image")?;
        Ok(())
    }
}

/// Looks up a pixel by center-origin canvas coordinates (+y up).
pub fn pixel(frame: &image::RgbaImage, x: i32, y: i32) -> Option<[u8; 4]> {
    let column = (frame.width() / 2) as i64 + x as i64;
    let row = (frame.height() / 2) as i64 - y as i64 - 1;
    let column = u32::try_from(column).ok().filter(|&c| c < frame.width())?;
    let row = u32::try_from(row).ok().filter(|&r| r < frame.height())?;
    Some(frame.get_pixel(column, row).0)
}

/// Number of pixels exactly equal to `color`.
pub fn count_pixels(frame: &image::RgbaImage, color: [u8; 4]) -> usize {
    frame.pixels().filter(|pixel| pixel.0 == color).count()
}
