use std::{panic::Location, sync::Arc};

use parking_lot::Mutex;

use crate::{
    camera::CameraManager,
    canvas::Canvas,
    instruction::{InstructionKind, InstructionStreamPair},
    statistics::FrameStatistics,
    surface::Surface,
    types::{Camera, RenderOptions, RenderOptionsChange, Scene},
    RenderError, RendererInitializationError,
};

pub mod error;
mod ready;
mod render;
mod setup;

/// State only touched while a frame is being rendered.
pub struct RendererData {
    pub canvas: Canvas,
    pub camera: CameraManager,
    pub options: RenderOptions,
}

/// Core software renderer.
///
/// Mutations are recorded and applied at the start of the next call to
/// [`Renderer::render`], so every frame sees a consistent configuration.
pub struct Renderer {
    instructions: InstructionStreamPair,
    data: Mutex<RendererData>,
}
impl Renderer {
    /// Allocates a `width` x `height` canvas and a renderer drawing into it.
    pub fn new(width: u32, height: u32, options: RenderOptions) -> Result<Arc<Self>, RendererInitializationError> {
        setup::create_renderer(width, height, options)
    }

    /// Sets the camera used for the next frame.
    #[track_caller]
    pub fn set_camera_data(&self, data: Camera) {
        self.instructions
            .push(InstructionKind::SetCameraData { data }, *Location::caller())
    }

    /// Overrides the aspect ratio used for the projection. `None` means no
    /// aspect ratio scaling. Resizing resets it to the canvas' aspect ratio.
    #[track_caller]
    pub fn set_aspect_ratio(&self, ratio: Option<f32>) {
        self.instructions
            .push(InstructionKind::SetAspectRatio { ratio }, *Location::caller())
    }

    /// Allocates a new canvas now; it replaces the current one on the next frame.
    #[track_caller]
    pub fn resize(&self, width: u32, height: u32) -> Result<(), RenderError> {
        let canvas = Canvas::new(width, height)?;
        self.instructions
            .push(InstructionKind::Resize { canvas }, *Location::caller());
        Ok(())
    }

    #[track_caller]
    pub fn set_options(&self, change: RenderOptionsChange) {
        self.instructions
            .push(InstructionKind::ChangeOptions { change }, *Location::caller())
    }

    /// Options as of the last rendered frame.
    pub fn options(&self) -> RenderOptions {
        self.data.lock().options.clone()
    }

    /// Camera as of the last rendered frame.
    pub fn camera(&self) -> Camera {
        self.data.lock().camera.get_data()
    }

    /// Canvas size as of the last rendered frame.
    pub fn size(&self) -> (u32, u32) {
        let data = self.data.lock();
        (data.canvas.width(), data.canvas.height())
    }

    /// Gives read access to the canvas holding the last rendered frame.
    pub fn with_canvas<R>(&self, func: impl FnOnce(&Canvas) -> R) -> R {
        func(&self.data.lock().canvas)
    }

    /// Renders `scene` into the canvas and presents it to `surface`.
    ///
    /// Frames never overlap: a call made while another frame is in flight
    /// waits for it to finish.
    pub fn render(&self, scene: &Scene, surface: &mut dyn Surface) -> Result<FrameStatistics, RenderError> {
        render::render(self, scene, surface)
    }
}
