use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    camera::CameraManager,
    canvas::Canvas,
    instruction::InstructionStreamPair,
    renderer::{Renderer, RendererData},
    types::{Camera, RenderOptions},
    RendererInitializationError,
};

pub fn create_renderer(
    width: u32,
    height: u32,
    options: RenderOptions,
) -> Result<Arc<Renderer>, RendererInitializationError> {
    profiling::scope!("create_renderer");

    let canvas = Canvas::new(width, height).map_err(RendererInitializationError::MissingRenderTarget)?;
    let camera = CameraManager::new(Camera::default(), options.handedness, Some(canvas.aspect_ratio()));

    log::debug!("Created {width}x{height} renderer: {options:?}");

    Ok(Arc::new(Renderer {
        instructions: InstructionStreamPair::new(),
        data: Mutex::new(RendererData {
            canvas,
            camera,
            options,
        }),
    }))
}
