use crate::{
    instruction::{Instruction, InstructionKind, InstructionStreamPair},
    renderer::RendererData,
};

/// Applies every instruction recorded since the last frame, in order.
pub fn ready(instructions: &InstructionStreamPair, data: &mut RendererData) {
    profiling::scope!("Renderer::ready");

    instructions.swap();

    let mut instructions = instructions.consumer.lock();

    for Instruction { kind, location } in instructions.drain(..) {
        log::trace!("Applying {} recorded at {location}", kind.name());
        match kind {
            InstructionKind::SetCameraData { data: camera } => {
                data.camera.set_data(camera);
            }
            InstructionKind::SetAspectRatio { ratio } => {
                data.camera.set_aspect_ratio(ratio);
            }
            InstructionKind::Resize { canvas } => {
                log::debug!(
                    "Resizing canvas from {}x{} to {}x{}",
                    data.canvas.width(),
                    data.canvas.height(),
                    canvas.width(),
                    canvas.height()
                );
                data.camera.set_aspect_ratio(Some(canvas.aspect_ratio()));
                data.canvas = canvas;
            }
            InstructionKind::ChangeOptions { change } => {
                data.options.update_from_changes(change);
                if data.options.handedness != data.camera.handedness() {
                    data.camera.set_handedness(data.options.handedness);
                }
            }
        }
    }
}
