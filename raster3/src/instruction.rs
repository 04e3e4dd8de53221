use std::{mem, panic::Location};

use parking_lot::Mutex;

use crate::{
    canvas::Canvas,
    types::{Camera, RenderOptionsChange},
};

pub enum InstructionKind {
    SetCameraData { data: Camera },
    SetAspectRatio { ratio: Option<f32> },
    /// The canvas is allocated by the caller so allocation failures surface at the call.
    Resize { canvas: Canvas },
    ChangeOptions { change: RenderOptionsChange },
}

impl InstructionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetCameraData { .. } => "SetCameraData",
            Self::SetAspectRatio { .. } => "SetAspectRatio",
            Self::Resize { .. } => "Resize",
            Self::ChangeOptions { .. } => "ChangeOptions",
        }
    }
}

pub struct Instruction {
    pub kind: InstructionKind,
    /// Call site that recorded the instruction.
    pub location: Location<'static>,
}

/// Double buffered instruction queue. Callers push onto the producer while a
/// frame drains the consumer.
pub struct InstructionStreamPair {
    pub producer: Mutex<Vec<Instruction>>,
    pub consumer: Mutex<Vec<Instruction>>,
}
impl InstructionStreamPair {
    pub fn new() -> Self {
        Self {
            producer: Mutex::new(Vec::new()),
            consumer: Mutex::new(Vec::new()),
        }
    }

    pub fn swap(&self) {
        let mut produce = self.producer.lock();
        let mut consume = self.consumer.lock();

        mem::swap(&mut *produce, &mut *consume);
    }

    pub fn push(&self, kind: InstructionKind, location: Location<'static>) {
        self.producer.lock().push(Instruction { kind, location })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_hands_over_pending_instructions() {
        let stream = InstructionStreamPair::new();
        stream.push(InstructionKind::SetAspectRatio { ratio: Some(2.0) }, *Location::caller());
        stream.push(
            InstructionKind::ChangeOptions {
                change: RenderOptionsChange::default(),
            },
            *Location::caller(),
        );
        assert!(stream.consumer.lock().is_empty());

        stream.swap();

        let names: Vec<_> = stream.consumer.lock().iter().map(|i| i.kind.name()).collect();
        assert_eq!(names, ["SetAspectRatio", "ChangeOptions"]);
        assert!(stream.producer.lock().is_empty());
    }
}
