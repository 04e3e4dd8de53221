//! Coalesces camera input into at most one frame per tick.
//!
//! Input callbacks never render directly. They push messages through a
//! [`CameraEventSender`], and the owner of the [`RenderScheduler`] calls
//! [`RenderScheduler::tick`] once per animation tick.

use crate::{
    controls::{InputEvent, OrbitControls},
    statistics::FrameStatistics,
    surface::Surface,
    types::{CameraProjection, Handedness, Scene},
    RenderError, Renderer,
};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScheduleMessage {
    Input(InputEvent),
    /// Render on the next tick even if the camera did not move.
    Redraw,
}

/// Cloneable handle used by event callbacks to reach a [`RenderScheduler`].
#[derive(Debug, Clone)]
pub struct CameraEventSender {
    sender: flume::Sender<ScheduleMessage>,
}

impl CameraEventSender {
    /// Returns false if the scheduler is gone.
    pub fn send_input(&self, event: InputEvent) -> bool {
        self.sender.send(ScheduleMessage::Input(event)).is_ok()
    }

    /// Returns false if the scheduler is gone.
    pub fn request_redraw(&self) -> bool {
        self.sender.send(ScheduleMessage::Redraw).is_ok()
    }
}

pub struct RenderScheduler {
    controls: OrbitControls,
    projection: CameraProjection,
    handedness: Handedness,
    sender: flume::Sender<ScheduleMessage>,
    receiver: flume::Receiver<ScheduleMessage>,
    dirty: bool,
    frames: u64,
    total: FrameStatistics,
}

impl RenderScheduler {
    /// The first tick always renders.
    pub fn new(controls: OrbitControls, projection: CameraProjection, handedness: Handedness) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            controls,
            projection,
            handedness,
            sender,
            receiver,
            dirty: true,
            frames: 0,
            total: FrameStatistics::default(),
        }
    }

    pub fn sender(&self) -> CameraEventSender {
        CameraEventSender {
            sender: self.sender.clone(),
        }
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn set_projection(&mut self, projection: CameraProjection) {
        self.projection = projection;
        self.dirty = true;
    }

    pub fn set_handedness(&mut self, handedness: Handedness) {
        self.handedness = handedness;
        self.dirty = true;
    }

    /// True if the next tick will render.
    pub fn is_dirty(&self) -> bool {
        self.dirty || !self.receiver.is_empty()
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Sum of the statistics of every frame rendered so far.
    pub fn total(&self) -> FrameStatistics {
        self.total
    }

    /// Applies every pending message in order, then renders one frame with
    /// the resulting camera if anything changed.
    ///
    /// A failed frame is retried on the next tick.
    pub fn tick(
        &mut self,
        renderer: &Renderer,
        scene: &Scene,
        surface: &mut dyn Surface,
    ) -> Result<Option<FrameStatistics>, RenderError> {
        profiling::scope!("RenderScheduler::tick");

        let mut messages = 0_usize;
        for message in self.receiver.try_iter() {
            messages += 1;
            self.dirty |= match message {
                ScheduleMessage::Input(event) => self.controls.handle(event),
                ScheduleMessage::Redraw => true,
            };
        }

        if !self.dirty {
            return Ok(None);
        }

        log::trace!("Rendering after {messages} messages");

        renderer.set_camera_data(self.controls.camera(self.projection, self.handedness));
        let stats = renderer.render(scene, surface).map_err(|err| {
            log::warn!("Frame failed, retrying next tick: {err}");
            err
        })?;

        self.dirty = false;
        self.frames += 1;
        self.total += stats;

        Ok(Some(stats))
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::{surface::NullSurface, types::RenderOptions};

    #[test]
    fn renders_once_per_tick() {
        let renderer = Renderer::new(8, 8, RenderOptions::default()).unwrap();
        let scene = Scene::new();
        let mut scheduler = RenderScheduler::new(
            OrbitControls::new(Vec3::ZERO, 5.0),
            CameraProjection::default(),
            Handedness::Right,
        );

        assert!(scheduler.tick(&renderer, &scene, &mut NullSurface).unwrap().is_some());
        assert!(scheduler.tick(&renderer, &scene, &mut NullSurface).unwrap().is_none());

        let sender = scheduler.sender();
        sender.send_input(InputEvent::DragStart { position: Vec2::ZERO });
        for step in 1..=10 {
            sender.send_input(InputEvent::DragMove {
                position: Vec2::new(step as f32, 0.0),
            });
        }
        sender.send_input(InputEvent::DragEnd);
        assert!(scheduler.is_dirty());

        assert!(scheduler.tick(&renderer, &scene, &mut NullSurface).unwrap().is_some());
        assert_eq!(scheduler.frames(), 2);
        assert!((scheduler.controls().azimuth() - (std::f32::consts::TAU - 0.1)).abs() < 1e-4);

        // The renderer holds the camera the scheduler last computed.
        let eye = scheduler.controls().eye();
        let view = renderer.camera().view;
        assert!(view.transform_point3(eye).length() < 1e-4);
    }

    #[test]
    fn input_that_changes_nothing_does_not_render() {
        let renderer = Renderer::new(8, 8, RenderOptions::default()).unwrap();
        let scene = Scene::new();
        let mut scheduler = RenderScheduler::new(
            OrbitControls::new(Vec3::ZERO, 5.0),
            CameraProjection::default(),
            Handedness::Right,
        );
        scheduler.tick(&renderer, &scene, &mut NullSurface).unwrap();

        let sender = scheduler.sender();
        sender.send_input(InputEvent::DragStart { position: Vec2::ONE });
        sender.send_input(InputEvent::DragMove { position: Vec2::ONE });
        sender.send_input(InputEvent::DragEnd);
        assert!(scheduler.tick(&renderer, &scene, &mut NullSurface).unwrap().is_none());

        assert!(sender.request_redraw());
        assert!(scheduler.tick(&renderer, &scene, &mut NullSurface).unwrap().is_some());
        assert_eq!(scheduler.frames(), 2);
    }
}
