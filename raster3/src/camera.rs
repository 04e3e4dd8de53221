use glam::Mat4;

use crate::types::{Camera, CameraProjection, Handedness};

/// Owns the renderer's camera and the projection matrix derived from it.
///
/// The projection depends on the camera, the handedness and the aspect ratio,
/// and is rebuilt whenever one of them changes rather than per vertex.
#[derive(Debug, Clone)]
pub struct CameraManager {
    data: Camera,
    handedness: Handedness,
    aspect_ratio: f32,
    proj: Mat4,
}
impl CameraManager {
    /// `None` for the aspect ratio means no aspect ratio scaling.
    pub fn new(data: Camera, handedness: Handedness, aspect_ratio: Option<f32>) -> Self {
        profiling::scope!("CameraManager::new");

        let mut manager = Self {
            data,
            handedness,
            aspect_ratio: aspect_ratio.unwrap_or(1.0),
            proj: Mat4::IDENTITY,
        };
        manager.rebuild();
        manager
    }

    pub fn set_data(&mut self, data: Camera) {
        self.data = data;
        self.rebuild();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: Option<f32>) {
        self.aspect_ratio = aspect_ratio.unwrap_or(1.0);
        self.rebuild();
    }

    pub fn set_handedness(&mut self, handedness: Handedness) {
        self.handedness = handedness;
        self.rebuild();
    }

    pub fn get_data(&self) -> Camera {
        self.data
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn view(&self) -> Mat4 {
        self.data.view
    }

    pub fn proj(&self) -> Mat4 {
        self.proj
    }

    fn rebuild(&mut self) {
        let Self {
            data,
            handedness,
            aspect_ratio,
            ..
        } = *self;

        self.proj = match (data.projection, handedness) {
            (CameraProjection::Orthographic { size }, handedness) => {
                let half = size * 0.5;
                let ortho = match handedness {
                    Handedness::Left => Mat4::orthographic_lh,
                    Handedness::Right => Mat4::orthographic_rh,
                };
                ortho(-half.x, half.x, -half.y, half.y, -half.z, half.z)
            }
            (CameraProjection::Perspective { vfov, near, far }, Handedness::Left) => {
                Mat4::perspective_lh(vfov.to_radians(), aspect_ratio, near, far)
            }
            (CameraProjection::Perspective { vfov, near, far }, Handedness::Right) => {
                Mat4::perspective_rh(vfov.to_radians(), aspect_ratio, near, far)
            }
            (CameraProjection::Raw(proj), _) => proj,
        };
    }
}
