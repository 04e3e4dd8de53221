//! Orbit camera driven by pointer input.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};

use crate::types::{Camera, CameraProjection, Handedness};

/// Largest elevation, kept short of the poles so the up vector stays valid.
pub const MAX_ELEVATION: f32 = FRAC_PI_2 - 0.01;

/// Pointer input in window pixels, +y down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    DragStart { position: Vec2 },
    DragMove { position: Vec2 },
    DragEnd,
    /// Positive zooms out.
    Wheel { delta: f32 },
}

/// Camera orbiting a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    distance: f32,
    /// Angle around +Y in radians, zero looks down -Z.
    azimuth: f32,
    elevation: f32,
    /// Radians per pixel dragged.
    pub rotate_speed: f32,
    /// Exponential zoom per wheel unit.
    pub zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    drag: Option<Vec2>,
}

impl OrbitControls {
    pub fn new(target: Vec3, distance: f32) -> Self {
        let mut controls = Self {
            target,
            distance,
            azimuth: 0.0,
            elevation: 0.0,
            rotate_speed: 0.01,
            zoom_speed: 0.1,
            min_distance: 0.1,
            max_distance: 1000.0,
            drag: None,
        };
        controls.distance = controls.clamp_distance(distance);
        controls
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Sets the orbit angles, wrapping the azimuth and clamping the elevation.
    pub fn set_angles(&mut self, azimuth: f32, elevation: f32) {
        self.azimuth = azimuth.rem_euclid(TAU);
        self.elevation = elevation.clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = self.clamp_distance(distance);
    }

    pub fn distance_limits(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    /// Sets the zoom range in either order and re-clamps the current distance.
    /// A NaN bound is replaced by the other one.
    pub fn set_distance_limits(&mut self, a: f32, b: f32) {
        self.min_distance = a.min(b);
        self.max_distance = a.max(b);
        self.distance = self.clamp_distance(self.distance);
    }

    // Unlike `f32::clamp` this never panics; a NaN distance ends up at the minimum.
    fn clamp_distance(&self, distance: f32) -> f32 {
        distance.max(self.min_distance).min(self.max_distance)
    }

    /// Applies one input event. Returns true if the camera moved.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::DragStart { position } => {
                self.drag = Some(position);
                false
            }
            InputEvent::DragMove { position } => {
                let Some(last) = self.drag.replace(position) else {
                    return false;
                };
                let delta = position - last;
                if delta == Vec2::ZERO {
                    return false;
                }
                let before = (self.azimuth, self.elevation);
                // Dragging right swings the camera left around the target, dragging down raises it.
                self.set_angles(
                    self.azimuth - delta.x * self.rotate_speed,
                    self.elevation + delta.y * self.rotate_speed,
                );
                before != (self.azimuth, self.elevation)
            }
            InputEvent::DragEnd => {
                self.drag = None;
                false
            }
            InputEvent::Wheel { delta } => {
                let before = self.distance;
                self.set_distance(self.distance * (delta * self.zoom_speed).exp());
                before != self.distance
            }
        }
    }

    /// World space position of the camera.
    pub fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target + self.distance * Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }

    pub fn camera(&self, projection: CameraProjection, handedness: Handedness) -> Camera {
        Camera::look_at(self.eye(), self.target, Vec3::Y, projection, handedness)
    }
}
