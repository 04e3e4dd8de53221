//! Type declarations for the raster3 software rendering crate.
//!
//! This is reexported in the raster3 crate proper and includes all the "surface"
//! api arguments: models, instances, cameras, lights and render configuration.

use std::{fmt, str::FromStr, sync::Arc};

use bytemuck::{Pod, Zeroable};
/// Reexport of the glam version raster3 is using.
pub use glam;
use glam::{Mat4, Vec3, Vec3A, Vec4};
use thiserror::Error;

mod model;
mod transform;

pub use model::*;
pub use transform::*;

macro_rules! changeable_struct {
    ($(#[$outer:meta])* pub struct $name:ident <- $name_change:ident { $($(#[$inner:meta])* $field_vis:vis $field_name:ident : $field_type:ty),* $(,)? } ) => {
        $(#[$outer])*
        #[derive(Debug, Clone)]
        pub struct $name {
            $(
                $(#[$inner])* $field_vis $field_name : $field_type
            ),*
        }
        impl $name {
            pub fn update_from_changes(&mut self, change: $name_change) {
                $(
                    if let Some(inner) = change.$field_name {
                        self.$field_name = inner;
                    }
                );*
            }
        }
        #[doc = concat!("Describes a modification to a ", stringify!($name), ".")]
        #[derive(Debug, Default, Clone)]
        pub struct $name_change {
            $(
                $field_vis $field_name : Option<$field_type>
            ),*
        }
    };
}

/// Error returned when a configuration string does not name a known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown draw mode {0:?}, expected one of \"wireframe\", \"filled\", \"shaded\" or \"gradient\"")]
    UnknownDrawMode(String),
    #[error("Unknown rotation order {0:?}, expected a permutation of \"XYZ\"")]
    UnknownRotationOrder(String),
}

/// An 8-bit per channel RGBA color, laid out exactly as one pixel of the
/// framebuffer.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// All four channels mapped to `0.0..=1.0`.
    pub fn to_normalized(self) -> Vec4 {
        Vec4::new(self.r as f32, self.g as f32, self.b as f32, self.a as f32) / 255.0
    }

    /// Inverse of [`Color::to_normalized`]. Channels are clamped to `0.0..=1.0`
    /// before being scaled back to `0..=255`.
    pub fn from_normalized(value: Vec4) -> Self {
        let scaled = (value.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
        Self::new(scaled.x as u8, scaled.y as u8, scaled.z as u8, scaled.w as u8)
    }

    /// Channels as `[r, g, b, a]` floats in the `0.0..=255.0` range.
    pub fn channels(self) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, self.a as f32]
    }

    /// Builds a color out of `0.0..=255.0` channel values, rounding and
    /// saturating anything outside the range.
    pub fn from_channels(channels: [f32; 4]) -> Self {
        let [r, g, b, a] = channels.map(|c| c.round().clamp(0.0, 255.0) as u8);
        Self::new(r, g, b, a)
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b, color.a]
    }
}

/// Describes the "Handedness" of a given coordinate system. Affects math done
/// in the space.
///
/// While a weird term, if you make your thumb X, your pointer Y,
/// and your middle finger Z, the handedness can be determined by which hand can
/// contort to represent the coordinate system.
///
/// For example
/// +X right, +Y up, +Z _into_ the screen is left handed.
/// +X right, +Y up, +Z _out of_ the screen is right handed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// The view space axis pointing from the scene back at the viewer.
    ///
    /// A polygon is front facing when its view space normal has a strictly
    /// positive dot product with this axis. Right handed spaces look down -Z so
    /// counter-clockwise polygons face +Z, left handed spaces look down +Z so
    /// clockwise polygons face -Z.
    pub const fn view_axis(self) -> Vec3 {
        match self {
            Self::Left => Vec3::NEG_Z,
            Self::Right => Vec3::Z,
        }
    }
}

impl Default for Handedness {
    fn default() -> Self {
        Self::Right
    }
}

/// How polygons are turned into pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    /// Only the three edges of every polygon.
    Wireframe,
    /// Flat fill using the first vertex color.
    Filled,
    /// Flat fill lit by the ambient light and every point light.
    Shaded,
    /// Per-vertex colors interpolated across the polygon.
    #[default]
    Gradient,
}

impl DrawMode {
    pub const ARRAY: [Self; 4] = [Self::Wireframe, Self::Filled, Self::Shaded, Self::Gradient];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wireframe => "wireframe",
            Self::Filled => "filled",
            Self::Shaded => "shaded",
            Self::Gradient => "gradient",
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ARRAY
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownDrawMode(s.to_owned()))
    }
}

changeable_struct! {
    /// Render configuration owned by one renderer.
    pub struct RenderOptions <- RenderOptionsChange {
        pub draw_mode: DrawMode,
        /// Overlay every polygon's edges, ignoring the depth buffer.
        pub outlines: bool,
        pub backface_culling: bool,
        pub handedness: Handedness,
        pub outline_color: Color,
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            draw_mode: DrawMode::default(),
            outlines: false,
            backface_culling: true,
            handedness: Handedness::default(),
            outline_color: Color::WHITE,
        }
    }
}

changeable_struct! {
    /// A placement of a shared [`Model`] in the world.
    ///
    /// Many instances may reference the same model.
    pub struct Instance <- InstanceChange {
        pub model: Arc<Model>,
        pub transform: Transformation,
    }
}

impl Instance {
    pub fn new(model: Arc<Model>, transform: Transformation) -> Self {
        Self { model, transform }
    }
}

/// Describes how the camera should look at the scene.
#[derive(Debug, Default, Copy, Clone)]
pub struct Camera {
    pub projection: CameraProjection,
    /// View matrix
    pub view: Mat4,
}

impl Camera {
    /// Camera at `eye` looking at `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3, projection: CameraProjection, handedness: Handedness) -> Self {
        let view = match handedness {
            Handedness::Left => Mat4::look_at_lh(eye, target, up),
            Handedness::Right => Mat4::look_at_rh(eye, target, up),
        };
        Self { projection, view }
    }
}

/// Describes how the world should be projected into the camera.
///
/// Every projection maps the visible depth range to `0.0..=1.0` with smaller
/// values being nearer the camera.
#[derive(Debug, Copy, Clone)]
pub enum CameraProjection {
    Orthographic {
        /// Size assumes the location is at the center of the camera area.
        size: Vec3A,
    },
    Perspective {
        /// Vertical field of view in degrees.
        vfov: f32,
        /// Near plane distance.
        near: f32,
        /// Far plane distance.
        far: f32,
    },
    Raw(Mat4),
}

impl Default for CameraProjection {
    fn default() -> Self {
        Self::Perspective {
            vfov: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Light applied uniformly to every fragment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

changeable_struct! {
    /// Omnidirectional light with distance attenuation.
    pub struct PointLight <- PointLightChange {
        /// World space position.
        pub position: Vec3,
        pub color: Color,
        /// Constant multiplier for the light.
        pub intensity: f32,
        pub constant: f32,
        pub linear: f32,
        pub quadratic: f32,
    }
}

impl PointLight {
    pub fn new(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }

    /// `1 / (constant + linear * d + quadratic * d^2)`
    pub fn attenuation(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// Everything rendered in a frame.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub instances: Vec<Instance>,
    pub ambient: AmbientLight,
    pub point_lights: Vec<PointLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instance, returning its index.
    pub fn add_instance(&mut self, instance: Instance) -> usize {
        self.instances.push(instance);
        self.instances.len() - 1
    }

    /// Applies `change` to the instance at `index`. Returns false if there is no such instance.
    pub fn change_instance(&mut self, index: usize, change: InstanceChange) -> bool {
        match self.instances.get_mut(index) {
            Some(instance) => {
                instance.update_from_changes(change);
                true
            }
            None => false,
        }
    }

    pub fn add_point_light(&mut self, light: PointLight) -> usize {
        self.point_lights.push(light);
        self.point_lights.len() - 1
    }
}
