//! Vertex shader stage.
//!
//! Takes every vertex of an instance through
//! `object -> world -> view -> ndc -> clip -> screen` and decides which
//! polygons survive back-face culling. Naming follows the pipeline: `ndc` is
//! the projected position before the perspective divide, `clip` is after it.

use arrayvec::ArrayVec;
use glam::{Mat3, Mat4, Vec3};

use crate::{
    camera::CameraManager,
    statistics::FrameStatistics,
    types::{Color, Instance, Primitive},
};

/// A vertex mapped onto the canvas: center-origin pixel coordinates with +y up,
/// plus the depth used for the z-buffer test.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenVertex {
    pub x: i32,
    pub y: i32,
    pub depth: f32,
}

impl ScreenVertex {
    pub const fn new(x: i32, y: i32, depth: f32) -> Self {
        Self { x, y, depth }
    }
}

/// View space data for one retained polygon, valid for the current frame only.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PolygonView {
    /// Index of the polygon in its model's primitive list.
    pub primitive: usize,
    /// Unit normal used for lighting.
    pub normal: Vec3,
    pub center: Vec3,
}

/// A primitive that survived the vertex stage. Vertex indices point into
/// [`VertexOutput::vertices`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenPrimitive {
    Triangle {
        vertices: [u32; 3],
        colors: [Color; 3],
        /// Index into [`VertexOutput::polygons`].
        polygon: usize,
    },
    Segment {
        vertices: [u32; 2],
        colors: [Color; 2],
    },
}

/// Everything the rasterizer needs from one instance.
#[derive(Debug, Clone, Default)]
pub struct VertexOutput {
    pub vertices: Vec<ScreenVertex>,
    pub primitives: Vec<ScreenPrimitive>,
    pub polygons: Vec<PolygonView>,
}

impl VertexOutput {
    pub fn gather<const N: usize>(&self, indices: [u32; N]) -> [ScreenVertex; N] {
        indices.map(|index| self.vertices[index as usize])
    }

    fn push<const N: usize>(&mut self, vertices: [ScreenVertex; N]) -> [u32; N] {
        let base = self.vertices.len() as u32;
        self.vertices.extend(vertices);
        std::array::from_fn(|offset| base + offset as u32)
    }
}

/// Per-frame vertex stage state. Built once per frame from the camera.
#[derive(Debug, Clone)]
pub struct VertexShader {
    view: Mat4,
    proj: Mat4,
    x_scale: f32,
    y_scale: f32,
    view_axis: Vec3,
    backface_culling: bool,
}

impl VertexShader {
    pub fn new(camera: &CameraManager, width: u32, height: u32, backface_culling: bool) -> Self {
        Self {
            view: camera.view(),
            proj: camera.proj(),
            x_scale: width as f32 / 2.0,
            y_scale: height as f32 / 2.0,
            view_axis: camera.handedness().view_axis(),
            backface_culling,
        }
    }

    /// Projects a view space position onto the canvas.
    ///
    /// Returns `None` for positions on or behind the eye plane (`w <= 0`) and
    /// for positions that project to non-finite coordinates. Positions far off
    /// the canvas are kept; the rasterizer clips them.
    pub fn project(&self, view_position: Vec3) -> Option<ScreenVertex> {
        let ndc = self.proj * view_position.extend(1.0);
        if ndc.w <= 0.0 {
            return None;
        }

        let clip = ndc / ndc.w;
        if !clip.is_finite() {
            return None;
        }

        // Float to int casts saturate, so extreme positions land on the i32 limits.
        Some(ScreenVertex {
            x: (clip.x * self.x_scale).floor() as i32,
            y: (clip.y * self.y_scale).floor() as i32,
            depth: clip.z,
        })
    }

    /// A normal exactly perpendicular to the view axis is back facing.
    pub fn is_front_facing(&self, view_normal: Vec3) -> bool {
        view_normal.dot(self.view_axis) > 0.0
    }

    pub fn shade(&self, instance: &Instance, stats: &mut FrameStatistics) -> VertexOutput {
        profiling::scope!("VertexShader::shade");

        let model = &instance.model;
        let world_from_object = instance.transform.matrix();
        let view_from_object = self.view * world_from_object;

        let view_positions: Vec<Vec3> = model
            .vertices()
            .iter()
            .map(|&local| {
                let world = world_from_object * local.extend(1.0);
                (self.view * world).truncate()
            })
            .collect();
        let screen: Vec<Option<ScreenVertex>> = view_positions.iter().map(|&p| self.project(p)).collect();

        let dropped = screen.iter().filter(|vertex| vertex.is_none()).count();
        if dropped != 0 {
            log::trace!("{dropped} vertices could not be projected");
            stats.vertices_dropped += dropped;
        }

        let normal_matrix = Mat3::from_mat4(view_from_object).inverse().transpose();

        let mut output = VertexOutput::default();
        for (index, primitive) in model.primitives().iter().enumerate() {
            match primitive {
                Primitive::Polygon(polygon) => {
                    stats.polygons_submitted += 1;

                    let [a, b, c] = polygon.indices.map(|i| view_positions[i as usize]);
                    let face_normal = (b - a).cross(c - a);

                    if self.backface_culling && !self.is_front_facing(face_normal) {
                        stats.polygons_culled += 1;
                        continue;
                    }

                    let Some(face_normal) = face_normal.try_normalize() else {
                        log::trace!("Polygon {index} has no area");
                        stats.polygons_degenerate += 1;
                        continue;
                    };

                    let Some(vertices) = gather(&screen, polygon.indices) else {
                        log::trace!("Polygon {index} references a vertex that could not be projected");
                        stats.polygons_degenerate += 1;
                        continue;
                    };

                    let normal = polygon
                        .normals
                        .and_then(|normals| normals.map(|n| normal_matrix * n).into_iter().sum::<Vec3>().try_normalize())
                        .unwrap_or(face_normal);

                    let vertices = output.push(vertices);
                    output.polygons.push(PolygonView {
                        primitive: index,
                        normal,
                        center: (a + b + c) / 3.0,
                    });
                    output.primitives.push(ScreenPrimitive::Triangle {
                        vertices,
                        colors: polygon.colors,
                        polygon: output.polygons.len() - 1,
                    });
                }
                // Lines are never culled.
                Primitive::Line(line) => {
                    let Some(vertices) = gather(&screen, line.indices) else {
                        log::trace!("Line {index} references a vertex that could not be projected");
                        continue;
                    };
                    let vertices = output.push(vertices);
                    output.primitives.push(ScreenPrimitive::Segment {
                        vertices,
                        colors: line.colors,
                    });
                }
            }
        }

        output
    }
}

fn gather<const N: usize>(screen: &[Option<ScreenVertex>], indices: [u32; N]) -> Option<[ScreenVertex; N]> {
    let mut vertices = ArrayVec::<ScreenVertex, N>::new();
    for index in indices {
        vertices.push(screen[index as usize]?);
    }
    vertices.into_inner().ok()
}
