use glam::Vec3;
use thiserror::Error;

use crate::{Color, Handedness};

/// Error returned from model validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelValidationError {
    #[error("Primitive {primitive} references vertex {value} which is out of bounds for a model of {max} vertices")]
    IndexOutOfBounds { primitive: usize, value: u32, max: usize },
    #[error("Polygon {primitive} uses the same vertex more than once: {indices:?}")]
    DegeneratePolygon { primitive: usize, indices: [u32; 3] },
    #[error("Vertex {index} has a non-finite position {position:?}")]
    NonFiniteVertex { index: usize, position: Vec3 },
    #[error("Polygon {primitive} has a non-finite vertex normal")]
    NonFiniteNormal { primitive: usize },
}

/// A triangle referencing three vertices of its [`Model`].
///
/// Winding order matters: it decides which side of the polygon is the front.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub indices: [u32; 3],
    pub colors: [Color; 3],
    /// Optional per-vertex normals in object space.
    pub normals: Option<[Vec3; 3]>,
}

impl Polygon {
    /// Polygon with the same color on every vertex.
    pub fn new(indices: [u32; 3], color: Color) -> Self {
        Self::with_colors(indices, [color; 3])
    }

    pub fn with_colors(indices: [u32; 3], colors: [Color; 3]) -> Self {
        Self {
            indices,
            colors,
            normals: None,
        }
    }

    pub fn with_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Swaps the winding order, keeping every vertex paired with its color and normal.
    pub fn flip_winding_order(&mut self) {
        self.indices.swap(1, 2);
        self.colors.swap(1, 2);
        if let Some(normals) = &mut self.normals {
            normals.swap(1, 2);
        }
    }
}

/// A segment between two vertices of its [`Model`].
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub indices: [u32; 2],
    pub colors: [Color; 2],
}

impl Line {
    pub fn new(indices: [u32; 2], color: Color) -> Self {
        Self {
            indices,
            colors: [color; 2],
        }
    }

    pub fn with_colors(indices: [u32; 2], colors: [Color; 2]) -> Self {
        Self { indices, colors }
    }
}

/// Anything a model can be built out of.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Polygon(Polygon),
    Line(Line),
}

impl Primitive {
    pub fn indices(&self) -> &[u32] {
        match self {
            Self::Polygon(polygon) => &polygon.indices,
            Self::Line(line) => &line.indices,
        }
    }
}

impl From<Polygon> for Primitive {
    fn from(polygon: Polygon) -> Self {
        Self::Polygon(polygon)
    }
}

impl From<Line> for Primitive {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

/// Easy to use builder for a [`Model`] that validates it on the way out.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    vertices: Vec<Vec3>,
    primitives: Vec<Primitive>,
    handedness: Handedness,
    flip_winding_order: bool,
}

impl ModelBuilder {
    /// Create a new [`ModelBuilder`] with a given set of object space positions.
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    pub fn with_polygon(mut self, polygon: Polygon) -> Self {
        self.primitives.push(Primitive::Polygon(polygon));
        self
    }

    pub fn with_polygons(mut self, polygons: impl IntoIterator<Item = Polygon>) -> Self {
        self.primitives.extend(polygons.into_iter().map(Primitive::Polygon));
        self
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.primitives.push(Primitive::Line(line));
        self
    }

    pub fn with_lines(mut self, lines: impl IntoIterator<Item = Line>) -> Self {
        self.primitives.extend(lines.into_iter().map(Primitive::Line));
        self
    }

    /// Winding the polygons were authored in. Built models are always stored
    /// right handed (counter-clockwise front faces), so left handed polygons
    /// are flipped by [`build`](Self::build).
    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    /// Flip the winding order of every polygon, turning them inside out.
    pub fn with_flip_winding_order(mut self) -> Self {
        self.flip_winding_order = true;
        self
    }

    pub fn build(self) -> Result<Model, ModelValidationError> {
        let mut model = Model {
            vertices: self.vertices,
            primitives: self.primitives,
        };

        model.validate()?;

        // Two flips cancel out.
        if self.flip_winding_order != (self.handedness == Handedness::Left) {
            for primitive in &mut model.primitives {
                if let Primitive::Polygon(polygon) = primitive {
                    polygon.flip_winding_order();
                }
            }
        }

        Ok(model)
    }
}

/// Vertices plus the primitives built out of them. Shared by every
/// [`Instance`](crate::Instance) that draws it.
///
/// Every primitive index is a valid index into the vertex list; this is
/// checked by [`ModelBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    vertices: Vec<Vec3>,
    primitives: Vec<Primitive>,
}

impl Model {
    pub fn builder(vertices: Vec<Vec3>) -> ModelBuilder {
        ModelBuilder::new(vertices)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Polygon(polygon) => Some(polygon),
            Primitive::Line(_) => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Line(line) => Some(line),
            Primitive::Polygon(_) => None,
        })
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        if let Some((index, &position)) = self.vertices.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ModelValidationError::NonFiniteVertex { index, position });
        }

        let max = self.vertices.len();
        for (primitive_index, primitive) in self.primitives.iter().enumerate() {
            if let Some(&value) = primitive.indices().iter().find(|&&i| i as usize >= max) {
                return Err(ModelValidationError::IndexOutOfBounds {
                    primitive: primitive_index,
                    value,
                    max,
                });
            }

            if let Primitive::Polygon(polygon) = primitive {
                let [a, b, c] = polygon.indices;
                if a == b || b == c || a == c {
                    return Err(ModelValidationError::DegeneratePolygon {
                        primitive: primitive_index,
                        indices: polygon.indices,
                    });
                }
                if let Some(normals) = &polygon.normals {
                    if normals.iter().any(|n| !n.is_finite()) {
                        return Err(ModelValidationError::NonFiniteNormal {
                            primitive: primitive_index,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
