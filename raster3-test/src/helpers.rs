use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use raster3::types::{Color, Model, ModelBuilder, Polygon};

/// Counter-clockwise triangle in the XY plane spanning [-0.5, 0.5].
pub fn triangle(colors: [Color; 3]) -> Result<Arc<Model>> {
    let model = ModelBuilder::new(vec![
        Vec3::new(0.5, -0.5, 0.0),
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::new(-0.5, -0.5, 0.0),
    ])
    .with_polygon(Polygon::with_colors([0, 1, 2], colors))
    .build()
    .context("Failed to build triangle")?;
    Ok(Arc::new(model))
}

/// Square in the XY plane spanning [-1, 1], facing +Z.
pub fn quad(color: Color) -> Result<Arc<Model>> {
    let model = ModelBuilder::new(vec![
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ])
    .with_polygons([Polygon::new([0, 1, 2], color), Polygon::new([0, 2, 3], color)])
    .build()
    .context("Failed to build quad")?;
    Ok(Arc::new(model))
}

/// Vertex quads of each cube face, counter-clockwise seen from outside.
/// Faces are ordered +X, -X, +Y, -Y, +Z, -Z.
const CUBE_FACES: [[u32; 4]; 6] = [
    [1, 3, 7, 5],
    [0, 4, 6, 2],
    [2, 6, 7, 3],
    [0, 1, 5, 4],
    [4, 5, 7, 6],
    [0, 2, 3, 1],
];

/// Unit cube centered at the origin.
///
/// Every face is split into two triangles, 12 in total, ordered like
/// [`CUBE_FACES`]. `color` is called with the triangle index.
pub fn cube(color: impl Fn(usize) -> Color) -> Result<Arc<Model>> {
    // Bit 0 is +x, bit 1 is +y, bit 2 is +z.
    let vertices = (0..8)
        .map(|corner: u32| {
            let axis = |bit: u32| if corner & (1 << bit) != 0 { 0.5 } else { -0.5 };
            Vec3::new(axis(0), axis(1), axis(2))
        })
        .collect();

    let polygons = CUBE_FACES.iter().enumerate().flat_map(|(face, &[a, b, c, d])| {
        [
            Polygon::new([a, b, c], color(face * 2)),
            Polygon::new([a, c, d], color(face * 2 + 1)),
        ]
    });

    let model = ModelBuilder::new(vertices)
        .with_polygons(polygons)
        .build()
        .context("Failed to build cube")?;
    Ok(Arc::new(model))
}
