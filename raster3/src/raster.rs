//! Rasterizer.
//!
//! Triangles are filled row by row. The three vertices are sorted by row, the
//! long edge (first -> last) and the two short edges (first -> middle -> last)
//! are sampled per row the way [`edge`](crate::interpolation::edge) lays them
//! out, and every attribute (x, depth, color channels) is sampled the same way
//! so step `i` is always row `first + i`.
//!
//! Which side is left is decided once per triangle by comparing the two x
//! boundaries at the middle row. This is exact for ordinary triangles; rows
//! where the boundaries cross produce no pixels.
//!
//! Lines step one pixel at a time along their dominant axis.

use glam::IVec2;

use crate::{
    canvas::Canvas,
    interpolation::{edge_at, linear_at},
    types::Color,
    vertex::ScreenVertex,
};

/// How far from the center lines are stepped, in viewport half-sizes.
pub const GUARD_BAND: f32 = 64.0;

/// Whether a primitive consults and updates the depth buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DepthTest {
    Enabled,
    /// Always visible, the depth buffer is left untouched. Used for overlays.
    Disabled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FragmentColors {
    /// One color shared by every pixel.
    Flat(Color),
    /// One color per pixel, parallel to [`Fragment::coords`].
    Gradient(Vec<Color>),
}

/// The pixels one primitive produced, in center-origin canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub coords: Vec<IVec2>,
    pub colors: FragmentColors,
    /// Index of the source polygon in the frame's polygon table.
    pub polygon: Option<usize>,
}

impl Fragment {
    pub fn with_polygon(mut self, polygon: usize) -> Self {
        self.polygon = Some(polygon);
        self
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Color)> + '_ {
        self.coords.iter().enumerate().map(move |(index, &coord)| {
            let color = match &self.colors {
                FragmentColors::Flat(color) => *color,
                FragmentColors::Gradient(colors) => colors[index],
            };
            (coord, color)
        })
    }
}

/// Fills a triangle with one color.
pub fn fill_polygon_flat(canvas: &mut Canvas, vertices: [ScreenVertex; 3], color: Color, depth_test: DepthTest) -> Fragment {
    profiling::scope!("fill_polygon_flat");

    let mut coords = Vec::new();
    scan_triangle(canvas, vertices, None, depth_test, |coord, _| coords.push(coord));

    Fragment {
        coords,
        colors: FragmentColors::Flat(color),
        polygon: None,
    }
}

/// Fills a triangle, interpolating the vertex colors across it.
pub fn fill_polygon_gradient(
    canvas: &mut Canvas,
    vertices: [ScreenVertex; 3],
    colors: [Color; 3],
    depth_test: DepthTest,
) -> Fragment {
    profiling::scope!("fill_polygon_gradient");

    let mut coords = Vec::new();
    let mut pixel_colors = Vec::new();
    scan_triangle(canvas, vertices, Some(colors), depth_test, |coord, channels| {
        coords.push(coord);
        pixel_colors.push(channels.map_or(colors[0], Color::from_channels));
    });

    Fragment {
        coords,
        colors: FragmentColors::Gradient(pixel_colors),
        polygon: None,
    }
}

/// Draws a segment, one pixel per unit step along the axis with the larger delta.
///
/// Steps further than [`GUARD_BAND`] viewport half-sizes from the center are
/// skipped; every step within it is emitted, on the canvas or not.
pub fn draw_line(canvas: &mut Canvas, vertices: [ScreenVertex; 2], colors: [Color; 2], depth_test: DepthTest) -> Fragment {
    profiling::scope!("draw_line");

    let [mut start, mut end] = vertices;
    let [mut start_color, mut end_color] = colors;

    let x_major = (end.x as i64 - start.x as i64).abs() > (end.y as i64 - start.y as i64).abs();
    let key = |v: &ScreenVertex| if x_major { v.x } else { v.y };
    let other = |v: &ScreenVertex| if x_major { v.y } else { v.x };

    if key(&start) > key(&end) {
        std::mem::swap(&mut start, &mut end);
        std::mem::swap(&mut start_color, &mut end_color);
    }

    let (k0, k1) = (key(&start) as f32, key(&end) as f32);
    let (o0, o1) = (other(&start) as f32, other(&end) as f32);
    let (start_channels, end_channels) = (start_color.channels(), end_color.channels());

    let half_size = if x_major { canvas.width() } else { canvas.height() } / 2;
    let reach = half_size.max(1) as f32 * GUARD_BAND;
    let first = key(&start).max(-reach as i32);
    let last = key(&end).min(reach as i32);

    let mut coords = Vec::new();
    let mut pixel_colors = Vec::new();
    for major in first..=last {
        let step = major as i64 - key(&start) as i64;
        let minor = linear_at(k0, o0, k1, o1, step).floor() as i32;
        let (x, y) = if x_major { (major, minor) } else { (minor, major) };

        let depth = linear_at(k0, start.depth, k1, end.depth, step);
        if depth_test == DepthTest::Enabled && !canvas.update_nearest_z(x, y, depth) {
            continue;
        }

        coords.push(IVec2::new(x, y));
        pixel_colors.push(Color::from_channels(std::array::from_fn(|k| {
            linear_at(k0, start_channels[k], k1, end_channels[k], step)
        })));
    }

    Fragment {
        coords,
        colors: FragmentColors::Gradient(pixel_colors),
        polygon: None,
    }
}

/// Walks every covered pixel of a triangle, calling `emit` for each one that
/// passes the depth test with its interpolated `[r, g, b, a]` if `colors` is given.
///
/// Only rows and columns inside the canvas are sampled, so a triangle with a
/// vertex far off screen costs no more than one covering the canvas.
fn scan_triangle(
    canvas: &mut Canvas,
    vertices: [ScreenVertex; 3],
    colors: Option<[Color; 3]>,
    depth_test: DepthTest,
    mut emit: impl FnMut(IVec2, Option<[f32; 4]>),
) {
    // Stable, so vertices on the same row keep their input order.
    let mut order = [0, 1, 2];
    order.sort_by_key(|&index| vertices[index].y);
    let [a, b, c] = order.map(|index| vertices[index]);

    let rows = [a.y as f32, b.y as f32, c.y as f32];
    let xs = [a.x as f32, b.x as f32, c.x as f32];
    let zs = [a.depth, b.depth, c.depth];
    let channels = colors.map(|colors| {
        let sorted = order.map(|index| colors[index].channels());
        std::array::from_fn::<[f32; 3], 4, _>(|k| sorted.map(|channels| channels[k]))
    });

    let mid = (c.y as i64 - a.y as i64 + 1) / 2;
    let (long_mid, short_mid) = edge_at(rows, xs, mid);
    let long_is_left = long_mid < short_mid;
    let sides = |(long, short): (f32, f32)| if long_is_left { (long, short) } else { (short, long) };

    let bounds = canvas.bounds();
    for y in a.y.max(bounds.min_y)..=c.y.min(bounds.max_y) {
        let row = y as i64 - a.y as i64;
        let (left, right) = sides(edge_at(rows, xs, row));
        let (left, right) = (left.floor(), right.floor());
        if left > right {
            continue;
        }

        let (z_left, z_right) = sides(edge_at(rows, zs, row));
        let row_channels: Option<[(f32, f32); 4]> =
            channels.map(|channels| channels.map(|values| sides(edge_at(rows, values, row))));

        let first_column = left as i32;
        for x in first_column.max(bounds.min_x)..=(right as i32).min(bounds.max_x) {
            let column = x as i64 - first_column as i64;

            let depth = linear_at(left, z_left, right, z_right, column);
            if depth_test == DepthTest::Enabled && !canvas.update_nearest_z(x, y, depth) {
                continue;
            }

            let color = row_channels.map(|channels| channels.map(|(l, r)| linear_at(left, l, right, r, column)));
            emit(IVec2::new(x, y), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::interpolation::edge;

    fn v(x: i32, y: i32, depth: f32) -> ScreenVertex {
        ScreenVertex::new(x, y, depth)
    }

    fn canvas() -> Canvas {
        Canvas::new(32, 32).unwrap()
    }

    fn coord_set(fragment: &Fragment) -> HashSet<(i32, i32)> {
        let set: HashSet<_> = fragment.coords.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(set.len(), fragment.len(), "duplicate pixels");
        set
    }

    #[test]
    fn right_triangle_exact_coverage() {
        let mut canvas = canvas();
        let fragment = fill_polygon_flat(
            &mut canvas,
            [v(0, 0, 0.5), v(4, 0, 0.5), v(0, 4, 0.5)],
            Color::RED,
            DepthTest::Disabled,
        );

        let expected: HashSet<_> = (0..=4).flat_map(|y| (0..=4 - y).map(move |x| (x, y))).collect();
        assert_eq!(fragment.len(), 15);
        assert_eq!(coord_set(&fragment), expected);
        assert_eq!(fragment.colors, FragmentColors::Flat(Color::RED));
        assert_eq!(fragment.polygon, None);
    }

    #[test]
    fn coverage_matches_edge_bounds() {
        let mut canvas = canvas();
        let vertices = [v(-6, -5, 0.1), v(7, 1, 0.2), v(-1, 9, 0.3)];
        let fragment = fill_polygon_flat(&mut canvas, vertices, Color::WHITE, DepthTest::Disabled);

        let pair = edge([-5.0, 1.0, 9.0], [-6.0, 7.0, -1.0]);
        let mut expected = HashSet::new();
        for (row, (long, short)) in pair.long.iter().zip(&pair.short).enumerate() {
            let (left, right) = (long.min(*short).floor() as i32, long.max(*short).floor() as i32);
            for x in left..=right {
                expected.insert((x, -5 + row as i32));
            }
        }
        assert_eq!(coord_set(&fragment), expected);
    }

    #[test]
    fn vertex_order_does_not_change_coverage() {
        let vertices = [v(-6, -5, 0.1), v(7, 1, 0.2), v(-1, 9, 0.3)];
        let reference = coord_set(&fill_polygon_flat(&mut canvas(), vertices, Color::WHITE, DepthTest::Disabled));
        for permutation in [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            let permuted = permutation.map(|i| vertices[i]);
            let fragment = fill_polygon_flat(&mut canvas(), permuted, Color::WHITE, DepthTest::Disabled);
            assert_eq!(coord_set(&fragment), reference);
        }
    }

    #[test]
    fn gradient_hits_vertex_colors() {
        let mut canvas = canvas();
        let fragment = fill_polygon_gradient(
            &mut canvas,
            [v(0, 0, 0.5), v(4, 0, 0.5), v(0, 4, 0.5)],
            [Color::RED, Color::GREEN, Color::BLUE],
            DepthTest::Disabled,
        );

        let colors: Vec<_> = fragment.iter().collect();
        let at = |x, y| colors.iter().find(|(c, _)| *c == IVec2::new(x, y)).map(|(_, color)| *color);
        assert_eq!(at(0, 0), Some(Color::RED));
        assert_eq!(at(4, 0), Some(Color::GREEN));
        assert_eq!(at(0, 4), Some(Color::BLUE));
        assert_eq!(at(2, 0), Some(Color::rgb(128, 128, 0)));
    }

    #[test]
    fn depth_test_rejects_equal_and_farther() {
        let mut canvas = canvas();
        let near = [v(-4, -4, 0.2), v(4, -4, 0.2), v(0, 4, 0.2)];
        let far = [v(-4, -4, 0.6), v(4, -4, 0.6), v(0, 4, 0.6)];

        let first = fill_polygon_flat(&mut canvas, near, Color::RED, DepthTest::Enabled);
        assert!(!first.is_empty());
        assert!(fill_polygon_flat(&mut canvas, near, Color::RED, DepthTest::Enabled).is_empty());
        assert!(fill_polygon_flat(&mut canvas, far, Color::GREEN, DepthTest::Enabled).is_empty());

        let overlay = fill_polygon_flat(&mut canvas, far, Color::GREEN, DepthTest::Disabled);
        assert_eq!(overlay.len(), first.len());
        assert_eq!(canvas.depth(0, 0), Some(0.2));
    }

    #[test]
    fn depth_is_interpolated() {
        let mut canvas = canvas();
        fill_polygon_flat(
            &mut canvas,
            [v(0, 0, 0.0), v(8, 0, 0.8), v(0, 8, 0.0)],
            Color::WHITE,
            DepthTest::Enabled,
        );
        assert_eq!(canvas.depth(0, 0), Some(0.0));
        assert!((canvas.depth(4, 0).unwrap() - 0.4).abs() < 1e-6);
        assert!((canvas.depth(4, 2).unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn triangle_is_scissored_to_canvas() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        let fragment = fill_polygon_flat(
            &mut canvas,
            [v(-100, -100, 0.5), v(100, -100, 0.5), v(0, 100, 0.5)],
            Color::WHITE,
            DepthTest::Disabled,
        );
        let bounds = canvas.bounds();
        assert!(fragment.coords.iter().all(|c| bounds.contains(c.x, c.y)));
        assert_eq!(fragment.len(), 64);
    }

    #[test]
    fn far_vertex_only_samples_visible_rows() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        let fragment = fill_polygon_flat(
            &mut canvas,
            [v(-4, -4, 0.5), v(3, -4, 0.5), v(3200, 160, 0.5)],
            Color::WHITE,
            DepthTest::Enabled,
        );

        // The second row already starts right of the canvas.
        let expected: HashSet<_> = (-4..=3).map(|x| (x, -4)).collect();
        assert_eq!(coord_set(&fragment), expected);
    }

    #[test]
    fn extreme_vertices_stay_on_canvas() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        let fragment = fill_polygon_flat(
            &mut canvas,
            [v(i32::MIN, i32::MIN, 0.5), v(i32::MAX, i32::MIN, 0.5), v(0, i32::MAX, 0.5)],
            Color::WHITE,
            DepthTest::Disabled,
        );
        let bounds = canvas.bounds();
        assert!(fragment.coords.iter().all(|c| bounds.contains(c.x, c.y)));
    }

    #[test]
    fn far_line_is_cut_at_guard_band() {
        let fragment = draw_line(
            &mut Canvas::new(8, 8).unwrap(),
            [v(0, 0, 0.5), v(1_000_000_000, 0, 0.5)],
            [Color::WHITE; 2],
            DepthTest::Disabled,
        );
        // 4 half-width pixels times the band.
        assert_eq!(fragment.len(), 257);
        assert_eq!(fragment.coords.last(), Some(&IVec2::new(256, 0)));
    }

    #[test]
    fn line_one_fragment_per_step() {
        let cases = [
            ((0, 0), (5, 2), 6),
            ((5, 2), (0, 0), 6),
            ((3, 1), (-4, -6), 8),
            ((0, 0), (0, -4), 5),
            ((2, 2), (2, 2), 1),
            ((-3, 3), (3, -3), 7),
        ];
        for ((x0, y0), (x1, y1), count) in cases {
            let fragment = draw_line(
                &mut canvas(),
                [v(x0, y0, 0.5), v(x1, y1, 0.5)],
                [Color::WHITE; 2],
                DepthTest::Disabled,
            );
            assert_eq!(fragment.len(), count, "{x0},{y0} -> {x1},{y1}");
            assert!(fragment.coords.contains(&IVec2::new(x0, y0)));
            assert!(fragment.coords.contains(&IVec2::new(x1, y1)));
        }
    }

    #[test]
    fn line_depth_test_is_optional() {
        let mut canvas = canvas();
        let vertices = [v(-5, 0, 0.5), v(5, 3, 0.5)];
        assert_eq!(draw_line(&mut canvas, vertices, [Color::RED; 2], DepthTest::Enabled).len(), 11);
        assert!(draw_line(&mut canvas, vertices, [Color::RED; 2], DepthTest::Enabled).is_empty());
        assert_eq!(draw_line(&mut canvas, vertices, [Color::RED; 2], DepthTest::Disabled).len(), 11);
    }

    #[test]
    fn line_gradient_endpoints() {
        let fragment = draw_line(
            &mut canvas(),
            [v(4, 0, 0.5), v(0, 0, 0.5)],
            [Color::RED, Color::BLUE],
            DepthTest::Disabled,
        );
        let colors: Vec<_> = fragment.iter().collect();
        assert_eq!(colors.first(), Some(&(IVec2::new(0, 0), Color::BLUE)));
        assert_eq!(colors.last(), Some(&(IVec2::new(4, 0), Color::RED)));
    }
}
