//! Scanline interpolation.
//!
//! Every per-row and per-column attribute (x, depth, color channels) is
//! produced by [`linear`] keyed on the same parameter, so samples at the same
//! index always belong to the same row or column.

/// Samples the line through `(x_a, y_a)` and `(x_b, y_b)` at every integer
/// step of x from `x_a` to `x_b` inclusive.
///
/// The result has `floor(x_b) - floor(x_a) + 1` samples, the first being
/// `y_a`. When `x_a == x_b` the result is `[y_a]`. Endpoints must be sorted
/// (`x_a <= x_b`); reversed endpoints produce no samples.
pub fn linear(x_a: f32, y_a: f32, x_b: f32, y_b: f32) -> Vec<f32> {
    if x_a == x_b {
        return vec![y_a];
    }

    let steps = x_b.floor() as i64 - x_a.floor() as i64;
    if steps < 0 {
        return Vec::new();
    }

    let slope = (y_b - y_a) / (x_b - x_a);
    (0..=steps).map(|step| y_a + slope * step as f32).collect()
}

/// Sample `step` of [`linear`] without producing the ones before it.
///
/// Bit-identical to `linear(x_a, y_a, x_b, y_b)[step]` for every `step` in range.
pub fn linear_at(x_a: f32, y_a: f32, x_b: f32, y_b: f32, step: i64) -> f32 {
    if x_a == x_b {
        return y_a;
    }

    let slope = (y_b - y_a) / (x_b - x_a);
    y_a + slope * step as f32
}

/// The two boundaries of every row of a triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePair {
    /// Samples along the edge from the first to the last vertex.
    pub long: Vec<f32>,
    /// Samples along first -> middle, then middle -> last.
    pub short: Vec<f32>,
}

/// Interpolates `values` along the edges of a triangle as a function of
/// `params`, which must be sorted ascending.
///
/// The middle vertex is shared by both short edges, so the last sample of the
/// first short edge is dropped. For integer parameters both sequences have the
/// same length. Which of the two is the left boundary is left to the caller.
pub fn edge(params: [f32; 3], values: [f32; 3]) -> EdgePair {
    let [p_a, p_b, p_c] = params;
    let [v_a, v_b, v_c] = values;

    let long = linear(p_a, v_a, p_c, v_c);

    let mut short = linear(p_a, v_a, p_b, v_b);
    short.pop();
    short.extend(linear(p_b, v_b, p_c, v_c));

    EdgePair { long, short }
}

/// Sample `step` of both sequences of [`edge`], as `(long, short)`.
///
/// Lets a caller walk only the rows it needs of a triangle spanning far more.
pub fn edge_at(params: [f32; 3], values: [f32; 3], step: i64) -> (f32, f32) {
    let [p_a, p_b, p_c] = params;
    let [v_a, v_b, v_c] = values;

    let long = linear_at(p_a, v_a, p_c, v_c, step);

    // Samples contributed by first -> middle after dropping the shared one.
    let upper = p_b.floor() as i64 - p_a.floor() as i64;
    let short = if step < upper {
        linear_at(p_a, v_a, p_b, v_b, step)
    } else {
        linear_at(p_b, v_b, p_c, v_c, step - upper)
    };

    (long, short)
}
