//! Per-frame counters.

use std::ops::AddAssign;

/// What happened while rendering one frame.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FrameStatistics {
    pub instances: usize,
    /// Model vertices that could not be projected (on or behind the eye plane, or non-finite).
    pub vertices_dropped: usize,
    pub polygons_submitted: usize,
    pub polygons_culled: usize,
    /// Zero area polygons and polygons referencing a dropped vertex.
    pub polygons_degenerate: usize,
    pub polygons_rasterized: usize,
    pub lines_rasterized: usize,
    /// Fragments that passed their depth test (or had none).
    pub fragments: usize,
}

impl AddAssign for FrameStatistics {
    fn add_assign(&mut self, rhs: Self) {
        self.instances += rhs.instances;
        self.vertices_dropped += rhs.vertices_dropped;
        self.polygons_submitted += rhs.polygons_submitted;
        self.polygons_culled += rhs.polygons_culled;
        self.polygons_degenerate += rhs.polygons_degenerate;
        self.polygons_rasterized += rhs.polygons_rasterized;
        self.lines_rasterized += rhs.lines_rasterized;
        self.fragments += rhs.fragments;
    }
}
