//! Separation enforcement between accepted points.
//!
//! Candidates are checked one at a time against every previously accepted
//! point (including avoid spheres and points accepted earlier in the same
//! batch), so acceptance is order-dependent and must not be vectorized. The
//! guard keeps one incrementally updated spatial hash across the whole call
//! instead of rebuilding a structure per query.
use std::collections::HashMap;

use glam::{IVec3, Vec3};

/// Incrementally updatable spatial hash over points with per-point radii.
///
/// Cells are keyed by quantized coordinates; the running maximum radius
/// bounds how far a conflicting point can sit from a candidate's cell. When
/// the query neighborhood would cover more cells than are occupied, the
/// lookup falls back to scanning the occupied cells directly, which keeps
/// wildly mismatched cell sizes correct.
pub(crate) struct SpatialHashGrid {
    cell_size: f32,
    cells: HashMap<IVec3, Vec<usize>>,
    points: Vec<Vec3>,
    radii: Vec<f32>,
    max_radius: f32,
}

impl SpatialHashGrid {
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0 && cell_size.is_finite());
        Self {
            cell_size,
            cells: HashMap::new(),
            points: Vec::new(),
            radii: Vec::new(),
            max_radius: 0.0,
        }
    }

    #[inline]
    fn cell_of(&self, point: Vec3) -> IVec3 {
        (point / self.cell_size).floor().as_ivec3()
    }

    pub fn insert(&mut self, point: Vec3, radius: f32) {
        let index = self.points.len();
        self.points.push(point);
        self.radii.push(radius);
        self.max_radius = self.max_radius.max(radius);
        self.cells.entry(self.cell_of(point)).or_default().push(index);
    }

    /// Whether `point` with exclusion radius `radius` conflicts with any
    /// stored point. A stored point `q` conflicts when
    /// `distance(point, q) < max(min_dist, radius + radius(q))`.
    pub fn conflicts(&self, point: Vec3, radius: f32, min_dist: f32) -> bool {
        if self.points.is_empty() {
            return false;
        }

        let reach = (radius + self.max_radius).max(min_dist);
        let span = (reach / self.cell_size).ceil() as f64;
        let width = 2.0 * span + 1.0;

        if !width.is_finite() || width * width * width > self.cells.len() as f64 {
            return (0..self.points.len()).any(|i| self.hits(point, radius, min_dist, i));
        }

        let center = self.cell_of(point);
        let span = span as i32;
        for dz in -span..=span {
            for dy in -span..=span {
                for dx in -span..=span {
                    let key = center + IVec3::new(dx, dy, dz);
                    if let Some(bucket) = self.cells.get(&key) {
                        if bucket.iter().any(|&i| self.hits(point, radius, min_dist, i)) {
                            return true;
                        }
                    }
                }
            }
        }

        false
    }

    #[inline]
    fn hits(&self, point: Vec3, radius: f32, min_dist: f32, index: usize) -> bool {
        let required = (radius + self.radii[index]).max(min_dist);
        point.distance_squared(self.points[index]) < required * required
    }
}

/// Mode-aware wrapper applying the separation rules of
/// [`Separation`](crate::populate::Separation).
pub(crate) enum SeparationGuard {
    /// Every candidate is admitted.
    Unconstrained,
    /// Fixed minimum distance; stored radii (from avoid spheres) still widen
    /// the requirement to `max(min_dist, radius(q))`.
    Fixed { min_dist: f32, grid: SpatialHashGrid },
    /// Exclusion spheres must not overlap: `distance >= r + r_q`.
    /// The grid is created on first insert so its cell size can follow the
    /// first observed radius.
    Radii { grid: Option<SpatialHashGrid> },
}

impl SeparationGuard {
    pub fn fixed(min_dist: f32) -> Self {
        SeparationGuard::Fixed {
            min_dist,
            grid: SpatialHashGrid::new(min_dist),
        }
    }

    pub fn radii() -> Self {
        SeparationGuard::Radii { grid: None }
    }

    /// Whether a candidate at `point` with exclusion radius `radius` keeps
    /// the required distance to everything inserted so far.
    pub fn admits(&self, point: Vec3, radius: f32) -> bool {
        match self {
            SeparationGuard::Unconstrained => true,
            SeparationGuard::Fixed { min_dist, grid } => !grid.conflicts(point, 0.0, *min_dist),
            SeparationGuard::Radii { grid } => grid
                .as_ref()
                .is_none_or(|g| !g.conflicts(point, radius, 0.0)),
        }
    }

    pub fn insert(&mut self, point: Vec3, radius: f32) {
        match self {
            SeparationGuard::Unconstrained => {}
            SeparationGuard::Fixed { grid, .. } => grid.insert(point, radius),
            SeparationGuard::Radii { grid } => {
                let grid = grid.get_or_insert_with(|| {
                    let cell = if radius > 0.0 { radius } else { 1.0 };
                    SpatialHashGrid::new(cell)
                });
                grid.insert(point, radius);
            }
        }
    }
}
