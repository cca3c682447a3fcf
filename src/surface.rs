//! Parametric surfaces: the mapping from a 2D parameter domain into 3D space.
//!
//! The [`Surface`] trait is the projection contract used by the populate
//! pipeline: it reports the rectangular UV bounds candidates are drawn from
//! and maps batches of parameter points to world points, index for index,
//! with no filtering. Two concrete evaluators are provided so the crate is
//! usable without an external geometry kernel.
use glam::{Vec2, Vec3};
use mint::{Vector2, Vector3};

use crate::error::{Error, Result};

/// Rectangular bounds of a surface's parameter domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub u_min: f32,
    pub u_max: f32,
    pub v_min: f32,
    pub v_max: f32,
}

impl UvRect {
    /// Create bounds from explicit edges.
    pub fn new(u_min: f32, u_max: f32, v_min: f32, v_max: f32) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }

    /// The unit square `[0, 1] x [0, 1]`.
    pub fn unit() -> Self {
        Self::new(0.0, 1.0, 0.0, 1.0)
    }

    /// Extent along u.
    pub fn width(&self) -> f32 {
        self.u_max - self.u_min
    }

    /// Extent along v.
    pub fn height(&self) -> f32 {
        self.v_max - self.v_min
    }

    /// Whether a parameter point lies inside the bounds.
    pub fn contains(&self, uv: Vec2) -> bool {
        uv.x >= self.u_min && uv.x <= self.u_max && uv.y >= self.v_min && uv.y <= self.v_max
    }

    /// Checks the bounds are finite and non-degenerate.
    pub fn validate(&self) -> Result<()> {
        let edges = [self.u_min, self.u_max, self.v_min, self.v_max];
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(Error::Surface("parameter bounds must be finite".into()));
        }
        if self.u_min >= self.u_max || self.v_min >= self.v_max {
            return Err(Error::Surface(
                "parameter bounds must have positive extent in u and v".into(),
            ));
        }

        Ok(())
    }
}

/// Trait for parametric surface evaluation.
///
/// `evaluate` must return exactly one world point per parameter point, in the
/// same order. Evaluator failures propagate to the caller unchanged; the
/// populate loop performs no recovery.
pub trait Surface: Send + Sync {
    /// Bounds of the parameter domain candidates are drawn from.
    fn uv_bounds(&self) -> UvRect;

    /// Map a batch of parameter points to world points.
    fn evaluate(&self, uv: &[Vector2<f32>]) -> Result<Vec<Vector3<f32>>>;
}

/// A planar patch spanned by two axis vectors from an origin.
#[derive(Debug, Clone, Copy)]
pub struct PlanePatch {
    /// World position of the `(u_min, v_min)` corner parameterization origin.
    pub origin: Vec3,
    /// Direction and scale of one unit of u.
    pub u_axis: Vec3,
    /// Direction and scale of one unit of v.
    pub v_axis: Vec3,
    /// Parameter bounds, `[0, 1]^2` by default.
    pub bounds: UvRect,
}

impl PlanePatch {
    /// Create a patch over the unit UV square.
    pub fn new(origin: Vec3, u_axis: Vec3, v_axis: Vec3) -> Self {
        Self {
            origin,
            u_axis,
            v_axis,
            bounds: UvRect::unit(),
        }
    }

    /// Axis-aligned patch in the XY plane with the given side length.
    pub fn xy(side: f32) -> Self {
        Self::new(Vec3::ZERO, Vec3::X * side, Vec3::Y * side)
    }

    /// Set the parameter bounds (builder-style).
    pub fn with_bounds(mut self, bounds: UvRect) -> Self {
        self.bounds = bounds;
        self
    }
}

impl Surface for PlanePatch {
    fn uv_bounds(&self) -> UvRect {
        self.bounds
    }

    fn evaluate(&self, uv: &[Vector2<f32>]) -> Result<Vec<Vector3<f32>>> {
        Ok(uv
            .iter()
            .map(|&p| {
                let p = Vec2::from(p);
                (self.origin + self.u_axis * p.x + self.v_axis * p.y).into()
            })
            .collect())
    }
}

/// A full sphere under the latitude/longitude parameterization:
/// u is the azimuth in `[0, 2*pi]`, v the polar angle in `[0, pi]`.
#[derive(Debug, Clone, Copy)]
pub struct SphereSurface {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereSurface {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Surface for SphereSurface {
    fn uv_bounds(&self) -> UvRect {
        UvRect::new(0.0, std::f32::consts::TAU, 0.0, std::f32::consts::PI)
    }

    fn evaluate(&self, uv: &[Vector2<f32>]) -> Result<Vec<Vector3<f32>>> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::Surface("sphere radius must be > 0".into()));
        }

        Ok(uv
            .iter()
            .map(|&p| {
                let (u, v) = (p.x, p.y);
                let dir = Vec3::new(v.sin() * u.cos(), v.sin() * u.sin(), v.cos());
                (self.center + dir * self.radius).into()
            })
            .collect())
    }
}
