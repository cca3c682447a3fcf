//! Point population on parametric surfaces.
//!
//! This module defines the request/result data model and drives the batched
//! rejection-sampling pipeline: uniform parameter-space candidates are
//! projected through a [`Surface`](crate::surface::Surface), thinned by an
//! optional density field, checked one at a time against the separation
//! constraint (fixed minimum distance or field-driven exclusion radii), and
//! finally passed to an optional user predicate.
use std::sync::Arc;

use glam::{Vec2, Vec3};
use rand::Rng as RngCore;

use crate::error::{Error, Result};
use crate::field::ScalarField;

pub mod candidates;
pub mod density;
pub mod runner;
pub mod separation;

pub use runner::{populate, populate_with_rng};

/// Candidates generated per loop iteration.
pub const BATCH_SIZE: usize = 100;
/// Hard cap on loop iterations; the loop always terminates.
pub const MAX_ITERATIONS: usize = 1000;

/// Seed used when the caller passes `0`, so that `0` still means a fixed,
/// reproducible stream rather than an unseeded one.
pub const DEFAULT_SEED: u64 = 0x5EED_5CA7_7E12;

/// Resolve a caller-supplied seed, mapping `0` to [`DEFAULT_SEED`].
pub fn resolve_seed(seed: u64) -> u64 {
    if seed == 0 {
        DEFAULT_SEED
    } else {
        seed
    }
}

/// Predicate applied to `(parameter point, world point)` pairs after density
/// and separation checks both pass.
pub type Predicate = dyn Fn(Vec2, Vec3) -> bool + Send + Sync;

/// How accepted points keep their distance from each other.
#[derive(Clone, Default)]
pub enum Separation {
    /// No separation constraint; every candidate is accepted.
    #[default]
    None,
    /// Fixed minimum distance between any two accepted points.
    Fixed(f32),
    /// Per-point exclusion radius supplied by a scalar field; two points
    /// conflict when their exclusion spheres overlap.
    Field {
        /// Field evaluated at each candidate's world position to obtain its
        /// base exclusion radius.
        field: Arc<dyn ScalarField>,
        /// Replace the base radius with a uniform draw from `[0, base]`.
        random_radius: bool,
    },
}

impl std::fmt::Debug for Separation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Separation::None => write!(f, "Separation::None"),
            Separation::Fixed(r) => write!(f, "Separation::Fixed({r})"),
            Separation::Field { random_radius, .. } => f
                .debug_struct("Separation::Field")
                .field("random_radius", random_radius)
                .finish_non_exhaustive(),
        }
    }
}

/// A pre-existing exclusion sphere that new samples must respect but which is
/// never part of the output.
#[derive(Debug, Clone, Copy)]
pub struct AvoidSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl AvoidSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Configuration for a populate call.
#[non_exhaustive]
#[derive(Clone)]
pub struct PopulateRequest {
    /// Target number of points.
    pub count: usize,
    /// Optional density field gating where points may land.
    pub density: Option<Arc<dyn ScalarField>>,
    /// Candidates with a density value below this are discarded.
    pub threshold: f32,
    /// Thin surviving candidates stochastically so acceptance probability
    /// scales with the density value.
    pub proportional: bool,
    /// Lower bound of the density field's value range; used only when
    /// `proportional` is set.
    pub field_min: f32,
    /// Upper bound of the density field's value range; used only when
    /// `proportional` is set.
    pub field_max: f32,
    /// Separation constraint between accepted points.
    pub separation: Separation,
    /// Exclusion spheres respected but never returned.
    pub avoid: Vec<AvoidSphere>,
    /// RNG seed; `0` selects [`DEFAULT_SEED`].
    pub seed: u64,
    /// Optional final acceptance filter over `(uv, world)` pairs.
    pub predicate: Option<Arc<Predicate>>,
}

impl PopulateRequest {
    /// Create a request for `count` points with no field, no separation, and
    /// the default seed.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            density: None,
            threshold: 0.0,
            proportional: false,
            field_min: 0.0,
            field_max: 1.0,
            separation: Separation::None,
            avoid: Vec::new(),
            seed: 0,
            predicate: None,
        }
    }

    /// Set the density field and its threshold.
    pub fn with_density(mut self, field: Arc<dyn ScalarField>, threshold: f32) -> Self {
        self.density = Some(field);
        self.threshold = threshold;
        self
    }

    /// Enable proportional sampling over the given field value range.
    pub fn with_proportional(mut self, field_min: f32, field_max: f32) -> Self {
        self.proportional = true;
        self.field_min = field_min;
        self.field_max = field_max;
        self
    }

    /// Set the separation constraint.
    pub fn with_separation(mut self, separation: Separation) -> Self {
        self.separation = separation;
        self
    }

    /// Add exclusion spheres that accepted points must stay clear of.
    pub fn with_avoid(mut self, avoid: Vec<AvoidSphere>) -> Self {
        self.avoid = avoid;
        self
    }

    /// Set the RNG seed (`0` selects the fixed default seed).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the final acceptance predicate.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(Vec2, Vec3) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Validates the request, returning an error if invalid.
    ///
    /// Runs before any randomness is consumed so that validation ordering
    /// never disturbs seeded determinism.
    pub fn validate(&self) -> Result<()> {
        if self.proportional {
            if self.density.is_none() {
                return Err(Error::InvalidConfig(
                    "proportional sampling requires a density field".into(),
                ));
            }
            if !self.field_min.is_finite() || !self.field_max.is_finite() {
                return Err(Error::InvalidConfig("field range must be finite".into()));
            }
            if self.field_min > self.field_max {
                return Err(Error::InvalidConfig(
                    "field_min must be <= field_max".into(),
                ));
            }
        }
        if !self.threshold.is_finite() {
            return Err(Error::InvalidConfig("threshold must be finite".into()));
        }
        if let Separation::Fixed(min_dist) = self.separation {
            if !min_dist.is_finite() || min_dist <= 0.0 {
                return Err(Error::InvalidConfig(
                    "fixed separation distance must be > 0".into(),
                ));
            }
        }
        for sphere in &self.avoid {
            if !sphere.radius.is_finite() || sphere.radius < 0.0 {
                return Err(Error::InvalidConfig(
                    "avoid sphere radii must be >= 0".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Result of a populate call.
///
/// The three sequences are index-aligned and always of equal length: entry
/// `i` of `uv`, `positions`, and `radii` describe the same point. Radii are
/// zero unless [`Separation::Field`] was active.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct Populated {
    /// Parameter coordinates of the accepted points.
    pub uv: Vec<Vec2>,
    /// World positions of the accepted points.
    pub positions: Vec<Vec3>,
    /// Exclusion radii of the accepted points.
    pub radii: Vec<f32>,
    /// Loop iterations executed.
    pub iterations: usize,
    /// Total candidates generated and projected.
    pub candidates_evaluated: usize,
    /// Candidates discarded by density, separation, or the predicate.
    pub candidates_rejected: usize,
    /// Whether the requested count was reached before the iteration budget
    /// ran out.
    pub completed: bool,
}

impl Populated {
    /// Number of accepted points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no points were accepted.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ConstantField;

    #[test]
    fn seed_zero_maps_to_fixed_default() {
        assert_eq!(resolve_seed(0), DEFAULT_SEED);
        assert_eq!(resolve_seed(42), 42);
        assert_eq!(resolve_seed(DEFAULT_SEED), DEFAULT_SEED);
    }

    #[test]
    fn proportional_without_field_is_rejected_up_front() {
        let request = PopulateRequest::new(10).with_proportional(0.0, 1.0);
        assert!(matches!(
            request.validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn proportional_with_inverted_range_is_rejected() {
        let request = PopulateRequest::new(10)
            .with_density(Arc::new(ConstantField::new(1.0)), 0.0)
            .with_proportional(1.0, 0.0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn non_positive_fixed_distance_is_rejected() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let request = PopulateRequest::new(10).with_separation(Separation::Fixed(bad));
            assert!(request.validate().is_err(), "expected rejection of {bad}");
        }
    }

    #[test]
    fn negative_avoid_radius_is_rejected() {
        let request =
            PopulateRequest::new(10).with_avoid(vec![AvoidSphere::new(Vec3::ZERO, -0.5)]);
        assert!(request.validate().is_err());
    }

    #[test]
    fn default_request_validates() {
        assert!(PopulateRequest::new(0).validate().is_ok());
        assert!(PopulateRequest::new(100)
            .with_density(Arc::new(ConstantField::new(1.0)), 0.5)
            .with_proportional(0.0, 1.0)
            .with_separation(Separation::Fixed(0.1))
            .validate()
            .is_ok());
    }

    #[test]
    fn rand01_values_in_range() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let value = rand01(&mut rng);
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
