//! Scalar fields over 3D space.
//!
//! A [`ScalarField`] supplies one value per world point and is evaluated in
//! batches. The populate pipeline uses fields in two roles: as a density
//! field gating or biasing where points may land, and as a radius field
//! supplying per-point exclusion radii.
use glam::Vec3;
use mint::Vector3;

use crate::error::Result;

/// Trait for batched scalar-field evaluation.
///
/// `evaluate` must return exactly one value per input point, in the same
/// order. Failures propagate to the caller unchanged.
pub trait ScalarField: Send + Sync {
    fn evaluate(&self, positions: &[Vector3<f32>]) -> Result<Vec<f32>>;
}

/// A field that is the same value everywhere.
#[derive(Debug, Clone, Copy)]
pub struct ConstantField {
    pub value: f32,
}

impl ConstantField {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl ScalarField for ConstantField {
    fn evaluate(&self, positions: &[Vector3<f32>]) -> Result<Vec<f32>> {
        Ok(vec![self.value; positions.len()])
    }
}

/// Adapter turning a plain closure into a [`ScalarField`].
pub struct FnField<F> {
    f: F,
}

impl<F> FnField<F>
where
    F: Fn(Vec3) -> f32 + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ScalarField for FnField<F>
where
    F: Fn(Vec3) -> f32 + Send + Sync,
{
    fn evaluate(&self, positions: &[Vector3<f32>]) -> Result<Vec<f32>> {
        Ok(positions.iter().map(|&p| (self.f)(Vec3::from(p))).collect())
    }
}
