#![forbid(unsafe_code)]
//! surface_scatter: point population on parametric surfaces with density
//! fields and exclusion radii.
//!
//! Modules:
//! - surface: parameter-domain bounds and the batched surface-evaluation contract
//! - field: batched scalar fields used for density and exclusion radii
//! - populate: request/result model and the batched rejection-sampling loop
//!
//! The populate loop draws uniform parameter-space candidates, projects them
//! through the surface, thins them by an optional density field, enforces a
//! fixed or field-driven separation constraint one candidate at a time, and
//! stops when the requested count is reached or a hard iteration budget runs
//! out. For a fixed seed the whole pipeline is deterministic.
pub mod error;
pub mod field;
pub mod populate;
pub mod surface;

/// Convenient re-exports for common types. Import with `use surface_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::{ConstantField, FnField, ScalarField};
    pub use crate::populate::{
        populate, populate_with_rng, AvoidSphere, Populated, PopulateRequest, Separation,
        BATCH_SIZE, DEFAULT_SEED, MAX_ITERATIONS,
    };
    pub use crate::surface::{PlanePatch, SphereSurface, Surface, UvRect};
}
