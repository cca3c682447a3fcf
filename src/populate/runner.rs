//! Batched populate loop: generation, projection, filtering, accumulation.
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng as RngCore, SeedableRng};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::populate::candidates::uniform_uv_batch;
use crate::populate::density::filter_by_density;
use crate::populate::separation::SeparationGuard;
use crate::populate::{
    rand01, resolve_seed, Populated, PopulateRequest, Separation, BATCH_SIZE, MAX_ITERATIONS,
};
use crate::surface::Surface;

/// Populate `surface` with points according to `request`, using an RNG owned
/// by this call and seeded from the request (`0` selects the fixed default
/// seed).
///
/// Returns fewer than `request.count` points when the iteration budget runs
/// out before the separation constraints leave room for more; that outcome is
/// reported through [`Populated::completed`], not as an error. Worst-case
/// cost is `MAX_ITERATIONS * BATCH_SIZE` candidate evaluations.
pub fn populate(surface: &dyn Surface, request: &PopulateRequest) -> Result<Populated> {
    let mut rng = StdRng::seed_from_u64(resolve_seed(request.seed));
    populate_with_rng(surface, request, &mut rng)
}

/// Like [`populate`], but drawing from a caller-supplied RNG.
pub fn populate_with_rng(
    surface: &dyn Surface,
    request: &PopulateRequest,
    rng: &mut dyn RngCore,
) -> Result<Populated> {
    request.validate()?;

    let bounds = surface.uv_bounds();
    bounds.validate()?;

    let mut guard = match &request.separation {
        Separation::None => SeparationGuard::Unconstrained,
        Separation::Fixed(min_dist) => SeparationGuard::fixed(*min_dist),
        Separation::Field { .. } => SeparationGuard::radii(),
    };
    for sphere in &request.avoid {
        guard.insert(sphere.center, sphere.radius);
    }

    let mut result = Populated {
        uv: Vec::with_capacity(request.count),
        positions: Vec::with_capacity(request.count),
        radii: Vec::with_capacity(request.count),
        ..Default::default()
    };

    loop {
        if result.len() >= request.count {
            result.completed = true;
            break;
        }

        if result.iterations >= MAX_ITERATIONS {
            error!(
                accepted = result.len(),
                requested = request.count,
                max_iterations = MAX_ITERATIONS,
                "iteration budget exhausted before reaching the requested count"
            );
            break;
        }
        result.iterations += 1;

        let batch = BATCH_SIZE.min(request.count - result.len());
        let uv = uniform_uv_batch(bounds, batch, rng);
        let world = project(surface, &uv)?;
        result.candidates_evaluated += batch;

        let (uv, world) = filter_by_density(
            uv,
            world,
            request.density.as_deref(),
            request.threshold,
            request.proportional,
            request.field_min,
            request.field_max,
            rng,
        )?;

        let base_radii = match &request.separation {
            Separation::Field { field, .. } => Some(radius_field_values(field.as_ref(), &world)?),
            _ => None,
        };

        // Sequential on purpose: each acceptance must see every earlier one,
        // including those from this batch.
        for (index, (p_uv, p_world)) in uv.into_iter().zip(world).enumerate() {
            let radius = match &request.separation {
                Separation::Field { random_radius, .. } => {
                    let base = base_radii.as_ref().expect("radii for field mode")[index].max(0.0);
                    if *random_radius {
                        rand01(rng) * base
                    } else {
                        base
                    }
                }
                _ => 0.0,
            };

            if !guard.admits(p_world, radius) {
                continue;
            }
            if let Some(predicate) = &request.predicate {
                if !predicate(p_uv, p_world) {
                    continue;
                }
            }

            guard.insert(p_world, radius);
            result.uv.push(p_uv);
            result.positions.push(p_world);
            result.radii.push(radius);
        }

        debug!(
            iteration = result.iterations,
            batch,
            accepted = result.len(),
            requested = request.count,
            "populate batch finished"
        );
    }

    result.candidates_rejected = result.candidates_evaluated - result.len();
    Ok(result)
}

fn project(surface: &dyn Surface, uv: &[Vec2]) -> Result<Vec<Vec3>> {
    let uv_mint: Vec<mint::Vector2<f32>> = uv.iter().copied().map(Into::into).collect();
    let world = surface.evaluate(&uv_mint)?;
    if world.len() != uv.len() {
        return Err(Error::Surface(format!(
            "surface returned {} points for {} parameters",
            world.len(),
            uv.len()
        )));
    }

    Ok(world.into_iter().map(Vec3::from).collect())
}

fn radius_field_values(
    field: &dyn crate::field::ScalarField,
    world: &[Vec3],
) -> Result<Vec<f32>> {
    let positions: Vec<mint::Vector3<f32>> = world.iter().copied().map(Into::into).collect();
    let values = field.evaluate(&positions)?;
    if values.len() != world.len() {
        return Err(Error::Field(format!(
            "radius field returned {} values for {} points",
            values.len(),
            world.len()
        )));
    }

    Ok(values)
}
