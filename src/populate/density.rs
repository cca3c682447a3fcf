//! Density filtering of projected candidates.
use glam::{Vec2, Vec3};
use rand::Rng as RngCore;

use crate::error::{Error, Result};
use crate::field::ScalarField;
use crate::populate::rand01;

/// Filter an index-aligned batch of `(uv, world)` candidates by a density
/// field, preserving order.
///
/// The threshold cut runs first; when `proportional` is set, each survivor
/// additionally passes a Bernoulli trial `p <= value` with
/// `p ~ U(field_min, field_max)`. Without a field every candidate passes
/// unchanged (the proportional-without-field case is rejected by request
/// validation before sampling starts).
#[allow(clippy::too_many_arguments)]
pub(crate) fn filter_by_density(
    uv: Vec<Vec2>,
    world: Vec<Vec3>,
    density: Option<&dyn ScalarField>,
    threshold: f32,
    proportional: bool,
    field_min: f32,
    field_max: f32,
    rng: &mut dyn RngCore,
) -> Result<(Vec<Vec2>, Vec<Vec3>)> {
    debug_assert_eq!(uv.len(), world.len());

    let Some(field) = density else {
        return Ok((uv, world));
    };

    let positions: Vec<mint::Vector3<f32>> = world.iter().copied().map(Into::into).collect();
    let values = field.evaluate(&positions)?;
    if values.len() != world.len() {
        return Err(Error::Field(format!(
            "density field returned {} values for {} points",
            values.len(),
            world.len()
        )));
    }

    let mut kept_uv = Vec::with_capacity(uv.len());
    let mut kept_world = Vec::with_capacity(world.len());

    for ((p_uv, p_world), value) in uv.into_iter().zip(world).zip(values) {
        if value < threshold {
            continue;
        }
        if proportional {
            let p = field_min + rand01(rng) * (field_max - field_min);
            if p > value {
                continue;
            }
        }
        kept_uv.push(p_uv);
        kept_world.push(p_world);
    }

    Ok((kept_uv, kept_world))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::field::{ConstantField, FnField};

    fn batch(n: usize) -> (Vec<Vec2>, Vec<Vec3>) {
        let uv: Vec<Vec2> = (0..n).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let world: Vec<Vec3> = (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        (uv, world)
    }

    #[test]
    fn no_field_passes_everything_unchanged() {
        let mut rng = StdRng::seed_from_u64(1);
        let (uv, world) = batch(8);
        let (kept_uv, kept_world) = filter_by_density(
            uv.clone(),
            world.clone(),
            None,
            0.5,
            false,
            0.0,
            1.0,
            &mut rng,
        )
        .expect("no-field filtering");

        assert_eq!(kept_uv, uv);
        assert_eq!(kept_world, world);
    }

    #[test]
    fn threshold_discards_low_values_and_preserves_order() {
        let mut rng = StdRng::seed_from_u64(1);
        // Value equals the world x coordinate, so points 0..5 fall below 5.0.
        let field = FnField::new(|p: glam::Vec3| p.x);
        let (uv, world) = batch(10);

        let (kept_uv, kept_world) =
            filter_by_density(uv, world, Some(&field), 5.0, false, 0.0, 10.0, &mut rng)
                .expect("threshold filtering");

        assert_eq!(kept_world.len(), 5);
        for (p_uv, p_world) in kept_uv.iter().zip(&kept_world) {
            assert!(p_world.x >= 5.0);
            assert_eq!(p_uv.x, p_world.x);
        }
        assert!(kept_world.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn proportional_accepts_everything_at_field_max() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = ConstantField::new(1.0);
        let (uv, world) = batch(500);

        let (kept_uv, _) =
            filter_by_density(uv, world, Some(&field), 0.0, true, 0.0, 1.0, &mut rng)
                .expect("proportional filtering");

        // p ~ U(0, 1) and value == 1.0, so p <= value always holds.
        assert_eq!(kept_uv.len(), 500);
    }

    #[test]
    fn proportional_rejects_almost_everything_at_field_min() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = ConstantField::new(0.0);
        let (uv, world) = batch(500);

        let (kept_uv, _) =
            filter_by_density(uv, world, Some(&field), 0.0, true, 0.0, 1.0, &mut rng)
                .expect("proportional filtering");

        // p ~ U(0, 1) and value == 0.0, so p <= value only when p draws 0 exactly.
        assert!(kept_uv.len() <= 1);
    }

    #[test]
    fn mismatched_field_output_is_an_error() {
        struct Short;
        impl ScalarField for Short {
            fn evaluate(&self, positions: &[mint::Vector3<f32>]) -> Result<Vec<f32>> {
                Ok(vec![1.0; positions.len().saturating_sub(1)])
            }
        }

        let mut rng = StdRng::seed_from_u64(1);
        let (uv, world) = batch(4);
        let result = filter_by_density(uv, world, Some(&Short), 0.0, false, 0.0, 1.0, &mut rng);
        assert!(matches!(result, Err(Error::Field(_))));
    }
}
