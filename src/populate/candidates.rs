//! Uniform candidate generation in the surface's parameter domain.
use glam::Vec2;
use rand::Rng as RngCore;

use crate::populate::rand01;
use crate::surface::UvRect;

/// Draw `count` independent uniformly distributed parameter points inside
/// `bounds`, strictly below the upper edges.
pub(crate) fn uniform_uv_batch(bounds: UvRect, count: usize, rng: &mut dyn RngCore) -> Vec<Vec2> {
    let width = bounds.width();
    let height = bounds.height();

    // Next representable floats below the upper edges to enforce strict < comparisons
    let max_u = next_down(bounds.u_max);
    let max_v = next_down(bounds.v_max);

    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let mut u = bounds.u_min + rand01(rng) * width;
        let mut v = bounds.v_min + rand01(rng) * height;

        // Keep strictly inside the upper edges.
        u = u.clamp(bounds.u_min, max_u);
        v = v.clamp(bounds.v_min, max_v);

        out.push(Vec2::new(u, v));
    }

    out
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// ensuring bounds are strictly inside a domain. Handles edge cases
/// safely including very small positive values and zero.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}
