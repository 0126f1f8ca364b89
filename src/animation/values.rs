use glam::{Quat, Vec3, Vec4};

/// Upper bound on morph target weights carried by a single keyframe.
pub const MAX_MORPH_TARGETS: usize = 8;

/// Values a keyframe track can blend between.
///
/// Cubic interpolation follows the glTF cubic-spline definition: tangents are
/// stored per keyframe and scaled by the keyframe interval `dt`.
pub trait Interpolatable: Copy + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    fn interpolate_cubic(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self;
}

/// Hermite basis `[h00, h10, h01, h11]` evaluated at `t`.
#[inline]
fn hermite_basis(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    [1.0 - h01, h11 - t2 + t, h01, h11]
}

/// Fixed-size morph weight snapshot, so weight tracks stay `Copy`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MorphWeightData {
    pub weights: [f32; MAX_MORPH_TARGETS],
}

impl MorphWeightData {
    /// Packs up to [`MAX_MORPH_TARGETS`] weights; extra weights are dropped.
    #[must_use]
    pub fn from_slice(weights: &[f32]) -> Self {
        let mut data = Self::default();
        let count = weights.len().min(MAX_MORPH_TARGETS);
        data.weights[..count].copy_from_slice(&weights[..count]);
        data
    }
}

impl Interpolatable for MorphWeightData {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        let mut out = Self::default();
        for (i, w) in out.weights.iter_mut().enumerate() {
            *w = f32::interpolate_linear(start.weights[i], end.weights[i], t);
        }
        out
    }

    fn interpolate_cubic(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let mut out = Self::default();
        for (i, w) in out.weights.iter_mut().enumerate() {
            *w = f32::interpolate_cubic(
                v0.weights[i],
                out_tangent0.weights[i],
                in_tangent1.weights[i],
                v1.weights[i],
                t,
                dt,
            );
        }
        out
    }
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }

    fn interpolate_cubic(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let [h00, h10, h01, h11] = hermite_basis(t);
        h00 * v0 + h10 * out_tangent0 * dt + h01 * v1 + h11 * in_tangent1 * dt
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }

    fn interpolate_cubic(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let [h00, h10, h01, h11] = hermite_basis(t);
        v0 * h00 + out_tangent0 * (h10 * dt) + v1 * h01 + in_tangent1 * (h11 * dt)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }

    // Componentwise Hermite on the raw quaternion, renormalized afterwards.
    fn interpolate_cubic(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let [h00, h10, h01, h11] = hermite_basis(t);
        let blended = Vec4::from(v0) * h00
            + Vec4::from(out_tangent0) * (h10 * dt)
            + Vec4::from(v1) * h01
            + Vec4::from(in_tangent1) * (h11 * dt);
        Quat::from_vec4(blended).normalize()
    }
}
