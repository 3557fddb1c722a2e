//! Linear blending between two values of the same type

use glam::{Vec2, Vec3, Vec4};

/// A value type that can be linearly blended.
///
/// `a.lerp(&b, 0.0) == a` and `a.lerp(&b, 1.0) == b`. The weight is not
/// clamped, so overshooting easings extrapolate past either end.
pub trait Interpolate: Copy {
    fn lerp(&self, to: &Self, t: f32) -> Self;
}

macro_rules! impl_interpolate {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Interpolate for $ty {
                #[inline]
                fn lerp(&self, to: &Self, t: f32) -> Self {
                    *self + (*to - *self) * t
                }
            }
        )*
    };
}

impl_interpolate!(f32, Vec2, Vec3, Vec4);

impl Interpolate for f64 {
    #[inline]
    fn lerp(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t as f64
    }
}
