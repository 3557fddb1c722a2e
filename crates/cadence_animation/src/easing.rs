//! Easing functions for animations
//!
//! An easing maps normalized progress in `[0, 1]` to an interpolation
//! weight. Outputs are not clamped: the back and elastic presets overshoot.

use std::f32::consts::PI;
use std::str::FromStr;

use crate::error::AnimationError;

/// Easing function type
///
/// Every variant is a pure function of its input, so `apply` may be called
/// any number of times with the same progress and return the same weight.
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Same curve as [`Easing::EaseInCubic`]
    EaseIn,
    /// Same curve as [`Easing::EaseOutCubic`]
    EaseOut,
    /// Same curve as [`Easing::EaseInOutCubic`]
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    /// Pulls back below 0 before accelerating
    EaseInBack,
    /// Overshoots past 1 before settling
    EaseOutBack,
    EaseOutBounce,
    EaseOutElastic,
    CubicBezier(f32, f32, f32, f32),
    /// Caller-supplied curve. Must be free of side effects.
    Custom(fn(f32) -> f32),
}

const BACK_OVERSHOOT: f32 = 1.70158;

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInBack => {
                let c3 = BACK_OVERSHOOT + 1.0;
                c3 * t * t * t - BACK_OVERSHOOT * t * t
            }
            Easing::EaseOutBack => {
                let c3 = BACK_OVERSHOOT + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + BACK_OVERSHOOT * u * u
            }
            Easing::EaseOutBounce => bounce_out(t),
            Easing::EaseOutElastic => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    let c4 = (2.0 * PI) / 3.0;
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
            Easing::Custom(f) => f(t),
        }
    }
}

impl From<fn(f32) -> f32> for Easing {
    fn from(f: fn(f32) -> f32) -> Self {
        Easing::Custom(f)
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    /// Parse a preset by its snake_case name (`ease_out_cubic`, `linear`, ...).
    ///
    /// `CubicBezier` and `Custom` have no textual form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let easing = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "linear" => Easing::Linear,
            "ease_in" => Easing::EaseIn,
            "ease_out" => Easing::EaseOut,
            "ease_in_out" => Easing::EaseInOut,
            "ease_in_quad" => Easing::EaseInQuad,
            "ease_out_quad" => Easing::EaseOutQuad,
            "ease_in_out_quad" => Easing::EaseInOutQuad,
            "ease_in_cubic" => Easing::EaseInCubic,
            "ease_out_cubic" => Easing::EaseOutCubic,
            "ease_in_out_cubic" => Easing::EaseInOutCubic,
            "ease_in_quart" => Easing::EaseInQuart,
            "ease_out_quart" => Easing::EaseOutQuart,
            "ease_in_out_quart" => Easing::EaseInOutQuart,
            "ease_in_sine" => Easing::EaseInSine,
            "ease_out_sine" => Easing::EaseOutSine,
            "ease_in_out_sine" => Easing::EaseInOutSine,
            "ease_in_back" => Easing::EaseInBack,
            "ease_out_back" => Easing::EaseOutBack,
            "ease_out_bounce" => Easing::EaseOutBounce,
            "ease_out_elastic" => Easing::EaseOutElastic,
            _ => return Err(AnimationError::UnknownEasing(s.to_string())),
        };
        Ok(easing)
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// Cubic bezier easing calculation (matches CSS spec / browser implementations).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
/// Computes in f64 internally to avoid f32 precision jitter at 120fps.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Endpoints are always exact
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let x1 = x1 as f64;
    let y1 = y1 as f64;
    let x2 = x2 as f64;
    let y2 = y2 as f64;

    // Solve for parameter `p` where bezier_x(p) == x using Newton-Raphson,
    // falling back to binary search if the slope is too flat.
    let mut p = x; // initial guess
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break; // slope too flat, switch to binary search
        }
        p -= err / slope;
    }

    // Binary search fallback (always converges)
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// Evaluate cubic bezier at parameter t: B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    // Horner form: ((1-3p2+3p1)t + 3p2-6p1)t + 3p1) * t
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of cubic bezier: B'(t) = 3(1-t)²·p1 + 6(1-t)t·(p2-p1) + 3t²·(1-p2)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESETS: &[Easing] = &[
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::EaseInBack,
        Easing::EaseOutBack,
        Easing::EaseOutBounce,
        Easing::EaseOutElastic,
        Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
    ];

    #[test]
    fn test_presets_hit_endpoints() {
        for easing in PRESETS {
            assert!(easing.apply(0.0).abs() < 1e-5, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_apply_is_repeatable() {
        for easing in PRESETS {
            for i in 0..=20 {
                let t = i as f32 / 20.0;
                assert_eq!(easing.apply(t).to_bits(), easing.apply(t).to_bits());
            }
        }
    }

    #[test]
    fn test_back_overshoots() {
        let peak = (0..=100)
            .map(|i| Easing::EaseOutBack.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
        assert!(Easing::EaseInBack.apply(0.2) < 0.0);
    }

    #[test]
    fn test_linear_midpoint() {
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
        assert_eq!(Easing::EaseInQuad.apply(0.5), 0.25);
    }

    #[test]
    fn test_custom_easing() {
        fn step(t: f32) -> f32 {
            if t < 0.5 {
                0.0
            } else {
                1.0
            }
        }
        let easing = Easing::from(step as fn(f32) -> f32);
        assert_eq!(easing.apply(0.25), 0.0);
        assert_eq!(easing.apply(0.75), 1.0);
    }

    #[test]
    fn test_parse_names() {
        assert!(matches!("linear".parse::<Easing>(), Ok(Easing::Linear)));
        assert!(matches!(
            "ease-out-cubic".parse::<Easing>(),
            Ok(Easing::EaseOutCubic)
        ));
        assert!(matches!(
            " Ease_Out_Back ".parse::<Easing>(),
            Ok(Easing::EaseOutBack)
        ));
        assert_eq!(
            "wobble".parse::<Easing>().unwrap_err(),
            AnimationError::UnknownEasing("wobble".into())
        );
    }
}
