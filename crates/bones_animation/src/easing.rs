//! Easing functions for animations

use std::f32::consts::PI;
use std::str::FromStr;

use thiserror::Error;

/// Default tension of the anticipate/overshoot interpolators
pub const DEFAULT_TENSION: f32 = 2.0;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    /// Quadratic speed-up (the toolkit "accelerate" interpolator)
    Accelerate,
    /// Quadratic slow-down (the toolkit "decelerate" interpolator)
    Decelerate,
    /// Cosine ease in and out
    AccelerateDecelerate,
    /// Pull back before moving forward
    Anticipate(f32),
    /// Shoot past the end and settle back
    Overshoot(f32),
    AnticipateOvershoot(f32),
    /// Bounce at the end
    Bounce,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Material "standard" curve
    pub const FAST_OUT_SLOW_IN: Easing = Easing::CubicBezier(0.4, 0.0, 0.2, 1.0);
    /// Material "accelerate" curve
    pub const FAST_OUT_LINEAR_IN: Easing = Easing::CubicBezier(0.4, 0.0, 1.0, 1.0);
    /// Material "decelerate" curve
    pub const LINEAR_OUT_SLOW_IN: Easing = Easing::CubicBezier(0.0, 0.0, 0.2, 1.0);

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
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
            Easing::EaseInQuad | Easing::Accelerate => t * t,
            Easing::EaseOutQuad | Easing::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
            Easing::Anticipate(tension) => anticipate(t, *tension),
            Easing::Overshoot(tension) => overshoot(t - 1.0, *tension) + 1.0,
            Easing::AnticipateOvershoot(tension) => {
                let tension = tension * 1.5;
                if t < 0.5 {
                    0.5 * anticipate(t * 2.0, tension)
                } else {
                    0.5 * (overshoot(t * 2.0 - 2.0, tension) + 2.0)
                }
            }
            Easing::Bounce => bounce_out(t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }
}

/// Unknown easing name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown easing: {0}")]
pub struct ParseEasingError(pub String);

impl FromStr for Easing {
    type Err = ParseEasingError;

    /// Parse a snake or kebab case easing name, e.g. `fast_out_slow_in`
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let easing = match normalized.as_str() {
            "linear" => Easing::Linear,
            "ease_in" => Easing::EaseIn,
            "ease_out" => Easing::EaseOut,
            "ease_in_out" => Easing::EaseInOut,
            "ease_in_quad" => Easing::EaseInQuad,
            "ease_out_quad" => Easing::EaseOutQuad,
            "ease_in_out_quad" => Easing::EaseInOutQuad,
            "accelerate" => Easing::Accelerate,
            "decelerate" => Easing::Decelerate,
            "accelerate_decelerate" => Easing::AccelerateDecelerate,
            "anticipate" => Easing::Anticipate(DEFAULT_TENSION),
            "overshoot" => Easing::Overshoot(DEFAULT_TENSION),
            "anticipate_overshoot" => Easing::AnticipateOvershoot(DEFAULT_TENSION),
            "bounce" => Easing::Bounce,
            "fast_out_slow_in" => Easing::FAST_OUT_SLOW_IN,
            "fast_out_linear_in" => Easing::FAST_OUT_LINEAR_IN,
            "linear_out_slow_in" => Easing::LINEAR_OUT_SLOW_IN,
            _ => return Err(ParseEasingError(name.to_string())),
        };
        Ok(easing)
    }
}

#[inline]
fn anticipate(t: f32, tension: f32) -> f32 {
    t * t * ((tension + 1.0) * t - tension)
}

#[inline]
fn overshoot(t: f32, tension: f32) -> f32 {
    t * t * ((tension + 1.0) * t + tension)
}

fn bounce_out(t: f32) -> f32 {
    fn arc(t: f32) -> f32 {
        t * t * 8.0
    }
    let t = t * 1.1226;
    if t < 0.3535 {
        arc(t)
    } else if t < 0.7408 {
        arc(t - 0.54719) + 0.7
    } else if t < 0.9644 {
        arc(t - 0.8526) + 0.9
    } else {
        arc(t - 1.0435) + 0.95
    }
}

/// Cubic bezier easing calculation (matches CSS cubic-bezier() in browsers).
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

    const ALL: [Easing; 17] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::Accelerate,
        Easing::Decelerate,
        Easing::AccelerateDecelerate,
        Easing::Anticipate(DEFAULT_TENSION),
        Easing::Overshoot(DEFAULT_TENSION),
        Easing::AnticipateOvershoot(DEFAULT_TENSION),
        Easing::Bounce,
        Easing::FAST_OUT_SLOW_IN,
        Easing::FAST_OUT_LINEAR_IN,
        Easing::LINEAR_OUT_SLOW_IN,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-3, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-2, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Linear.apply(f32::NAN), 0.0);
    }

    #[test]
    fn test_anticipate_dips_below_zero() {
        assert!(Easing::Anticipate(DEFAULT_TENSION).apply(0.2) < 0.0);
        assert!(Easing::Overshoot(DEFAULT_TENSION).apply(0.8) > 1.0);
    }

    #[test]
    fn test_fast_out_slow_in_is_ahead_of_linear() {
        assert!(Easing::FAST_OUT_SLOW_IN.apply(0.5) > 0.5);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("fast_out_slow_in".parse::<Easing>(), Ok(Easing::FAST_OUT_SLOW_IN));
        assert_eq!("Linear-Out-Slow-In".parse::<Easing>(), Ok(Easing::LINEAR_OUT_SLOW_IN));
        assert_eq!("bounce".parse::<Easing>(), Ok(Easing::Bounce));
        assert_eq!(
            "springy".parse::<Easing>(),
            Err(ParseEasingError("springy".to_string()))
        );
    }
}
