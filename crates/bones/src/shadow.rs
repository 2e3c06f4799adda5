//! Elevation shadows
//!
//! Higher owners cast softer, fainter shadows: alpha runs from 70 down to
//! 5 and blur from 0.1 up to 60 as elevation climbs to its maximum.

use bones_animation::map_range;
use bones_paint::{MutableColor, Shadow};

const MIN_SHADOW_ALPHA: f32 = 5.0;
const MAX_SHADOW_ALPHA: f32 = 70.0;
const MIN_SHADOW_BLUR: f32 = 0.1;
const MAX_SHADOW_BLUR: f32 = 60.0;
const SHADOW_OFFSET_FACTOR: f32 = 0.35;

/// Shadow under an owner raised by `elevation` pixels
///
/// `None` for flat owners.
pub fn elevation_shadow(elevation: f32, max_elevation: f32, base: &MutableColor) -> Option<Shadow> {
    if !elevation.is_finite() || elevation <= 0.0 {
        return None;
    }
    let alpha = map_range(elevation, 0.0, max_elevation, MAX_SHADOW_ALPHA, MIN_SHADOW_ALPHA);
    let blur = map_range(elevation, 0.0, max_elevation, MIN_SHADOW_BLUR, MAX_SHADOW_BLUR);
    let color = base.with_alpha(alpha.round() as u8).to_color();
    Some(Shadow::new(color, blur).offset(0.0, (elevation * SHADOW_OFFSET_FACTOR).ceil()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_owner_has_no_shadow() {
        let base = MutableColor::from_argb(0x3000_0000);
        assert!(elevation_shadow(0.0, 24.0, &base).is_none());
        assert!(elevation_shadow(f32::NAN, 24.0, &base).is_none());
    }

    #[test]
    fn test_shadow_softens_with_elevation() {
        let base = MutableColor::from_argb(0x3000_0000);
        let low = elevation_shadow(2.0, 24.0, &base).unwrap();
        let high = elevation_shadow(24.0, 24.0, &base).unwrap();
        assert!(low.color.a > high.color.a);
        assert!(low.blur < high.blur);
        assert!((high.blur - 60.0).abs() < 1e-3);
        assert_eq!(high.color.to_rgba8()[3], 5);
        assert_eq!(low.offset_y, 1.0);
        assert_eq!(high.offset_y, 9.0);
    }

    #[test]
    fn test_elevation_beyond_max_is_clamped() {
        let base = MutableColor::from_argb(0x3000_0000);
        let shadow = elevation_shadow(100.0, 24.0, &base).unwrap();
        assert_eq!(shadow.blur, 60.0);
    }
}
