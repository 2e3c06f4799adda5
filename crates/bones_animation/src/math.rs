//! Range helpers

/// Linearly remap `value` from `[from_min, from_max]` to `[to_min, to_max]`,
/// clamping the result to the target range
///
/// A degenerate source range maps everything at or past `from_max` to
/// `to_max` and everything else to `to_min`.
pub fn map_range(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    let (low, high) = if to_min <= to_max { (to_min, to_max) } else { (to_max, to_min) };
    let span = from_max - from_min;
    if span.abs() <= f32::EPSILON || span.is_nan() {
        return if value >= from_max { to_max } else { to_min };
    }
    let mapped = (value - from_min) * (to_max - to_min) / span + to_min;
    if mapped.is_nan() {
        return to_min;
    }
    mapped.clamp(low, high)
}
