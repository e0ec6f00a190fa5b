/// The point scale every estimate is snapped to.
pub const FIBONACCI_SCALE: [u32; 7] = [1, 2, 3, 5, 8, 13, 21];

/// Snap a continuous estimate to the closest scale value.
///
/// Ties go to the smaller value (2.5 -> 2). Non-finite input snaps to an end
/// of the scale.
pub fn nearest_fibonacci(value: f64) -> u32 {
    if !value.is_finite() {
        return if value > 0.0 {
            FIBONACCI_SCALE[FIBONACCI_SCALE.len() - 1]
        } else {
            FIBONACCI_SCALE[0]
        };
    }

    let mut best = FIBONACCI_SCALE[0];
    let mut best_diff = (value - f64::from(best)).abs();
    for &candidate in &FIBONACCI_SCALE[1..] {
        let diff = (value - f64::from(candidate)).abs();
        if diff < best_diff {
            best = candidate;
            best_diff = diff;
        }
    }
    best
}
