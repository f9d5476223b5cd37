//! Body-mass index.

use super::round1;

/// `weight / (height_m)^2`, rounded to one decimal.
///
/// Returns `0.0` when either input is zero, negative or not finite; callers
/// treat `0.0` as "no BMI available".
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    if !(height_cm.is_finite() && weight_kg.is_finite()) || height_cm <= 0.0 || weight_kg <= 0.0 {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    round1(weight_kg / (height_m * height_m))
}
