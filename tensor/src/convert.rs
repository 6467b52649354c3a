//! Numeric conversions used when a value is stored under an explicit type.
//!
//! Integers must convert exactly. Reals narrowed to `float32` round to the
//! nearest representable value, as any real-valued literal already does;
//! only values that would overflow to infinity are rejected.

// 2^63, where `as i64` starts saturating
const I64_BOUND: f64 = 9_223_372_036_854_775_808.;

/// `v` as a double, if no precision is lost.
pub fn exact_f64(v: i64) -> Option<f64> {
    let f = v as f64;
    (f < I64_BOUND && f as i64 == v).then_some(f)
}

/// `v` as a single, if no precision is lost.
pub fn exact_f32(v: i64) -> Option<f32> {
    let f = v as f32;
    ((f as f64) < I64_BOUND && f as i64 == v).then_some(f)
}

/// `v` rounded to the nearest single, unless a finite `v` overflows.
pub fn narrow_f32(v: f64) -> Option<f32> {
    let f = v as f32;
    (f.is_finite() || !v.is_finite()).then_some(f)
}

#[test]
fn test_exact() {
    assert_eq!(exact_f64(1 << 53), Some(9_007_199_254_740_992.));
    assert_eq!(exact_f64((1 << 53) + 1), None);
    assert_eq!(exact_f64(i64::MAX), None);
    assert_eq!(exact_f32(-(1 << 24)), Some(-16_777_216.));
    assert_eq!(exact_f32((1 << 24) + 1), None);
    assert_eq!(exact_f32(i64::MAX), None);
}

#[test]
fn test_narrow() {
    assert_eq!(narrow_f32(0.1), Some(0.1f32));
    assert_eq!(narrow_f32(-2.5), Some(-2.5));
    assert_eq!(narrow_f32(1e300), None);
    assert_eq!(narrow_f32(f64::INFINITY), Some(f32::INFINITY));
    assert!(narrow_f32(f64::NAN).is_some_and(f32::is_nan));
}
