/// Keeps the UNI ratio finite when INV2 is zero
pub const UNI_EPSILON:f64 = 1e-12;

/// Plain ratio INV1 / (INV2 + eps). This simulator does not use the
/// INV1*INV2 / (INV1^2 + INV2^2) combination.
///
/// For INV2 >= 0 the result is finite as long as |INV1| < f64::MAX * eps;
/// larger inputs overflow to +/-inf.
pub fn compose_uni(inv1:f64,inv2:f64) -> f64 {
    inv1 / (inv2 + UNI_EPSILON)
}

#[test]
fn zero_inv2_stays_finite(){
    let u = compose_uni(0.5,0.0);
    assert!(u.is_finite());
    assert_eq!(u, 0.5e12);
    assert_eq!(compose_uni(0.0,0.0), 0.0);
}

#[test]
fn plain_ratio(){
    let u = compose_uni(-0.018,-0.078);
    assert!((u - 0.018 / 0.078).abs() < 1e-9);
}

#[test]
fn huge_inv1_overflows_past_the_bound(){
    assert!(compose_uni(f64::MAX * UNI_EPSILON * 0.5, 0.0).is_finite());
    assert!(compose_uni(1e300, 0.0).is_infinite());
}
