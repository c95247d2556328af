use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use strata_geom::Vec3;

fn approx_zero_scaled(val: f32, scale: f32, atol: f32, rtol: f32) -> bool {
    val.abs() <= atol + rtol * scale
}

fn bounded_nonzero_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded_nonzero", |v| {
        let a = v.abs();
        v.is_finite() && (1e-3..=1e3).contains(&a)
    })
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_nonzero_f32(), bounded_nonzero_f32(), bounded_nonzero_f32())
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // a·(a×b) = 0 and b·(a×b) = 0
    #[test]
    fn cross_is_orthogonal(a in arb_vec3(), b in arb_vec3()) {
        let c = a.cross(b);
        prop_assert!(approx_zero_scaled(a.dot(c), a.length() * c.length(), 1e-4, 1e-4));
        prop_assert!(approx_zero_scaled(b.dot(c), b.length() * c.length(), 1e-4, 1e-4));
    }

    // Normalized non-zero vectors have unit length
    #[test]
    fn normalized_is_unit(a in arb_vec3()) {
        prop_assert!((a.normalized().length() - 1.0).abs() <= 1e-4);
    }
}
