use strata_geom::Vec3;

/// Normal and tangent for one grid point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceFrame {
    pub normal: Vec3,
    pub tangent: Vec3,
}

/// Central-difference surface frame from the four direct neighbours of a cell.
///
/// Heights must already be in output units (normalized height times the height scale).
/// The normal is the cross product of the two normalized tangents and is not renormalized.
/// Section builds and whole-field passes both go through here.
#[inline]
pub fn surface_frame(left: f32, right: f32, down: f32, up: f32) -> SurfaceFrame {
    let tx = Vec3::new(2.0, 0.0, right - left).normalized();
    let ty = Vec3::new(0.0, 2.0, up - down).normalized();
    SurfaceFrame {
        normal: tx.cross(ty),
        tangent: tx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_neighbourhood_points_up() {
        let f = surface_frame(0.0, 0.0, 0.0, 0.0);
        assert_eq!(f.normal, Vec3::Z);
        assert_eq!(f.tangent, Vec3::X);
    }

    #[test]
    fn slope_along_x_tilts_normal_back() {
        // h(x) = x -> difference of 2 across the stencil
        let f = surface_frame(-1.0, 1.0, 0.0, 0.0);
        let s = 1.0 / 2.0f32.sqrt();
        assert!((f.tangent.x - s).abs() < 1e-6);
        assert!((f.tangent.z - s).abs() < 1e-6);
        assert!((f.normal.x + s).abs() < 1e-6);
        assert!(f.normal.y.abs() < 1e-6);
        assert!((f.normal.z - s).abs() < 1e-6);
    }
}
