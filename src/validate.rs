//! Optional input diagnostics.
//!
//! The rasterizing entry points accept anything and draw what they can. These
//! checks are for callers that would rather hear about a degenerate polygon
//! or a feather outline that does not surround its base.

use crate::error::{RasterError, RasterResult};

/// Signed area of a closed vertex loop (shoelace formula). Positive for
/// clockwise loops in y-down coordinates.
pub fn polygon_area(polygon: &[[f32; 2]]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a[0] as f64 * b[1] as f64 - b[0] as f64 * a[1] as f64
        })
        .sum();
    twice / 2.0
}

/// Even-odd containment test, matching the fill rule the rasterizer uses.
pub fn point_in_polygon(p: [f32; 2], polygon: &[[f32; 2]]) -> bool {
    let mut inside = false;
    let mut j = match polygon.len() {
        0 => return false,
        n => n - 1,
    };
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[j];
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x = (b[0] - a[0]) * (p[1] - a[1]) / (b[1] - a[1]) + a[0];
            if p[0] < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Reject polygons that can never produce coverage.
pub fn check_polygon(polygon: &[[f32; 2]]) -> RasterResult<()> {
    if polygon.len() < 3 {
        return Err(RasterError::TooFewVertices(polygon.len()));
    }
    if let Some(i) = polygon.iter().position(|v| !v[0].is_finite() || !v[1].is_finite()) {
        return Err(RasterError::NonFiniteVertex(i));
    }
    if polygon_area(polygon) == 0.0 {
        return Err(RasterError::ZeroArea);
    }
    Ok(())
}

/// Check that `feather` is a usable outer outline for `base`: both are valid
/// polygons, every base vertex lies inside `feather`, and both loops wind
/// the same way.
pub fn check_feather_pair(base: &[[f32; 2]], feather: &[[f32; 2]]) -> RasterResult<()> {
    check_polygon(base)?;
    check_polygon(feather)?;

    if let Some(i) = base.iter().position(|&v| !point_in_polygon(v, feather)) {
        return Err(RasterError::FeatherNotEnclosing(i));
    }
    if polygon_area(base).signum() != polygon_area(feather).signum() {
        return Err(RasterError::WindingMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INNER: [[f32; 2]; 4] = [[0.4, 0.4], [0.6, 0.4], [0.6, 0.6], [0.4, 0.6]];
    const OUTER: [[f32; 2]; 4] = [[0.2, 0.2], [0.8, 0.2], [0.8, 0.8], [0.2, 0.8]];

    #[test]
    fn area_sign_follows_winding() {
        let a = polygon_area(&OUTER);
        assert!((a - 0.36).abs() < 1e-6);
        let mut reversed = OUTER;
        reversed.reverse();
        assert!((polygon_area(&reversed) + 0.36).abs() < 1e-6);
        assert_eq!(polygon_area(&OUTER[..2]), 0.0);
    }

    #[test]
    fn containment() {
        assert!(point_in_polygon([0.5, 0.5], &OUTER));
        assert!(!point_in_polygon([0.1, 0.5], &OUTER));
        assert!(!point_in_polygon([0.5, 0.9], &OUTER));
        assert!(!point_in_polygon([0.5, 0.5], &[]));
    }

    #[test]
    fn degenerate_polygons_are_reported() {
        assert_eq!(check_polygon(&OUTER[..2]), Err(RasterError::TooFewVertices(2)));
        assert_eq!(
            check_polygon(&[[0.0, 0.0], [f32::NAN, 0.0], [1.0, 1.0]]),
            Err(RasterError::NonFiniteVertex(1))
        );
        let line = [[0.0, 0.0], [0.5, 0.5], [1.0, 1.0]];
        assert_eq!(check_polygon(&line), Err(RasterError::ZeroArea));
        assert_eq!(check_polygon(&OUTER), Ok(()));
    }

    #[test]
    fn feather_pair_checks() {
        assert_eq!(check_feather_pair(&INNER, &OUTER), Ok(()));
        assert_eq!(check_feather_pair(&OUTER, &INNER), Err(RasterError::FeatherNotEnclosing(0)));

        let mut reversed = OUTER;
        reversed.reverse();
        assert_eq!(check_feather_pair(&INNER, &reversed), Err(RasterError::WindingMismatch));
    }
}
