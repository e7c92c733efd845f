// Licensed to the .NET Foundation under one or more agreements.
// The .NET Foundation licenses this file to you under the MIT license.
// See the LICENSE file in the project root for more information.

//+----------------------------------------------------------------------------
//
//  Description:  Feathered fill.  Walks the outer (feather) polygon and
//                ramps coverage from 1 at the inner (base) polygon down to
//                0 at the outer one.
//
//                Distances are measured to the nearest polygon *vertex*,
//                not the nearest edge, which is cheap and smooth enough for
//                the densely sampled outlines this is fed.
//

use log::debug;

use crate::error::RasterResult;
use crate::fill::FULL_COVERAGE;
use crate::helpers::fast_inv_sqrt;
use crate::scanline::{rasterize_polygon, SpanSink};
use crate::types::{to_poly_vertices, RasterBuffer};

/// Smallest squared distance from `p` to any vertex of `polygon`.
pub fn min_squared_distance(p: [f32; 2], polygon: &[[f32; 2]]) -> f32 {
    polygon.iter().fold(f32::MAX, |dmin, v| {
        let dx = p[0] - v[0];
        let dy = p[1] - v[1];
        dmin.min(dx * dx + dy * dy)
    })
}

/// Coverage of a point given its squared distances to the inner and outer
/// outlines: `1/di / (1/di + 1/do)`, i.e. `do / (di + do)`.
pub fn feather_coverage(inner_squared: f32, outer_squared: f32) -> f32 {
    let inner = fast_inv_sqrt(inner_squared);
    let outer = fast_inv_sqrt(outer_squared);
    inner / (inner + outer)
}

struct FeatherFiller<'f, 'b, 'p> {
    buffer: &'f mut RasterBuffer<'b>,
    inner: &'p [[f32; 2]],
    outer: &'p [[f32; 2]],
    x_scale: f32,
    y_scale: f32,
    pixels: usize,
}

impl<'f, 'b, 'p> SpanSink for FeatherFiller<'f, 'b, 'p> {
    fn output_span(&mut self, y: i32, x_left: i32, x_right: i32) {
        let py = (y as f32 + 0.5) * self.y_scale;
        let (inner, outer) = (self.inner, self.outer);
        let (x_scale, start) = (self.x_scale, x_left as usize);

        let row = self.buffer.row_mut(y);
        for (i, pixel) in row[start..x_right as usize].iter_mut().enumerate() {
            // Pixels already at full coverage belong to the base fill.
            if *pixel >= FULL_COVERAGE {
                continue;
            }

            let p = [((start + i) as f32 + 0.5) * x_scale, py];
            let coverage =
                feather_coverage(min_squared_distance(p, inner), min_squared_distance(p, outer));
            if !coverage.is_nan() {
                *pixel = coverage;
            }
            self.pixels += 1;
        }
    }
}

/// Blend a feather ramp into `buffer` over the area of `outer`.
///
/// Both outlines need at least three vertices or nothing is drawn.
/// `outer` is expected to enclose `inner`; this is not checked (see
/// `validate::check_feather_pair`). Pixels that already hold full coverage
/// are left alone, so filling `inner` first and then feathering gives a
/// solid core with a soft edge.
pub fn feather_polygon(
    inner: &[[f32; 2]],
    outer: &[[f32; 2]],
    buffer: &mut RasterBuffer,
) -> RasterResult<()> {
    if outer.len() < 3 || inner.len() < 3 {
        debug!(
            "feather: {} inner / {} outer vertices, nothing to draw",
            inner.len(),
            outer.len()
        );
        return Ok(());
    }
    if buffer.width() == 0 || buffer.height() == 0 {
        return Ok(());
    }

    let polygon = to_poly_vertices(outer, buffer.width(), buffer.height())?;
    let clip = buffer.clip_rect();
    let mut filler = FeatherFiller {
        x_scale: 1.0 / buffer.width() as f32,
        y_scale: 1.0 / buffer.height() as f32,
        buffer,
        inner,
        outer,
        pixels: 0,
    };
    rasterize_polygon(&polygon, &clip, &mut filler)?;

    debug!("feather: blended {} pixels", filler.pixels);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lo: f32, hi: f32) -> [[f32; 2]; 4] {
        [[lo, lo], [hi, lo], [hi, hi], [lo, hi]]
    }

    #[test]
    fn coverage_ramps_between_outlines() {
        assert!(feather_coverage(0.0, 1.0) > 0.999);
        assert!(feather_coverage(1.0, 0.0) < 0.001);
        assert!((feather_coverage(0.04, 0.04) - 0.5).abs() < 1e-5);
        assert!(feather_coverage(0.01, 0.04) > feather_coverage(0.02, 0.04));
    }

    #[test]
    fn nearest_vertex_distance() {
        let d = min_squared_distance([0.5, 0.5], &square(0.25, 0.75));
        assert!((d - 0.125).abs() < 1e-6);
        assert_eq!(min_squared_distance([0.0, 0.0], &[]), f32::MAX);
    }

    #[test]
    fn base_needs_three_vertices() {
        let base = square(0.4, 0.6);
        let mut data = vec![0.25; 10 * 10];
        let mut buffer = RasterBuffer::new(&mut data, 10, 10).unwrap();
        feather_polygon(&base[..2], &square(0.2, 0.8), &mut buffer).unwrap();
        feather_polygon(&base[..1], &square(0.2, 0.8), &mut buffer).unwrap();
        assert!(data.iter().all(|&c| c == 0.25));

        let mut buffer = RasterBuffer::new(&mut data, 10, 10).unwrap();
        feather_polygon(&base, &square(0.2, 0.8), &mut buffer).unwrap();
        assert!(data.iter().any(|&c| c != 0.25));
    }

    #[test]
    fn feather_stays_inside_outer_and_below_one() {
        let mut data = vec![0.0; 20 * 20];
        let mut buffer = RasterBuffer::new(&mut data, 20, 20).unwrap();
        feather_polygon(&square(0.4, 0.6), &square(0.2, 0.8), &mut buffer).unwrap();
        for y in 0..20 {
            for x in 0..20 {
                let c = data[y * 20 + x];
                let inside_outer = (4..16).contains(&x) && (4..16).contains(&y);
                if inside_outer {
                    assert!(c > 0.0 && c < 1.0, "{} {} {}", x, y, c);
                } else {
                    assert_eq!(c, 0.0);
                }
            }
        }
    }

    #[test]
    fn full_coverage_is_preserved() {
        let mut data = vec![1.0; 10 * 10];
        let mut buffer = RasterBuffer::new(&mut data, 10, 10).unwrap();
        feather_polygon(&square(0.4, 0.6), &square(0.0, 1.0), &mut buffer).unwrap();
        assert!(data.iter().all(|&c| c == 1.0));
    }

    #[test]
    fn closer_to_inner_is_brighter() {
        let mut data = vec![0.0; 40 * 40];
        let mut buffer = RasterBuffer::new(&mut data, 40, 40).unwrap();
        feather_polygon(&square(0.4, 0.6), &square(0.1, 0.9), &mut buffer).unwrap();
        // walk from the inner corner out towards the outer corner
        let diagonal: Vec<f32> = (4..16).map(|i| data[i * 40 + i]).collect();
        for pair in diagonal.windows(2) {
            assert!(pair[0] <= pair[1], "{:?}", diagonal);
        }
    }
}
