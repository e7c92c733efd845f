// Licensed to the .NET Foundation under one or more agreements.
// The .NET Foundation licenses this file to you under the MIT license.
// See the LICENSE file in the project root for more information.

//+----------------------------------------------------------------------------
//
//  Description:  Binary (0 / 1) polygon fill.
//

use log::debug;

use crate::error::RasterResult;
use crate::scanline::{rasterize_polygon, SpanSink};
use crate::types::{to_poly_vertices, RasterBuffer};

/// Full coverage written by the binary filler.
pub const FULL_COVERAGE: f32 = 1.0;

/// Writes full coverage into every span.
struct CoverageFiller<'f, 'b> {
    buffer: &'f mut RasterBuffer<'b>,
    spans: usize,
}

impl<'f, 'b> SpanSink for CoverageFiller<'f, 'b> {
    fn output_span(&mut self, y: i32, x_left: i32, x_right: i32) {
        self.buffer.row_mut(y)[x_left as usize..x_right as usize].fill(FULL_COVERAGE);
        self.spans += 1;
    }
}

/// Fill `vertices` (normalized `[0, 1]` coordinates, either winding) into
/// `buffer` with coverage 1.0. Pixels outside the polygon are untouched.
///
/// Fewer than three vertices is a successful no-op, so `Ok(())` does not
/// mean anything was drawn.
pub fn fill_polygon(vertices: &[[f32; 2]], buffer: &mut RasterBuffer) -> RasterResult<()> {
    if vertices.len() < 3 {
        debug!("fill: {} vertices, nothing to draw", vertices.len());
        return Ok(());
    }

    let polygon = to_poly_vertices(vertices, buffer.width(), buffer.height())?;
    let clip = buffer.clip_rect();
    let mut filler = CoverageFiller { buffer, spans: 0 };
    rasterize_polygon(&polygon, &clip, &mut filler)?;

    debug!("fill: {} spans from {} vertices", filler.spans, vertices.len());
    Ok(())
}
