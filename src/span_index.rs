// Licensed to the .NET Foundation under one or more agreements.
// The .NET Foundation licenses this file to you under the MIT license.
// See the LICENSE file in the project root for more information.

//+----------------------------------------------------------------------------
//
//  Description:  Span indexing.  Runs the scan-line walk twice, once to
//                count spans and once to record them, producing a per-row
//                index that lets disjoint row ranges be filled without
//                sharing any mutable state.
//

use log::debug;

use crate::error::{RasterError, RasterResult};
use crate::fill::FULL_COVERAGE;
use crate::helpers::{try_vec_filled, try_vec_with_capacity};
use crate::scanline::{rasterize_polygon, SpanSink};
use crate::types::{to_poly_vertices, ClipRect, RasterBuffer, Span};

/// Per-row spans of one polygon.
///
/// `row_index[y]` is the 1-based position in `spans` of the first span on
/// row `y`, or 0 when the row is empty. `spans[0]` is an unused placeholder.
/// When any span exists `row_index[height]` holds `spans.len()`, one past the
/// last span. A polygon with no spans has all-zero `row_index` and no
/// `spans` at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanIndex {
    width: i32,
    height: i32,
    row_index: Vec<i32>,
    spans: Vec<Span>,
}

struct SpanCounter {
    count: usize,
}

impl SpanSink for SpanCounter {
    fn output_span(&mut self, _y: i32, _x_left: i32, _x_right: i32) {
        self.count += 1;
    }
}

struct SpanRecorder<'s> {
    row_index: &'s mut [i32],
    spans: &'s mut Vec<Span>,
}

impl<'s> SpanSink for SpanRecorder<'s> {
    fn output_span(&mut self, y: i32, x_left: i32, x_right: i32) {
        let first = &mut self.row_index[y as usize];
        if *first == 0 {
            *first = self.spans.len() as i32;
        }
        self.spans.push(Span { x_start: x_left, x_end: x_right });
    }
}

// The row table (zeroed) and room for the span table.  If the second
// allocation fails the first is dropped on the way out.
fn alloc_tables(rows: usize, span_slots: usize) -> RasterResult<(Vec<i32>, Vec<Span>)> {
    let row_index = try_vec_filled(rows, 0)?;
    let spans = try_vec_with_capacity(span_slots)?;
    Ok((row_index, spans))
}

impl SpanIndex {
    fn empty(width: i32, height: i32) -> RasterResult<Self> {
        Ok(SpanIndex {
            width,
            height,
            row_index: try_vec_filled(height as usize + 1, 0)?,
            spans: Vec::new(),
        })
    }

    /// Index the spans of `vertices` (normalized coordinates) on a
    /// `width` x `height` raster, optionally restricted to `clip`.
    pub fn build(
        vertices: &[[f32; 2]],
        width: i32,
        height: i32,
        clip: Option<ClipRect>,
    ) -> RasterResult<Self> {
        if width < 0 || height < 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let bounds = ClipRect::from_size(width, height);
        let clip = clip.map_or(bounds, |c| bounds.intersect(&c));

        if vertices.len() < 3 {
            debug!("span index: {} vertices, nothing to index", vertices.len());
            return SpanIndex::empty(width, height);
        }

        let polygon = to_poly_vertices(vertices, width, height)?;

        // Pass 1: count.

        let mut counter = SpanCounter { count: 0 };
        rasterize_polygon(&polygon, &clip, &mut counter)?;
        if counter.count == 0 {
            return SpanIndex::empty(width, height);
        }

        // Pass 2: rebuild the edge table and record.

        let (mut row_index, mut spans) = alloc_tables(height as usize + 1, counter.count + 1)?;
        spans.push(Span::default());

        let mut recorder = SpanRecorder { row_index: &mut row_index, spans: &mut spans };
        rasterize_polygon(&polygon, &clip, &mut recorder)?;
        debug_assert_eq!(spans.len(), counter.count + 1);

        row_index[height as usize] = spans.len() as i32;

        debug!("span index: {} spans over {} rows", counter.count, height);
        Ok(SpanIndex { width, height, row_index, spans })
    }

    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }

    /// The raw 1-based row table, `height + 1` entries.
    pub fn row_index(&self) -> &[i32] {
        &self.row_index
    }

    /// The raw 1-based span table; slot 0 is a placeholder.
    pub fn raw_spans(&self) -> &[Span] {
        &self.spans
    }

    /// Give up the row table and span table.
    pub fn into_parts(self) -> (Vec<i32>, Vec<Span>) {
        (self.row_index, self.spans)
    }

    pub fn span_count(&self) -> usize {
        self.spans.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.span_count() == 0
    }

    /// Spans on row `y`, left to right. Out-of-range rows are empty.
    pub fn spans_for_row(&self, y: i32) -> &[Span] {
        if y < 0 || y >= self.height {
            return &[];
        }
        let y = y as usize;
        let start = self.row_index[y];
        if start == 0 {
            return &[];
        }
        // The next non-empty row (or the trailing entry) marks the end.
        let end = self.row_index[y + 1..]
            .iter()
            .copied()
            .find(|&i| i != 0)
            .unwrap_or(start);
        &self.spans[start as usize..end as usize]
    }

    /// Every row that has spans, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = (i32, &[Span])> + '_ {
        (0..self.height)
            .map(move |y| (y, self.spans_for_row(y)))
            .filter(|(_, spans)| !spans.is_empty())
    }

    fn check_target(&self, buffer: &RasterBuffer) -> RasterResult<()> {
        if buffer.width() != self.width || buffer.height() != self.height {
            return Err(RasterError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width: buffer.width(),
                height: buffer.height(),
            });
        }
        Ok(())
    }

    /// Write full coverage into every indexed span.
    pub fn rasterize_into(&self, buffer: &mut RasterBuffer) -> RasterResult<()> {
        self.check_target(buffer)?;
        let width = self.width as usize;
        if width == 0 {
            return Ok(());
        }
        for (y, row) in buffer.pixels_mut().chunks_mut(width).enumerate() {
            fill_row(row, self.spans_for_row(y as i32));
        }
        Ok(())
    }

    /// Like `rasterize_into`, with rows spread over the rayon thread pool.
    /// Each worker owns a disjoint row slice of the buffer.
    #[cfg(feature = "multithreading")]
    pub fn par_rasterize_into(&self, buffer: &mut RasterBuffer) -> RasterResult<()> {
        use rayon::prelude::*;

        self.check_target(buffer)?;
        let width = self.width as usize;
        if width == 0 {
            return Ok(());
        }
        buffer
            .pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| fill_row(row, self.spans_for_row(y as i32)));
        Ok(())
    }
}

fn fill_row(row: &mut [f32], spans: &[Span]) {
    for span in spans {
        row[span.x_start as usize..span.x_end as usize].fill(FULL_COVERAGE);
    }
}
