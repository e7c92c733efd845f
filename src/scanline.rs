// Licensed to the .NET Foundation under one or more agreements.
// The .NET Foundation licenses this file to you under the MIT license.
// See the LICENSE file in the project root for more information.

//+----------------------------------------------------------------------------
//
//  Description:  The scan-line walk.  Every engine runs the same walk and
//                differs only in what it does with each span.
//

use log::{debug, trace};

#[cfg(debug_assertions)]
use crate::edge_table::assert_active_list;
use crate::edge_table::{
    advance_and_update_active_list, initialize_edges, insert_new_edges, Edge, EdgeTable,
};
use crate::error::RasterResult;
use crate::types::{ClipRect, PolyVertex};

/// Receives the spans produced by the scan-line walk.
///
/// Spans arrive in increasing `y`, left to right within a row, already
/// clamped to the clip rectangle and never empty.
pub trait SpanSink {
    fn output_span(&mut self, y: i32, x_left: i32, x_right: i32);
}

/**************************************************************************\
*
* Function Description:
*
*   Pair up the active edges left to right and output one span per pair.
*
\**************************************************************************/

fn fill_active_edges<'a, S: SpanSink>(active: &'a Edge<'a>, y: i32, clip: &ClipRect, sink: &mut S) {
    if !clip.contains_row(y) {
        return;
    }

    let mut current = active.next.get();
    while let Some(left) = current {
        let right = match left.next.get() {
            Some(right) => right,
            None => break,
        };

        // Right bounds are exclusive, so spans meeting at a shared vertex
        // never overdraw.

        let x_left = left.x.get().max(clip.left);
        let x_right = right.x.get().min(clip.right);
        if x_left < x_right {
            sink.output_span(y, x_left, x_right);
        }

        current = right.next.get();
    }
}

/**************************************************************************\
*
* Function Description:
*
* For each scan-line to be filled:
*
*   1.  Insert into the active edge list any edges new to this scan-line
*   2.  Hand the spans between pairs of active edges to the sink
*   3.  Retire finished edges and advance the rest
*   4.  If any active edges are out of order, re-sort the active edge list
*
*   The walk stops at the bottom of 'clip', and skips straight to the next
*   pending edge whenever the active list runs dry.
*
\**************************************************************************/

pub fn rasterize_edges<'a, S: SpanSink>(table: &EdgeTable<'a>, clip: &ClipRect, sink: &mut S) {
    let inactive = table.inactive;
    let active = table.active;

    let mut y = match table.first_y() {
        Some(y) => y,
        None => return,
    };
    let mut next_inactive = 0;

    while y < clip.bottom {
        next_inactive += insert_new_edges(active, &inactive[next_inactive..], y);

        #[cfg(debug_assertions)]
        assert_active_list(active);

        fill_active_edges(active, y, clip, sink);

        advance_and_update_active_list(active);
        y += 1;

        if active.next.get().is_none() {
            match inactive.get(next_inactive) {
                Some(edge) => y = edge.start_y,
                None => break,
            }
        }
    }
}

/// Run the scan-line walk over one closed polygon.
///
/// Fewer than three vertices, or a polygon with no non-horizontal edges in
/// `clip`, produces no spans and is not an error.
pub fn rasterize_polygon<S: SpanSink>(
    vertices: &[PolyVertex],
    clip: &ClipRect,
    sink: &mut S,
) -> RasterResult<()> {
    if vertices.len() < 3 {
        debug!("skipping polygon with {} vertices", vertices.len());
        return Ok(());
    }
    if clip.is_empty() {
        debug!("skipping polygon, clip {:?} is empty", clip);
        return Ok(());
    }

    let edges = initialize_edges(vertices, clip)?;
    let head = Edge::head();
    let table = EdgeTable::new(&edges, &head);
    if table.is_empty() {
        trace!("no edges cross clip {:?}", clip);
        return Ok(());
    }

    trace!(
        "edge table: {} edges from {} vertices, first scan-line {:?}",
        table.inactive.len(),
        vertices.len(),
        table.first_y()
    );

    rasterize_edges(&table, clip, sink);
    Ok(())
}
