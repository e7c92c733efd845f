// Licensed to the .NET Foundation under one or more agreements.
// The .NET Foundation licenses this file to you under the MIT license.
// See the LICENSE file in the project root for more information.

//+----------------------------------------------------------------------------
//
//  Description:  Edge table construction and active edge list maintenance
//                shared by the fill, feather and span-index engines.
//

use std::cell::Cell;

use crate::error::RasterResult;
use crate::helpers::{int32x32_to64, quotient_remainder, try_vec_with_capacity};
use crate::types::{ClipRect, PolyVertex};

/// One directed, non-horizontal polygon edge.
///
/// A call's edges are stored together in one `Vec`, sorted, and only then
/// linked into the active list through `next`.
pub struct Edge<'a> {
    pub next: Cell<Option<&'a Edge<'a>>>, // Next active edge
    pub x: Cell<i32>,                     // Current X location
    pub x_dir: i32,                       // -1 or 1
    pub x_shift: i32,                     // Whole-pixel X step per scanline
    pub drift: Cell<i32>,                 // Fractional-slope accumulator, kept <= 0
    pub drift_inc: i32,                   // Accumulator increment per scanline
    pub drift_dec: i32,                   // Decrement when the accumulator rolls over
    pub start_y: i32,                     // First scanline
    pub remaining: Cell<i32>,             // Scanlines left, including the current one
}

impl<'a> Edge<'a> {
    fn sentinel(x: i32) -> Self {
        Edge {
            next: Cell::new(None),
            x: Cell::new(x),
            x_dir: 1,
            x_shift: 0,
            drift: Cell::new(0),
            drift_inc: 0,
            drift_dec: 1,
            start_y: i32::MAX,
            remaining: Cell::new(i32::MAX),
        }
    }

    /// Head of an active edge list. Sits left of every real edge.
    pub fn head() -> Self {
        Edge::sentinel(i32::MIN)
    }
}

/// Sorted, not-yet-active edges plus the head of the active edge list.
pub struct EdgeTable<'a> {
    pub inactive: &'a [Edge<'a>],
    pub active: &'a Edge<'a>,
}

impl<'a> EdgeTable<'a> {
    pub fn new(inactive: &'a [Edge<'a>], active: &'a Edge<'a>) -> Self {
        EdgeTable { inactive, active }
    }

    pub fn is_empty(&self) -> bool {
        self.inactive.is_empty()
    }

    /// Scanline of the topmost edge.
    pub fn first_y(&self) -> Option<i32> {
        self.inactive.first().map(|e| e.start_y)
    }
}

/**************************************************************************\
*
* Function Description:
*
*   The inactive table is sorted with 'y' as the primary key and 'x' as
*   the secondary key.  This routine packs both into a single i64.
*
\**************************************************************************/

fn yx(x: i32, y: i32) -> i64 {
    // Bias 'x' by i32::MAX so that it's effectively unsigned:
    ((y as i64) << 32) | ((x as i64 + i32::MAX as i64) & 0xffff_ffff)
}

/**************************************************************************\
*
* Function Description:
*
*   Clip the edge vertically: step the edge down to the first unclipped
*   scan-line in one go rather than one scan-line at a time.
*
\**************************************************************************/

fn clip_edge(edge: &mut Edge, y_clip_top: i32) {
    let rows = y_clip_top - edge.start_y;
    debug_assert!(rows > 0 && rows < edge.remaining.get());

    // The accumulator picks up 'drift_inc' every scan-line and gives back
    // 'drift_dec' (with one extra pixel of travel) whenever it goes positive.

    let accumulated = edge.drift.get() as i64 + int32x32_to64(rows, edge.drift_inc);
    let dy = edge.drift_dec as i64;
    let corrections = if accumulated > 0 { (accumulated + dy - 1) / dy } else { 0 };
    let travel = int32x32_to64(rows, edge.x_shift) + corrections * edge.x_dir as i64;

    edge.x.set((edge.x.get() as i64 + travel) as i32);
    edge.drift.set((accumulated - corrections * dy) as i32);
    edge.remaining.set(edge.remaining.get() - rows);
    edge.start_y = y_clip_top;
}

/**************************************************************************\
*
* Function Description:
*
*   Build the edge records for a closed vertex loop, sorted by starting
*   'y' then 'x'.
*
*   Horizontal edges are dropped; the edges either side of them close the
*   span implicitly.  Edges entirely above or below 'clip' are dropped too,
*   and edges starting above it are advanced to its top row.
*
\**************************************************************************/

pub fn initialize_edges<'a>(
    vertices: &[PolyVertex],
    clip: &ClipRect,
) -> RasterResult<Vec<Edge<'a>>> {
    // At most one record per vertex, so the pushes below never reallocate.
    let mut edges = try_vec_with_capacity(vertices.len())?;

    let mut previous = match vertices.last() {
        Some(v) => *v,
        None => return Ok(edges),
    };

    for &vertex in vertices {
        let (mut beg, mut end) = (vertex, previous);
        previous = vertex;

        if beg.y == end.y {
            continue;
        }
        if beg.y > end.y {
            std::mem::swap(&mut beg, &mut end);
        }

        // The edge covers scan-lines beg.y .. end.y - 1:

        if end.y <= clip.top || beg.y >= clip.bottom {
            continue;
        }

        let dy = end.y - beg.y;
        let dx = end.x - beg.x;
        let x_dir = if dx < 0 { -1 } else { 1 };
        let (quotient, remainder) = quotient_remainder(dx.abs(), dy);

        let mut edge = Edge {
            next: Cell::new(None),
            x: Cell::new(beg.x),
            x_dir,
            x_shift: quotient * x_dir,
            drift: Cell::new(0),
            drift_inc: remainder,
            drift_dec: dy,
            start_y: beg.y,
            remaining: Cell::new(dy),
        };

        if beg.y < clip.top {
            clip_edge(&mut edge, clip.top);
        }

        edges.push(edge);
    }

    edges.sort_by_key(|e| yx(e.x.get(), e.start_y));

    Ok(edges)
}

/**************************************************************************\
*
* Function Description:
*
*   Insert every pending edge that starts on 'y' into the active edge
*   list, keeping the list in ascending 'x' order.  Returns how many edges
*   were taken from 'pending'.
*
\**************************************************************************/

pub fn insert_new_edges<'a>(active: &'a Edge<'a>, pending: &'a [Edge<'a>], y: i32) -> usize {
    let mut list = active;
    let mut inserted = 0;

    // 'pending' is sorted by x within a scan-line, so the search for each
    // edge can resume where the previous one was linked in.

    for new_active in pending.iter().take_while(|e| e.start_y == y) {
        while let Some(next) = list.next.get() {
            if next.x.get() >= new_active.x.get() {
                break;
            }
            list = next;
        }

        new_active.next.set(list.next.get());
        list.next.set(Some(new_active));
        inserted += 1;
    }

    inserted
}

/**************************************************************************\
*
* Function Description:
*
*   Retire edges that have run out of scan-lines, advance the rest by one
*   scan-line, and re-sort the list if any two edges crossed.
*
\**************************************************************************/

pub fn advance_and_update_active_list<'a>(active: &'a Edge<'a>) {
    let mut out_of_order = false;
    let mut previous = active;
    let mut prev_x = active.x.get();

    while let Some(current) = previous.next.get() {
        let remaining = current.remaining.get() - 1;
        if remaining == 0 {
            // This edge is stale, remove it from the list:
            previous.next.set(current.next.get());
            continue;
        }
        current.remaining.set(remaining);

        // Advance the DDA:

        let mut x = current.x.get() + current.x_shift;
        let mut drift = current.drift.get() + current.drift_inc;
        if drift > 0 {
            x += current.x_dir;
            drift -= current.drift_dec;
        }
        current.x.set(x);
        current.drift.set(drift);

        // Is this entry out-of-order with respect to the previous one?
        out_of_order |= prev_x > x;

        previous = current;
        prev_x = x;
    }

    // Crossings are rare, so only pay for the sort when one happened.

    if out_of_order {
        sort_active_edges(active);
    }

    #[cfg(debug_assertions)]
    assert_active_list_order(active);
}

/**************************************************************************\
*
* Function Description:
*
*   Bubble-sort the active list into ascending 'x' order.  Edges keep good
*   locality from one scan-line to the next, so this rarely does more than
*   one swap; passes repeat until nothing moves, which also untangles
*   several edges crossing on the same scan-line.
*
\**************************************************************************/

pub fn sort_active_edges<'a>(active: &'a Edge<'a>) {
    loop {
        let mut swap_occurred = false;
        let mut previous = active;

        while let Some(current) = previous.next.get() {
            let next = match current.next.get() {
                Some(next) => next,
                None => break,
            };

            if next.x.get() < current.x.get() {
                previous.next.set(Some(next));
                current.next.set(next.next.get());
                next.next.set(Some(current));
                swap_occurred = true;
                previous = next;
            } else {
                previous = current;
            }
        }

        if !swap_occurred {
            break;
        }
    }
}

/**************************************************************************\
*
* Function Description:
*
*   Debug check of the active edge list: sorted, and an even number of
*   edges.  A closed loop crosses every scan-line an even number of times,
*   so an odd count means an edge was lost or never initialized.
*
\**************************************************************************/

#[cfg(debug_assertions)]
pub fn assert_active_list(active: &Edge) {
    let count = assert_active_list_order(active);
    debug_assert!(count % 2 == 0);
}

#[cfg(debug_assertions)]
fn assert_active_list_order(active: &Edge) -> usize {
    let mut count = 0;
    let mut prev_x = active.x.get();
    let mut current = active.next.get();
    while let Some(edge) = current {
        debug_assert!(prev_x <= edge.x.get());
        prev_x = edge.x.get();
        count += 1;
        current = edge.next.get();
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32) -> PolyVertex {
        PolyVertex { x, y }
    }

    fn everything() -> ClipRect {
        ClipRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX)
    }

    fn edges_of<'a>(vertices: &[PolyVertex]) -> Vec<Edge<'a>> {
        initialize_edges(vertices, &everything()).unwrap()
    }

    fn active_xs<'a>(active: &'a Edge<'a>) -> Vec<i32> {
        let mut xs = Vec::new();
        let mut current = active.next.get();
        while let Some(edge) = current {
            xs.push(edge.x.get());
            current = edge.next.get();
        }
        xs
    }

    // Make `edge` the only entry of the active list headed by `head`.
    fn activate<'a>(head: &'a Edge<'a>, edge: &'a Edge<'a>) {
        head.next.set(Some(edge));
        edge.next.set(None);
    }

    #[test]
    fn horizontal_edges_are_dropped() {
        let edges = edges_of(&[v(1, 1), v(3, 1), v(3, 3), v(1, 3)]);
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.start_y == 1 && e.remaining.get() == 2));
        assert_eq!(edges[0].x.get(), 1);
        assert_eq!(edges[1].x.get(), 3);
    }

    #[test]
    fn all_horizontal_polygon_has_no_edges() {
        let edges = edges_of(&[v(0, 2), v(5, 2), v(9, 2)]);
        let head = Edge::head();
        let table = EdgeTable::new(&edges, &head);
        assert!(table.is_empty());
        assert_eq!(table.first_y(), None);
    }

    #[test]
    fn edge_storage_is_reserved_per_vertex() {
        let star = [v(5, 0), v(7, 9), v(0, 3), v(10, 3), v(3, 9)];
        let edges = edges_of(&star);
        // (0, 3) -> (10, 3) is horizontal.
        assert_eq!(edges.len(), 4);
        assert!(edges.capacity() >= star.len());

        let edges = initialize_edges(&star, &ClipRect::new(0, 0, 10, 2)).unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.start_y == 0 && e.x.get() == 5));
    }

    #[test]
    fn edges_sorted_by_y_then_x() {
        let edges = edges_of(&[v(5, 0), v(9, 4), v(6, 8), v(0, 3)]);
        let keys: Vec<(i32, i32)> = edges.iter().map(|e| (e.start_y, e.x.get())).collect();
        assert_eq!(keys, vec![(0, 5), (0, 5), (3, 0), (4, 9)]);

        let head = Edge::head();
        assert_eq!(EdgeTable::new(&edges, &head).first_y(), Some(0));
    }

    #[test]
    fn slope_parameters() {
        let edges = edges_of(&[v(10, 0), v(7, 8), v(20, 8)]);

        // steep edge going left: dx = -3, dy = 8
        let steep = edges.iter().find(|e| e.x_dir == -1).unwrap();
        assert_eq!((steep.x_shift, steep.drift_inc, steep.drift_dec), (0, 3, 8));

        // shallow edge going right: dx = 10, dy = 8
        let shallow = edges.iter().find(|e| e.x_dir == 1).unwrap();
        assert_eq!((shallow.x_shift, shallow.drift_inc, shallow.drift_dec), (1, 2, 8));
    }

    #[test]
    fn stepping_reaches_the_far_endpoint() {
        let cases = [(3, 8), (-3, 8), (10, 8), (-10, 8), (8, 8), (0, 5), (17, 3), (-1, 7)];
        for &(dx, dy) in &cases {
            let edges = edges_of(&[v(0, 0), v(dx, dy), v(dx - 50, 2 * dy + 1)]);
            let edge = edges.iter().find(|e| e.start_y == 0 && e.drift_dec == dy).unwrap();
            let head = Edge::head();
            activate(&head, edge);
            for _ in 0..dy - 1 {
                advance_and_update_active_list(&head);
            }
            // one scan-line before the end, x is within a pixel of the exact line
            let exact = dx as f64 * (dy - 1) as f64 / dy as f64;
            assert!((edge.x.get() as f64 - exact).abs() <= 1.0, "{} {}", dx, dy);
            // and the last advance retires it
            advance_and_update_active_list(&head);
            assert!(head.next.get().is_none());
        }
    }

    #[test]
    fn clip_edge_matches_stepping() {
        for &(dx, dy) in &[(3, 8), (-3, 8), (23, 8), (-23, 8), (0, 9)] {
            for top in 1..dy {
                let loop_ = [v(4, 0), v(4 + dx, dy), v(-100, 3 * dy)];

                let stepped = edges_of(&loop_);
                let edge = stepped.iter().find(|e| e.start_y == 0 && e.drift_dec == dy).unwrap();
                let head = Edge::head();
                activate(&head, edge);
                for _ in 0..top {
                    advance_and_update_active_list(&head);
                }

                let clip = ClipRect::new(i32::MIN, top, i32::MAX, i32::MAX);
                let clipped = initialize_edges(&loop_, &clip).unwrap();
                let jumped = clipped.iter().find(|e| e.drift_dec == dy).unwrap();

                assert_eq!(jumped.start_y, top);
                assert_eq!(jumped.x.get(), edge.x.get(), "{} {} {}", dx, dy, top);
                assert_eq!(jumped.drift.get(), edge.drift.get());
                assert_eq!(jumped.remaining.get(), edge.remaining.get());
            }
        }
    }

    #[test]
    fn edges_outside_clip_rows_are_dropped() {
        let clip = ClipRect::new(0, 10, 100, 20);
        assert!(initialize_edges(&[v(0, 0), v(5, 9), v(9, 0)], &clip).unwrap().is_empty());
        assert!(initialize_edges(&[v(0, 20), v(5, 29), v(9, 20)], &clip).unwrap().is_empty());
    }

    fn edge_at<'a>(x: i32, y: i32) -> Edge<'a> {
        let mut edge = Edge::sentinel(x);
        edge.start_y = y;
        edge
    }

    #[test]
    fn insertion_keeps_x_order() {
        let first = [edge_at(2, 0), edge_at(8, 0)];
        let later = [edge_at(5, 2), edge_at(5, 2), edge_at(9, 2), edge_at(1, 3)];
        let head = Edge::head();

        assert_eq!(insert_new_edges(&head, &first, 0), 2);
        assert_eq!(active_xs(&head), vec![2, 8]);

        assert_eq!(insert_new_edges(&head, &later, 2), 3);
        assert_eq!(active_xs(&head), vec![2, 5, 5, 8, 9]);
    }

    #[test]
    fn bubble_sort_untangles_multiple_crossings() {
        let edges = [9, 7, 5, 3, 1].map(Edge::sentinel);
        let head = Edge::head();
        let mut prev = &head;
        for edge in &edges {
            prev.next.set(Some(edge));
            prev = edge;
        }
        sort_active_edges(&head);
        assert_eq!(active_xs(&head), vec![1, 3, 5, 7, 9]);
    }
}
