/*!
Scan-line polygon rasterization into float coverage masks.

Polygons are closed loops of vertices in normalized `[0, 1]` coordinates,
scaled to the target buffer and walked with an edge table / active edge list
using integer incremental stepping. Three engines share that walk:

* [`raskterize`] fills the polygon with coverage `1.0`.
* [`raskterize_feather`] ramps coverage from `1.0` at a base outline down to
  `0.0` at an enclosing feather outline.
* [`build_span_index`] records the spans of each row without touching any
  pixels, so rows can later be filled independently (see
  [`SpanIndex::rasterize_into`]).

Degenerate input (fewer than three vertices, zero area, nothing on the
buffer) draws nothing and still succeeds; the only failures these functions
report are allocation failure and a malformed buffer. Callers that want
degenerate input diagnosed can use a [`Rasterizer`] with
[`RasterOptions::validate`] set, or the [`validate`] module directly.

```
let square = [[0.25, 0.25], [0.75, 0.25], [0.75, 0.75], [0.25, 0.75]];
let mut data = vec![0.0; 16];
let mut buffer = raskter::RasterBuffer::new(&mut data, 4, 4).unwrap();
raskter::raskterize(&square, &mut buffer).unwrap();
assert_eq!(data[5], 1.0);
```
*/

mod edge_table;
mod error;
mod feather;
mod fill;
mod helpers;
mod scanline;
mod span_index;
mod types;
pub mod validate;

#[cfg(feature = "c_bindings")]
pub mod c_bindings;

use log::warn;

pub use error::{RasterError, RasterResult};
pub use feather::{feather_coverage, min_squared_distance};
pub use fill::FULL_COVERAGE;
pub use scanline::SpanSink;
pub use span_index::SpanIndex;
pub use types::{ClipRect, PolyVertex, RasterBuffer, Span, PIXEL_COORDINATE_MAX};

/// Behaviour switches for a [`Rasterizer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    /// Reject degenerate polygons and feather outlines that do not surround
    /// their base, instead of silently drawing nothing (or garbage).
    pub validate: bool,
}

/// The engines bundled with a set of [`RasterOptions`].
#[derive(Debug, Default, Clone)]
pub struct Rasterizer {
    options: RasterOptions,
}

fn rejected(err: RasterError) -> RasterError {
    warn!("rejecting polygon input: {}", err);
    err
}

impl Rasterizer {
    pub fn new(options: RasterOptions) -> Self {
        Rasterizer { options }
    }

    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    pub fn fill(&self, vertices: &[[f32; 2]], buffer: &mut RasterBuffer) -> RasterResult<()> {
        if self.options.validate {
            validate::check_polygon(vertices).map_err(rejected)?;
        }
        fill::fill_polygon(vertices, buffer)
    }

    pub fn feather(
        &self,
        base: &[[f32; 2]],
        feather: &[[f32; 2]],
        buffer: &mut RasterBuffer,
    ) -> RasterResult<()> {
        if self.options.validate {
            validate::check_feather_pair(base, feather).map_err(rejected)?;
        }
        feather::feather_polygon(base, feather, buffer)
    }

    /// Fill `base` solid, then feather out to `feather`.
    pub fn mask(
        &self,
        base: &[[f32; 2]],
        feather: &[[f32; 2]],
        buffer: &mut RasterBuffer,
    ) -> RasterResult<()> {
        if self.options.validate {
            validate::check_feather_pair(base, feather).map_err(rejected)?;
        }
        fill::fill_polygon(base, buffer)?;
        feather::feather_polygon(base, feather, buffer)
    }

    pub fn span_index(
        &self,
        vertices: &[[f32; 2]],
        width: i32,
        height: i32,
    ) -> RasterResult<SpanIndex> {
        if self.options.validate {
            validate::check_polygon(vertices).map_err(rejected)?;
        }
        SpanIndex::build(vertices, width, height, None)
    }
}

/// Fill a polygon into `buffer` with coverage 1.0.
///
/// Returns `Ok(())` for fewer than three vertices without drawing anything.
pub fn raskterize(vertices: &[[f32; 2]], buffer: &mut RasterBuffer) -> RasterResult<()> {
    fill::fill_polygon(vertices, buffer)
}

/// Blend a coverage ramp over the area of `feather`, falling from 1.0 near
/// `base` to 0.0 near the edge of `feather`. Pixels already at full coverage
/// are kept. `feather` is expected to enclose `base`.
pub fn raskterize_feather(
    base: &[[f32; 2]],
    feather: &[[f32; 2]],
    buffer: &mut RasterBuffer,
) -> RasterResult<()> {
    feather::feather_polygon(base, feather, buffer)
}

/// Index the spans a fill of `vertices` would cover on a `width` x `height`
/// raster.
pub fn build_span_index(vertices: &[[f32; 2]], width: i32, height: i32) -> RasterResult<SpanIndex> {
    SpanIndex::build(vertices, width, height, None)
}

/// Solid `base` with a feathered edge reaching out to `feather`.
pub fn rasterize_mask(
    base: &[[f32; 2]],
    feather: &[[f32; 2]],
    buffer: &mut RasterBuffer,
) -> RasterResult<()> {
    Rasterizer::default().mask(base, feather, buffer)
}
