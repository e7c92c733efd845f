use std::collections::TryReserveError;

use thiserror::Error;

/// Everything that can go wrong while rasterizing.
///
/// The rasterizing entry points only ever report `AllocationFailed` and the
/// buffer-shape variants. The remaining variants are diagnostics produced by
/// the `validate` module, or by a `Rasterizer` configured to validate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("failed to allocate {0} elements of rasterizer storage")]
    AllocationFailed(usize),
    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("buffer of {len} pixels is too small for a {width}x{height} raster")]
    BufferTooSmall { len: usize, width: i32, height: i32 },
    #[error("span index for {expected_width}x{expected_height} used on a {width}x{height} buffer")]
    DimensionMismatch {
        expected_width: i32,
        expected_height: i32,
        width: i32,
        height: i32,
    },
    #[error("polygon has {0} vertices, at least 3 are required")]
    TooFewVertices(usize),
    #[error("polygon vertex {0} is not finite")]
    NonFiniteVertex(usize),
    #[error("polygon has zero area")]
    ZeroArea,
    #[error("feather polygon does not enclose base vertex {0}")]
    FeatherNotEnclosing(usize),
    #[error("feather and base polygons wind in opposite directions")]
    WindingMismatch,
}

pub type RasterResult<T> = Result<T, RasterError>;

impl RasterError {
    pub(crate) fn alloc(count: usize) -> impl FnOnce(TryReserveError) -> RasterError {
        move |_| RasterError::AllocationFailed(count)
    }
}
