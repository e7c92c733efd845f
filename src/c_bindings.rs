use crate::span_index::SpanIndex;
use crate::types::{RasterBuffer, Span};
use crate::{
    build_span_index, raskterize as fill_into, raskterize_feather as feather_into, RasterResult,
};

/// Success return value of the C entry points.
pub const RASKTER_OK: i32 = 1;
/// Failure return value of the C entry points (allocation failure or a bad
/// buffer description).
pub const RASKTER_FAILED: i32 = 0;

fn status(result: RasterResult<()>) -> i32 {
    match result {
        Ok(()) => RASKTER_OK,
        Err(err) => {
            log::debug!("raskter C call failed: {}", err);
            RASKTER_FAILED
        }
    }
}

unsafe fn vertex_slice<'a>(verts: *const [f32; 2], num_verts: usize) -> &'a [[f32; 2]] {
    if verts.is_null() || num_verts == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(verts, num_verts)
    }
}

unsafe fn buffer_slice<'a>(buf: *mut f32, width: i32, height: i32) -> Option<&'a mut [f32]> {
    if width < 0 || height < 0 {
        return None;
    }
    let len = (width as usize).checked_mul(height as usize)?;
    if len == 0 {
        return Some(&mut []);
    }
    if buf.is_null() {
        return None;
    }
    Some(std::slice::from_raw_parts_mut(buf, len))
}

unsafe fn with_buffer(
    buf: *mut f32,
    width: i32,
    height: i32,
    f: impl FnOnce(&mut RasterBuffer) -> RasterResult<()>,
) -> i32 {
    let data = match buffer_slice(buf, width, height) {
        Some(data) => data,
        None => return RASKTER_FAILED,
    };
    status(RasterBuffer::new(data, width, height).and_then(|mut buffer| f(&mut buffer)))
}

/// Fill a polygon of `num_verts` normalized vertices into a row-major
/// `width * height` coverage plane. Returns 1 on success, including the
/// no-op for fewer than three vertices, and 0 on failure.
#[no_mangle]
pub unsafe extern "C" fn raskterize(
    verts: *const [f32; 2],
    num_verts: usize,
    buf: *mut f32,
    width: i32,
    height: i32,
) -> i32 {
    let vertices = vertex_slice(verts, num_verts);
    with_buffer(buf, width, height, |buffer| fill_into(vertices, buffer))
}

/// Blend a feather ramp between `base` and the enclosing `feather` outline.
#[no_mangle]
pub unsafe extern "C" fn raskterize_feather(
    base: *const [f32; 2],
    num_base: usize,
    feather: *const [f32; 2],
    num_feather: usize,
    buf: *mut f32,
    width: i32,
    height: i32,
) -> i32 {
    let base = vertex_slice(base, num_base);
    let feather = vertex_slice(feather, num_feather);
    with_buffer(buf, width, height, |buffer| feather_into(base, feather, buffer))
}

/// Raw span index handed across the C boundary. Both arrays use the 1-based
/// layout of `SpanIndex`. Release with `raskterize_span_index_release`.
#[repr(C)]
pub struct RawSpanIndex {
    pub row_index: *mut i32,
    pub row_index_len: usize,
    pub spans: *mut Span,
    pub spans_len: usize,
}

impl RawSpanIndex {
    fn empty() -> Self {
        RawSpanIndex {
            row_index: std::ptr::null_mut(),
            row_index_len: 0,
            spans: std::ptr::null_mut(),
            spans_len: 0,
        }
    }

    fn from_index(index: SpanIndex) -> Self {
        let (row_index, spans) = index.into_parts();
        let (row_index_len, spans_len) = (row_index.len(), spans.len());
        RawSpanIndex {
            row_index: Box::into_raw(row_index.into_boxed_slice()) as *mut i32,
            row_index_len,
            spans: Box::into_raw(spans.into_boxed_slice()) as *mut Span,
            spans_len,
        }
    }
}

/// Build the span index of a polygon into `out`. Returns 1 on success and
/// 0 on failure, in which case `out` holds null arrays.
#[no_mangle]
pub unsafe extern "C" fn raskterize_build_span_index(
    verts: *const [f32; 2],
    num_verts: usize,
    width: i32,
    height: i32,
    out: *mut RawSpanIndex,
) -> i32 {
    if out.is_null() {
        return RASKTER_FAILED;
    }
    let vertices = vertex_slice(verts, num_verts);
    match build_span_index(vertices, width, height) {
        Ok(index) => {
            out.write(RawSpanIndex::from_index(index));
            RASKTER_OK
        }
        Err(err) => {
            log::debug!("raskter span index failed: {}", err);
            out.write(RawSpanIndex::empty());
            RASKTER_FAILED
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn raskterize_span_index_release(index: RawSpanIndex) {
    if !index.row_index.is_null() {
        drop(Box::from_raw(std::slice::from_raw_parts_mut(index.row_index, index.row_index_len)));
    }
    if !index.spans.is_null() {
        drop(Box::from_raw(std::slice::from_raw_parts_mut(index.spans, index.spans_len)));
    }
}
