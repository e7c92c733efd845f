use crate::error::{RasterError, RasterResult};
use crate::helpers::try_vec_with_capacity;

/// Scaled vertex coordinates are clamped to this magnitude, which keeps all
/// edge arithmetic inside `i32`.
pub const PIXEL_COORDINATE_MAX: i32 = 1 << 26;

/// A polygon vertex in buffer space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolyVertex {
    pub x: i32,
    pub y: i32,
}

impl PolyVertex {
    /// Scale a normalized `[0, 1]` vertex to a `width` x `height` buffer,
    /// rounding to the nearest integer.
    pub fn from_normalized(point: [f32; 2], width: i32, height: i32) -> Self {
        PolyVertex {
            x: scale_coordinate(point[0], width),
            y: scale_coordinate(point[1], height),
        }
    }
}

fn scale_coordinate(v: f32, size: i32) -> i32 {
    let max = PIXEL_COORDINATE_MAX as f32;
    // NaN survives the clamp and then casts to 0
    (v * size as f32 + 0.5).floor().clamp(-max, max) as i32
}

/// Convert a normalized vertex loop to buffer space.
pub fn to_poly_vertices(
    points: &[[f32; 2]],
    width: i32,
    height: i32,
) -> RasterResult<Vec<PolyVertex>> {
    let mut vertices = try_vec_with_capacity(points.len())?;
    vertices.extend(points.iter().map(|&p| PolyVertex::from_normalized(p, width, height)));
    Ok(vertices)
}

/// Half-open clip rectangle in pixels: `left <= x < right`, `top <= y < bottom`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ClipRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        ClipRect { left, top, right, bottom }
    }

    pub fn from_size(width: i32, height: i32) -> Self {
        ClipRect::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn intersect(&self, other: &ClipRect) -> ClipRect {
        ClipRect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    pub fn contains_row(&self, y: i32) -> bool {
        self.top <= y && y < self.bottom
    }
}

/// One horizontal run of covered pixels, `x_start <= x < x_end`.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub x_start: i32,
    pub x_end: i32,
}

impl Span {
    pub fn len(&self) -> usize {
        (self.x_end - self.x_start).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.x_end <= self.x_start
    }
}

/// A row-major single-channel float raster plus the region engines may write.
pub struct RasterBuffer<'b> {
    data: &'b mut [f32],
    width: i32,
    height: i32,
    clip: Option<ClipRect>,
}

impl<'b> RasterBuffer<'b> {
    pub fn new(data: &'b mut [f32], width: i32, height: i32) -> RasterResult<Self> {
        if width < 0 || height < 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let needed = width as usize * height as usize;
        if data.len() < needed {
            return Err(RasterError::BufferTooSmall { len: data.len(), width, height });
        }
        Ok(RasterBuffer { data, width, height, clip: None })
    }

    /// Restrict writes to `clip` (intersected with the buffer bounds).
    pub fn with_clip(mut self, clip: ClipRect) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }

    /// The rectangle engines are allowed to write.
    pub fn clip_rect(&self) -> ClipRect {
        let bounds = ClipRect::from_size(self.width, self.height);
        match &self.clip {
            Some(clip) => bounds.intersect(clip),
            None => bounds,
        }
    }

    pub fn pixels(&self) -> &[f32] {
        &self.data[..self.width as usize * self.height as usize]
    }

    pub fn pixels_mut(&mut self) -> &mut [f32] {
        &mut self.data[..self.width as usize * self.height as usize]
    }

    pub(crate) fn row_mut(&mut self, y: i32) -> &mut [f32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.data[start..start + w]
    }
}
