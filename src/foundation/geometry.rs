//! Pure placement math shared by the montage composer and the document layout engine.

pub use kurbo::{Point, Rect, Size};

// Guards `floor` against results like 723.9999999 when a side fills its box exactly.
const FLOOR_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Result of an aspect-preserving fit in whole pixels.
pub struct Fit {
    /// Uniform scale factor applied to the source.
    pub scale: f64,
    /// Scaled width in pixels (at least 1).
    pub width: u32,
    /// Scaled height in pixels (at least 1).
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Column/row count of a uniform grid.
pub struct Grid {
    /// Number of columns.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
}

impl Grid {
    /// `(row, col)` of item `index` in row-major order.
    pub fn cell_of(self, index: usize) -> (u32, u32) {
        let cols = self.cols.max(1) as usize;
        ((index / cols) as u32, (index % cols) as u32)
    }
}

/// Uniform scale so that `src` fits entirely inside `box`, floored to whole pixels.
pub fn scale_to_fit(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> Fit {
    let (scale, w, h) = scale_to_fit_f64(
        f64::from(src_w),
        f64::from(src_h),
        f64::from(box_w),
        f64::from(box_h),
    );
    let floor_px = |v: f64, limit: u32| -> u32 {
        let px = (v + FLOOR_EPSILON).floor().max(1.0) as u32;
        px.min(limit.max(1))
    };
    Fit {
        scale,
        width: floor_px(w, box_w),
        height: floor_px(h, box_h),
    }
}

/// Real-valued variant of [`scale_to_fit`] used in page space (points).
///
/// Returns `(scale, width, height)`.
pub fn scale_to_fit_f64(src_w: f64, src_h: f64, box_w: f64, box_h: f64) -> (f64, f64, f64) {
    let src_w = src_w.max(1.0);
    let src_h = src_h.max(1.0);
    let scale = (box_w / src_w).min(box_h / src_h);
    (scale, src_w * scale, src_h * scale)
}

/// Offset that centers an inner box in an outer box, using floor division.
pub fn center_offset(outer_w: i64, outer_h: i64, inner_w: i64, inner_h: i64) -> (i64, i64) {
    (
        (outer_w - inner_w).div_euclid(2),
        (outer_h - inner_h).div_euclid(2),
    )
}

/// Real-valued variant of [`center_offset`].
pub fn center_offset_f64(outer_w: f64, outer_h: f64, inner_w: f64, inner_h: f64) -> (f64, f64) {
    ((outer_w - inner_w) / 2.0, (outer_h - inner_h) / 2.0)
}

/// Grid shape for `n` items.
///
/// An explicit column count wins; otherwise the grid is as square as possible.
pub fn grid_dimensions(n: usize, explicit_cols: Option<u32>) -> Grid {
    let n = n.max(1);
    let cols = match explicit_cols {
        Some(c) if c > 0 => c as usize,
        _ => ((n as f64).sqrt().ceil() as usize).max(1),
    };
    let rows = n.div_ceil(cols);
    Grid {
        cols: cols as u32,
        rows: rows as u32,
    }
}

/// Aspect-fit a `src_w x src_h` item into `bounds`, centered.
pub fn fit_rect(src_w: f64, src_h: f64, bounds: Rect) -> Rect {
    let (_, w, h) = scale_to_fit_f64(src_w, src_h, bounds.width(), bounds.height());
    let (dx, dy) = center_offset_f64(bounds.width(), bounds.height(), w, h);
    Rect::from_origin_size(Point::new(bounds.x0 + dx, bounds.y0 + dy), Size::new(w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
