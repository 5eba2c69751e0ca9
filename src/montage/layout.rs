use crate::{
    config::MontageConfig,
    foundation::{
        error::{PressError, PressResult},
        geometry::{Fit, Grid, center_offset, grid_dimensions, scale_to_fit},
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Integer pixel rectangle; the origin may sit left of or above the canvas.
pub struct PixelRect {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl PixelRect {
    /// Right edge, exclusive.
    pub fn right(&self) -> i64 {
        self.x + i64::from(self.width)
    }

    /// Bottom edge, exclusive.
    pub fn bottom(&self) -> i64 {
        self.y + i64::from(self.height)
    }

    /// True if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Geometry of one montage item.
pub struct LayoutCell {
    /// Whole grid cell.
    pub cell: PixelRect,
    /// Label text box.
    pub label: PixelRect,
    /// Thumbnail box; `None` when the source could not be read.
    pub thumb: Option<PixelRect>,
}

#[derive(Clone, Debug, PartialEq)]
/// Pixel layout of a montage canvas before letterboxing.
pub struct MontageLayout {
    /// Column and row count.
    pub grid: Grid,
    /// Uniform cell width.
    pub cell_width: u32,
    /// Uniform cell height.
    pub cell_height: u32,
    /// Height reserved for labels at the top of each cell.
    pub label_band: u32,
    /// Canvas width.
    pub canvas_width: u32,
    /// Canvas height.
    pub canvas_height: u32,
    /// One entry per input, in input order.
    pub cells: Vec<LayoutCell>,
}

impl MontageLayout {
    /// Lay out `labels.len()` items.
    ///
    /// `reference_height` is the measured height of `"Hg"` in the label font (0 without one),
    /// `labels` the measured size of each label, and `sources` the pixel size of each source
    /// image or `None` for an unreadable one.
    pub fn compute(
        config: &MontageConfig,
        reference_height: u32,
        labels: &[(u32, u32)],
        sources: &[Option<(u32, u32)>],
    ) -> PressResult<Self> {
        if labels.is_empty() {
            return Err(PressError::invalid_input("montage needs at least one image"));
        }
        if labels.len() != sources.len() {
            return Err(PressError::invalid_input(format!(
                "montage got {} labels for {} sources",
                labels.len(),
                sources.len()
            )));
        }

        let pad = config.padding;
        let cp = config.cell_padding;
        let label_band = reference_height + config.label_padding;
        let max_label_w = labels.iter().map(|(w, _)| *w).max().unwrap_or(0);

        let cell_width = (config.thumb_width + 2 * cp).max(max_label_w + 2 * cp);
        let cell_height = label_band + config.thumb_height + 2 * cp;

        let grid = grid_dimensions(labels.len(), config.columns);
        let canvas_width = 2 * pad + grid.cols * cell_width;
        let canvas_height = 2 * pad + grid.rows * cell_height;

        let cells = labels
            .iter()
            .zip(sources)
            .enumerate()
            .map(|(i, (&(lw, lh), src))| {
                let (row, col) = grid.cell_of(i);
                let x0 = i64::from(pad) + i64::from(col) * i64::from(cell_width);
                let y0 = i64::from(pad) + i64::from(row) * i64::from(cell_height);

                let (lx, ly) = center_offset(
                    i64::from(cell_width),
                    i64::from(label_band),
                    i64::from(lw),
                    i64::from(lh),
                );
                let label = PixelRect {
                    x: x0 + lx,
                    y: y0 + i64::from(cp) + ly,
                    width: lw,
                    height: lh,
                };

                let thumb = src.map(|(sw, sh)| {
                    let Fit { width, height, .. } =
                        scale_to_fit(sw, sh, config.thumb_width, config.thumb_height);
                    let (tx, ty) = center_offset(
                        i64::from(cell_width),
                        i64::from(cell_height - label_band),
                        i64::from(width),
                        i64::from(height),
                    );
                    PixelRect {
                        x: x0 + tx,
                        y: y0 + i64::from(label_band) + ty,
                        width,
                        height,
                    }
                });

                LayoutCell {
                    cell: PixelRect {
                        x: x0,
                        y: y0,
                        width: cell_width,
                        height: cell_height,
                    },
                    label,
                    thumb,
                }
            })
            .collect();

        Ok(Self {
            grid,
            cell_width,
            cell_height,
            label_band,
            canvas_width,
            canvas_height,
            cells,
        })
    }

    /// Where the canvas lands inside a `out_w` x `out_h` letterbox.
    pub fn letterbox(&self, out_w: u32, out_h: u32) -> PixelRect {
        let fit = scale_to_fit(self.canvas_width, self.canvas_height, out_w, out_h);
        let (x, y) = center_offset(
            i64::from(out_w),
            i64::from(out_h),
            i64::from(fit.width),
            i64::from(fit.height),
        );
        PixelRect {
            x,
            y,
            width: fit.width,
            height: fit.height,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/montage/layout.rs"]
mod tests;
