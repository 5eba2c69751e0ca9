use std::path::Path;

use image::{RgbImage, RgbaImage, imageops::FilterType};
use rayon::prelude::*;

use crate::{
    assets::{
        decode::{decode_image_file, flatten_onto},
        fonts::{LabelFont, TextBrushRgba8, TextLayoutEngine, draw_layout, resolve_label_font},
        write::write_png_atomic,
    },
    config::MontageConfig,
    foundation::{
        color::Rgb8,
        error::{PressError, PressResult},
    },
    model::image_ref::ImageRef,
    montage::layout::{MontageLayout, PixelRect},
};

/// Text measured to size the label band.
const REFERENCE_TEXT: &str = "Hg";

/// Produces one composite reference sheet from several images.
pub trait MontageComposer: Send + Sync {
    /// Compose `refs`, in the given order, into a PNG at `out_path`.
    fn compose(&self, refs: &[ImageRef], out_path: &Path) -> PressResult<()>;
}

/// Labeled grid montage letterboxed to a fixed output size.
pub struct GridMontageComposer {
    config: MontageConfig,
    background: Rgb8,
    text: Rgb8,
    font: Option<LabelFont>,
}

struct RenderedLabel {
    width: u32,
    height: u32,
    premul: Option<RgbaImage>,
}

impl GridMontageComposer {
    /// Validate `config` and resolve the label font.
    pub fn new(config: MontageConfig) -> PressResult<Self> {
        let font = resolve_label_font(config.font_path.as_deref());
        if font.is_none() {
            tracing::warn!("no usable label font found; montage labels will be skipped");
        }
        Self::with_font(config, font)
    }

    /// Validate `config` and use `font` for labels. `None` disables labels.
    pub fn with_font(config: MontageConfig, font: Option<LabelFont>) -> PressResult<Self> {
        config.validate()?;
        Ok(Self {
            background: config.background_rgb()?,
            text: config.text_rgb()?,
            config,
            font,
        })
    }

    /// Active parameters.
    pub fn config(&self) -> &MontageConfig {
        &self.config
    }

    /// True when labels can be drawn.
    pub fn has_label_font(&self) -> bool {
        self.font.is_some()
    }

    /// Compose `refs` into the letterboxed output image.
    pub fn render(&self, refs: &[ImageRef]) -> PressResult<RgbImage> {
        if refs.is_empty() {
            return Err(PressError::invalid_input("montage needs at least one image"));
        }

        let decoded: Vec<PressResult<RgbImage>> = refs
            .par_iter()
            .map(|r| decode_image_file(r.path()).map(|img| flatten_onto(&img, self.background)))
            .collect();
        let mut sources = Vec::with_capacity(decoded.len());
        for (r, d) in refs.iter().zip(decoded) {
            sources.push(
                self.config
                    .failure_policy
                    .absorb(&r.path().display().to_string(), d)?,
            );
        }

        let titles: Vec<String> = refs.iter().map(ImageRef::label).collect();
        let (reference_height, labels) = self.render_labels(&titles);

        let label_sizes: Vec<(u32, u32)> = labels.iter().map(|l| (l.width, l.height)).collect();
        let source_sizes: Vec<Option<(u32, u32)>> = sources
            .iter()
            .map(|s| s.as_ref().map(|img| img.dimensions()))
            .collect();
        let layout =
            MontageLayout::compute(&self.config, reference_height, &label_sizes, &source_sizes)?;

        let thumbs: Vec<Option<RgbImage>> = sources
            .par_iter()
            .zip(layout.cells.par_iter())
            .map(|(src, cell)| match (src, cell.thumb) {
                (Some(img), Some(t)) => Some(image::imageops::resize(
                    img,
                    t.width,
                    t.height,
                    FilterType::Lanczos3,
                )),
                _ => None,
            })
            .collect();

        let bg = image::Rgb(self.background.to_array());
        let mut canvas = RgbImage::from_pixel(layout.canvas_width, layout.canvas_height, bg);
        for ((cell, label), thumb) in layout.cells.iter().zip(&labels).zip(&thumbs) {
            if let Some(premul) = &label.premul {
                blit_premul_over(&mut canvas, premul, cell.label);
            }
            if let (Some(img), Some(t)) = (thumb, cell.thumb) {
                image::imageops::replace(&mut canvas, img, t.x, t.y);
            }
        }

        let lb = layout.letterbox(self.config.output_width, self.config.output_height);
        let scaled = image::imageops::resize(&canvas, lb.width, lb.height, FilterType::Lanczos3);
        let mut out = RgbImage::from_pixel(self.config.output_width, self.config.output_height, bg);
        image::imageops::replace(&mut out, &scaled, lb.x, lb.y);
        Ok(out)
    }

    /// Measure and rasterize every title. Falls back to empty labels without a font.
    fn render_labels(&self, titles: &[String]) -> (u32, Vec<RenderedLabel>) {
        let blank = || {
            titles
                .iter()
                .map(|_| RenderedLabel {
                    width: 0,
                    height: 0,
                    premul: None,
                })
                .collect::<Vec<_>>()
        };
        let Some(font) = &self.font else {
            return (0, blank());
        };
        match self.try_render_labels(font, titles) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(font = %font.source, error = %e, "label rendering failed; skipping labels");
                (0, blank())
            }
        }
    }

    fn try_render_labels(
        &self,
        font: &LabelFont,
        titles: &[String],
    ) -> PressResult<(u32, Vec<RenderedLabel>)> {
        let mut engine = TextLayoutEngine::new(font)?;
        let size = self.config.font_size;
        let (_, reference_h) = engine.measure(REFERENCE_TEXT, size)?;
        let font_data = font.font_data();
        let brush = TextBrushRgba8::from(self.text);

        let mut out = Vec::with_capacity(titles.len());
        for title in titles {
            if title.is_empty() {
                out.push(RenderedLabel {
                    width: 0,
                    height: 0,
                    premul: None,
                });
                continue;
            }
            let layout = engine.layout_line(title, size, brush)?;
            let width = layout.width().ceil().max(0.0) as u32;
            let height = layout.height().ceil().max(0.0) as u32;
            let premul = rasterize_label(&font_data, &layout, width, height)?;
            out.push(RenderedLabel {
                width,
                height,
                premul,
            });
        }
        Ok((reference_h.ceil().max(0.0) as u32, out))
    }
}

impl MontageComposer for GridMontageComposer {
    #[tracing::instrument(skip(self, refs), fields(images = refs.len(), out = %out_path.display()))]
    fn compose(&self, refs: &[ImageRef], out_path: &Path) -> PressResult<()> {
        let img = self.render(refs)?;
        write_png_atomic(out_path, &img)?;
        tracing::debug!("montage written");
        Ok(())
    }
}

fn rasterize_label(
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<TextBrushRgba8>,
    width: u32,
    height: u32,
) -> PressResult<Option<RgbaImage>> {
    if width == 0 || height == 0 {
        return Ok(None);
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| PressError::rendering("label width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PressError::rendering("label height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw_layout(&mut ctx, font, layout, (0.0, 0.0));
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    let img = RgbaImage::from_raw(width, height, pixmap.data_as_u8_slice().to_vec())
        .ok_or_else(|| PressError::rendering("label pixmap has unexpected size"))?;
    Ok(Some(img))
}

/// Source-over of premultiplied `src` onto opaque `dst` at `at`, clipped to `dst`.
fn blit_premul_over(dst: &mut RgbImage, src: &RgbaImage, at: PixelRect) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    for (sx, sy, px) in src.enumerate_pixels() {
        let x = at.x + i64::from(sx);
        let y = at.y + i64::from(sy);
        if x < 0 || y < 0 || x >= dw || y >= dh {
            continue;
        }
        let [r, g, b, a] = px.0;
        if a == 0 {
            continue;
        }
        let inv = 255 - u16::from(a);
        let d = dst.get_pixel_mut(x as u32, y as u32);
        for (c, s) in d.0.iter_mut().zip([r, g, b]) {
            let v = u16::from(s) + ((u16::from(*c) * inv + 127) / 255);
            *c = v.min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/montage/compose.rs"]
mod tests;
