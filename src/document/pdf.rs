//! PDF serialization of a [`DocumentPlan`].
//!
//! Text uses the base-14 Times faces with WinAnsi encoding, so no font program is embedded.
//! Raster content (backgrounds and illustrations) becomes FlateDecode image XObjects; an
//! XObject shared by several pages is written once.

use std::sync::Arc;

use image::DynamicImage;
use pdf_writer::{Content, Filter, Name, Pdf, Rect as PdfRect, Ref, Str, TextStr};

use crate::{
    document::{
        layout::{DocumentPlan, PageElement, PagePlan, TextRun},
        metrics::{BaseFont, encode_win_ansi},
    },
    foundation::error::{PressError, PressResult},
    texture::synth::Texture,
};

const DEFLATE_LEVEL: u8 = 6;

/// Pixel source of an image XObject, compared by identity.
enum Raster<'a> {
    Texture(&'a Arc<Texture>),
    Image(&'a Arc<DynamicImage>),
}

impl Raster<'_> {
    fn same(&self, other: &Raster<'_>) -> bool {
        match (self, other) {
            (Raster::Texture(a), Raster::Texture(b)) => Arc::ptr_eq(a, b),
            (Raster::Image(a), Raster::Image(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

struct Embedded<'a> {
    raster: Raster<'a>,
    name: String,
    id: Ref,
}

struct Writer<'a> {
    pdf: Pdf,
    next_id: i32,
    embedded: Vec<Embedded<'a>>,
}

impl<'a> Writer<'a> {
    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    /// Name and reference of the XObject for `raster`, writing it on first use.
    fn embed(&mut self, raster: Raster<'a>) -> PressResult<(String, Ref)> {
        if let Some(e) = self.embedded.iter().find(|e| e.raster.same(&raster)) {
            return Ok((e.name.clone(), e.id));
        }
        let id = self.alloc();
        let name = format!("Im{}", self.embedded.len() + 1);
        match &raster {
            Raster::Texture(tex) => {
                self.write_rgb(id, tex.width, tex.height, &tex.rgb8, None)?;
            }
            Raster::Image(img) => self.write_image(id, img)?,
        }
        self.embedded.push(Embedded {
            raster,
            name: name.clone(),
            id,
        });
        Ok((name, id))
    }

    fn write_image(&mut self, id: Ref, img: &DynamicImage) -> PressResult<()> {
        if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            if rgba.pixels().any(|p| p.0[3] < 255) {
                let rgb: Vec<u8> = rgba
                    .pixels()
                    .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                    .collect();
                let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                return self.write_rgb(id, rgba.width(), rgba.height(), &rgb, Some(&alpha));
            }
        }
        let rgb = img.to_rgb8();
        self.write_rgb(id, rgb.width(), rgb.height(), rgb.as_raw(), None)
    }

    fn write_rgb(
        &mut self,
        id: Ref,
        width: u32,
        height: u32,
        rgb: &[u8],
        alpha: Option<&[u8]>,
    ) -> PressResult<()> {
        let w = pdf_int("image width", width)?;
        let h = pdf_int("image height", height)?;

        let mask = match alpha {
            Some(alpha) => {
                let mask_id = self.alloc();
                let compressed = miniz_oxide::deflate::compress_to_vec_zlib(alpha, DEFLATE_LEVEL);
                let mut mask = self.pdf.image_xobject(mask_id, &compressed);
                mask.filter(Filter::FlateDecode);
                mask.width(w);
                mask.height(h);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_id)
            }
            None => None,
        };

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(rgb, DEFLATE_LEVEL);
        let mut xobj = self.pdf.image_xobject(id, &compressed);
        xobj.filter(Filter::FlateDecode);
        xobj.width(w);
        xobj.height(h);
        xobj.color_space().device_rgb();
        xobj.bits_per_component(8);
        if let Some(mask_id) = mask {
            xobj.s_mask(mask_id);
        }
        Ok(())
    }
}

fn pdf_int(what: &str, v: u32) -> PressResult<i32> {
    i32::try_from(v).map_err(|_| PressError::rendering(format!("{what} {v} exceeds PDF limits")))
}

/// Serialize `plan` to PDF bytes.
pub fn write_pdf(plan: &DocumentPlan) -> PressResult<Vec<u8>> {
    let mut w = Writer {
        pdf: Pdf::new(),
        next_id: 1,
        embedded: Vec::new(),
    };

    let catalog_id = w.alloc();
    let pages_id = w.alloc();
    let info_id = w.alloc();

    let mut fonts = Vec::with_capacity(BaseFont::ALL.len());
    for font in BaseFont::ALL {
        let id = w.alloc();
        w.pdf
            .type1_font(id)
            .base_font(Name(font.postscript_name().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        fonts.push((font.resource_name(), id));
    }

    let ink = plan.ink.to_unit_f32();
    let mut page_ids = Vec::with_capacity(plan.pages.len());
    for page in &plan.pages {
        let page_id = w.alloc();
        let content_id = w.alloc();
        let (raw, xobjects) = page_content(&mut w, page, ink)?;
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, DEFLATE_LEVEL);
        w.pdf
            .stream(content_id, &compressed)
            .filter(Filter::FlateDecode);

        {
            let mut pdf_page = w.pdf.page(page_id);
            pdf_page
                .media_box(PdfRect::new(0.0, 0.0, page.width as f32, page.height as f32))
                .parent(pages_id)
                .contents(content_id);
            let mut resources = pdf_page.resources();
            {
                let mut font_dict = resources.fonts();
                for (name, id) in &fonts {
                    font_dict.pair(Name(name.as_bytes()), *id);
                }
            }
            if !xobjects.is_empty() {
                let mut xobject_dict = resources.x_objects();
                for (name, id) in &xobjects {
                    xobject_dict.pair(Name(name.as_bytes()), *id);
                }
            }
        }
        page_ids.push(page_id);
    }

    let count = i32::try_from(page_ids.len())
        .map_err(|_| PressError::rendering("too many pages for one PDF"))?;
    w.pdf.catalog(catalog_id).pages(pages_id);
    w.pdf
        .pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(count);
    w.pdf.document_info(info_id).title(TextStr(&plan.title));

    tracing::debug!(
        pages = page_ids.len(),
        xobjects = w.embedded.len(),
        "pdf assembled"
    );
    Ok(w.pdf.finish())
}

/// Content stream of one page, plus the XObjects it draws.
fn page_content<'a>(
    w: &mut Writer<'a>,
    page: &'a PagePlan,
    ink: [f32; 3],
) -> PressResult<(Vec<u8>, Vec<(String, Ref)>)> {
    let mut content = Content::new();
    let mut used: Vec<(String, Ref)> = Vec::new();

    if let Some(tex) = &page.background {
        let name = note_used(&mut used, w.embed(Raster::Texture(tex))?);
        content.save_state();
        content.transform([page.width as f32, 0.0, 0.0, page.height as f32, 0.0, 0.0]);
        content.x_object(Name(name.as_bytes()));
        content.restore_state();
    }

    content.set_fill_rgb(ink[0], ink[1], ink[2]);
    let mut word_spacing = 0.0f32;
    for element in &page.elements {
        match element {
            PageElement::Image(img) => {
                let name = note_used(&mut used, w.embed(Raster::Image(&img.pixels))?);
                let r = img.rect;
                content.save_state();
                content.transform([
                    r.width() as f32,
                    0.0,
                    0.0,
                    r.height() as f32,
                    r.x0 as f32,
                    r.y0 as f32,
                ]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
            }
            PageElement::Placeholder(run) | PageElement::Text(run) => {
                // Word spacing is graphics state and outlives the text object.
                let ws = run.word_spacing as f32;
                if ws != word_spacing {
                    content.set_word_spacing(ws);
                    word_spacing = ws;
                }
                show_run(&mut content, run);
            }
        }
    }

    Ok((content.finish(), used))
}

fn note_used(used: &mut Vec<(String, Ref)>, entry: (String, Ref)) -> String {
    if !used.iter().any(|(n, _)| *n == entry.0) {
        used.push(entry.clone());
    }
    entry.0
}

fn show_run(content: &mut Content, run: &TextRun) {
    let bytes = encode_win_ansi(&run.text);
    content.begin_text();
    content.set_font(Name(run.font.resource_name().as_bytes()), run.size as f32);
    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, run.x as f32, run.y as f32]);
    content.show(Str(&bytes));
    content.end_text();
}

#[cfg(test)]
#[path = "../../tests/unit/document/pdf.rs"]
mod tests;
