use std::{borrow::Cow, path::Path, sync::Arc};

use crate::foundation::{
    color::Rgb8,
    error::{PressError, PressResult},
};

/// System families tried for montage labels, strongest first.
const LABEL_FAMILIES: &[(&str, usvg::fontdb::Weight)] = &[
    ("DejaVu Sans", usvg::fontdb::Weight::BOLD),
    ("DejaVu Sans", usvg::fontdb::Weight::NORMAL),
    ("Arial", usvg::fontdb::Weight::NORMAL),
    ("Helvetica", usvg::fontdb::Weight::NORMAL),
    ("Liberation Sans", usvg::fontdb::Weight::BOLD),
];

#[derive(Clone, Debug)]
/// Raw font face used to measure and draw montage labels.
pub struct LabelFont {
    /// Font file contents.
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
    /// Where the face came from, for logs.
    pub source: String,
}

impl LabelFont {
    /// Load a face from a font file.
    pub fn from_file(path: &Path) -> PressResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            PressError::resource_unavailable(format!("read font '{}': {e}", path.display()))
        })?;
        Ok(Self {
            bytes: Arc::new(bytes),
            index: 0,
            source: path.display().to_string(),
        })
    }

    pub(crate) fn font_data(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            self.index,
        )
    }
}

/// Find a label font.
///
/// Tries `configured` first, then the usual sans families installed on the system, then the
/// generic sans-serif family, then any face at all. `None` means labels cannot be drawn.
pub fn resolve_label_font(configured: Option<&Path>) -> Option<LabelFont> {
    if let Some(path) = configured {
        match LabelFont::from_file(path) {
            Ok(f) => return Some(f),
            Err(e) => tracing::warn!(error = %e, "configured label font unusable, trying system fonts"),
        }
    }

    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    let id = LABEL_FAMILIES
        .iter()
        .find_map(|&(name, weight)| query_face(&db, usvg::fontdb::Family::Name(name), weight))
        .or_else(|| {
            query_face(
                &db,
                usvg::fontdb::Family::SansSerif,
                usvg::fontdb::Weight::BOLD,
            )
        })
        .or_else(|| db.faces().next().map(|f| f.id))?;

    let source = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "system".to_string());
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    tracing::debug!(font = %source, "resolved label font");
    Some(LabelFont {
        bytes: Arc::new(bytes),
        index,
        source,
    })
}

fn query_face(
    db: &usvg::fontdb::Database,
    family: usvg::fontdb::Family<'_>,
    weight: usvg::fontdb::Weight,
) -> Option<usvg::fontdb::ID> {
    db.query(&usvg::fontdb::Query {
        families: &[family],
        weight,
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgb8> for TextBrushRgba8 {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// Parley-based shaping for single-line labels.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    /// Register `font` with fresh Parley contexts.
    pub fn new(font: &LabelFont) -> PressResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PressError::rendering(format!("no font families registered from '{}'", font.source))
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PressError::rendering("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Family name Parley resolved for the registered font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shape `text` on one unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> PressResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PressError::invalid_input(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Width and height of `text` set on one line.
    pub fn measure(&mut self, text: &str, size_px: f32) -> PressResult<(f32, f32)> {
        let layout = self.layout_line(text, size_px, TextBrushRgba8::default())?;
        Ok((layout.width(), layout.height()))
    }
}

/// Fill every glyph of `layout` with its brush, offset by `origin`.
pub(crate) fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<TextBrushRgba8>,
    origin: (f64, f64),
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate(origin));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
