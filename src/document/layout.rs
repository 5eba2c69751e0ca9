use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use image::DynamicImage;

use crate::{
    assets::{decode::decode_image_file, write::write_atomic},
    config::PageConfig,
    document::{
        metrics::BaseFont,
        pdf::write_pdf,
        text::{TextStyle, typeset, wrap_words},
    },
    foundation::{
        color::Rgb8,
        error::PressResult,
        geometry::{Rect, fit_rect},
    },
    model::{
        image_ref::ImageRef,
        storybook::{Page, StorybookDocument},
    },
    texture::synth::{Texture, TextureSynthesizer},
};

/// Line height of wrapped cover titles, as a multiple of the title size.
const TITLE_LINE_HEIGHT: f64 = 1.2;

#[derive(Clone, Debug, PartialEq)]
/// Laid-out document ready to be written.
///
/// Coordinates are PDF user space: points, origin at the bottom-left of each page.
pub struct DocumentPlan {
    /// Document title.
    pub title: String,
    /// Ink color for all text.
    pub ink: Rgb8,
    /// Cover first, then one spread per story page.
    pub pages: Vec<PagePlan>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a planned page shows.
pub enum PageKind {
    /// Title or cover illustration.
    Cover,
    /// Image and text for one story page.
    Spread {
        /// Story page number.
        page_number: u32,
    },
}

#[derive(Clone, Debug, PartialEq)]
/// One output page.
pub struct PagePlan {
    /// Cover or spread.
    pub kind: PageKind,
    /// Page width in points.
    pub width: f64,
    /// Page height in points.
    pub height: f64,
    /// Full-page background, absent if it could not be synthesized.
    pub background: Option<Arc<Texture>>,
    /// Content in drawing order.
    pub elements: Vec<PageElement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Purpose of a text run.
pub enum TextRole {
    /// Cover title line.
    Title,
    /// Missing-image notice.
    Placeholder,
    /// Enlarged first character.
    DropCap,
    /// Body text line.
    Body,
    /// Page number.
    PageNumber,
}

#[derive(Clone, Debug, PartialEq)]
/// A single line of text at a fixed position.
pub struct TextRun {
    /// Purpose of the run.
    pub role: TextRole,
    /// Text to show.
    pub text: String,
    /// Face.
    pub font: BaseFont,
    /// Size in points.
    pub size: f64,
    /// Left end of the baseline.
    pub x: f64,
    /// Baseline height above the page bottom.
    pub y: f64,
    /// Extra space added at each word gap.
    pub word_spacing: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// A decoded image and where it goes.
pub struct PlacedImage {
    /// Source file.
    pub source: ImageRef,
    /// Decoded pixels.
    pub pixels: Arc<DynamicImage>,
    /// Destination rectangle.
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
/// Positioned page content.
pub enum PageElement {
    /// Illustration.
    Image(PlacedImage),
    /// Stand-in for an illustration that could not be read.
    Placeholder(TextRun),
    /// Any other text.
    Text(TextRun),
}

impl PageElement {
    /// Text run of a text or placeholder element.
    pub fn text_run(&self) -> Option<&TextRun> {
        match self {
            Self::Placeholder(run) | Self::Text(run) => Some(run),
            Self::Image(_) => None,
        }
    }
}

impl PagePlan {
    /// Text runs with the given role, in drawing order.
    pub fn runs(&self, role: TextRole) -> impl Iterator<Item = &TextRun> {
        self.elements
            .iter()
            .filter_map(PageElement::text_run)
            .filter(move |r| r.role == role)
    }

    /// Placed images, in drawing order.
    pub fn images(&self) -> impl Iterator<Item = &PlacedImage> {
        self.elements.iter().filter_map(|e| match e {
            PageElement::Image(img) => Some(img),
            _ => None,
        })
    }
}

/// Places the cover and spreads of a storybook.
pub struct DocumentLayoutEngine {
    config: PageConfig,
    textures: Arc<TextureSynthesizer>,
    ink: Rgb8,
}

impl DocumentLayoutEngine {
    /// Validate `config` and share `textures` for backgrounds.
    pub fn new(config: PageConfig, textures: Arc<TextureSynthesizer>) -> PressResult<Self> {
        config.validate()?;
        let ink = config.text_rgb()?;
        Ok(Self {
            config,
            textures,
            ink,
        })
    }

    /// Active parameters.
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Lay out the cover and one spread per page, ordered by page number.
    #[tracing::instrument(skip(self, doc), fields(title = %doc.title, pages = doc.pages.len()))]
    pub fn layout(&self, doc: &StorybookDocument) -> PressResult<DocumentPlan> {
        let mut pages = Vec::with_capacity(doc.pages.len() + 1);
        pages.push(self.layout_cover(doc)?);
        for page in doc.pages_in_order() {
            pages.push(self.layout_spread(page)?);
        }
        tracing::debug!(pages = pages.len(), "document laid out");
        Ok(DocumentPlan {
            title: doc.title.clone(),
            ink: self.ink,
            pages,
        })
    }

    /// Lay out `doc` and write it as a PDF at `out_path`, replacing any existing file.
    #[tracing::instrument(skip(self, doc), fields(title = %doc.title, out = %out_path.display()))]
    pub fn render_pdf(&self, doc: &StorybookDocument, out_path: &Path) -> PressResult<PathBuf> {
        let plan = self.layout(doc)?;
        let bytes = write_pdf(&plan)?;
        write_atomic(out_path, &bytes)?;
        tracing::debug!(bytes = bytes.len(), "pdf written");
        Ok(out_path.to_path_buf())
    }

    fn portrait(&self) -> (f64, f64) {
        let c = &self.config;
        (c.width_pt.min(c.height_pt), c.width_pt.max(c.height_pt))
    }

    fn landscape(&self) -> (f64, f64) {
        let (w, h) = self.portrait();
        (h, w)
    }

    fn background(&self, what: &str, w: f64, h: f64) -> PressResult<Option<Arc<Texture>>> {
        self.config
            .failure_policy
            .absorb(what, self.textures.texture_for_page(w, h))
    }

    fn layout_cover(&self, doc: &StorybookDocument) -> PressResult<PagePlan> {
        let (w, h) = self.portrait();
        let m = self.config.margin();
        let background = self.background("cover background", w, h)?;
        let bounds = Rect::new(m, m, w - m, h - m);

        let elements = match doc.cover_image() {
            Some(cover) => vec![self.image_or_placeholder(&cover, bounds)],
            None => self.title_runs(&doc.title, bounds),
        };

        Ok(PagePlan {
            kind: PageKind::Cover,
            width: w,
            height: h,
            background,
            elements,
        })
    }

    fn title_runs(&self, title: &str, bounds: Rect) -> Vec<PageElement> {
        let font = BaseFont::TimesBold;
        let size = self.config.title_size;
        let words: Vec<&str> = title.split_whitespace().collect();
        let lines = wrap_words(&words, font, size, |_| bounds.width());
        let lead = size * TITLE_LINE_HEIGHT;
        let center = bounds.center();
        let top = center.y + (lines.len().saturating_sub(1)) as f64 * lead / 2.0;

        lines
            .iter()
            .enumerate()
            .map(|(i, words)| {
                let text = words.join(" ");
                let tw = font.text_width(&text, size);
                PageElement::Text(TextRun {
                    role: TextRole::Title,
                    text,
                    font,
                    size,
                    x: center.x - tw / 2.0,
                    y: top - i as f64 * lead,
                    word_spacing: 0.0,
                })
            })
            .collect()
    }

    #[tracing::instrument(level = "debug", skip(self, page), fields(page = page.page_number))]
    fn layout_spread(&self, page: &Page) -> PressResult<PagePlan> {
        let (w, h) = self.landscape();
        let m = self.config.margin();
        let gap = self.config.gap();
        let col_w = (w - 2.0 * m - gap) / 2.0;
        let col_h = h - 2.0 * m;

        let background =
            self.background(&format!("page {} background", page.page_number), w, h)?;
        let mut elements = Vec::new();

        let left = Rect::new(m, m, m + col_w, m + col_h);
        elements.push(match page.scene_image() {
            Some(scene) => self.image_or_placeholder(&scene, left),
            None => self.placeholder("", left),
        });

        let right_x = m + col_w + gap;
        let style = TextStyle::from_page(&self.config);
        let block = typeset(&page.text, col_w, &style);
        let slack = col_h - block.height;
        if slack < 0.0 {
            tracing::warn!(
                page = page.page_number,
                overflow_pt = -slack,
                "page text is taller than its column"
            );
        }
        let top = m + col_h - slack.max(0.0) / 2.0;

        if let Some(cap) = &block.drop_cap {
            elements.push(PageElement::Text(TextRun {
                role: TextRole::DropCap,
                text: cap.text.clone(),
                font: style.cap_font,
                size: style.cap_size,
                x: right_x,
                y: top - cap.baseline,
                word_spacing: 0.0,
            }));
        }
        for line in &block.lines {
            elements.push(PageElement::Text(TextRun {
                role: TextRole::Body,
                text: line.text.clone(),
                font: style.body_font,
                size: style.body_size,
                x: right_x + line.x,
                y: top - line.baseline,
                word_spacing: line.word_spacing,
            }));
        }

        let number = page.page_number.to_string();
        let number_font = BaseFont::TimesRoman;
        let number_size = self.config.page_number_size;
        elements.push(PageElement::Text(TextRun {
            role: TextRole::PageNumber,
            x: right_x + col_w - number_font.text_width(&number, number_size),
            y: self.config.page_number_baseline,
            text: number,
            font: number_font,
            size: number_size,
            word_spacing: 0.0,
        }));

        Ok(PagePlan {
            kind: PageKind::Spread {
                page_number: page.page_number,
            },
            width: w,
            height: h,
            background,
            elements,
        })
    }

    /// Aspect-fit `source` in `bounds`, or a placeholder if it cannot be decoded.
    fn image_or_placeholder(&self, source: &ImageRef, bounds: Rect) -> PageElement {
        match decode_image_file(source.path()) {
            Ok(img) => {
                let rect = fit_rect(f64::from(img.width()), f64::from(img.height()), bounds);
                PageElement::Image(PlacedImage {
                    source: source.clone(),
                    pixels: Arc::new(img),
                    rect,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "image unavailable; drawing placeholder");
                self.placeholder(&source.file_name(), bounds)
            }
        }
    }

    fn placeholder(&self, file_name: &str, bounds: Rect) -> PageElement {
        let font = BaseFont::TimesItalic;
        let size = self.config.placeholder_size;
        let text = placeholder_text(file_name, font, size, bounds.width());
        let center = bounds.center();
        PageElement::Placeholder(TextRun {
            role: TextRole::Placeholder,
            x: (center.x - font.text_width(&text, size) / 2.0).max(bounds.x0),
            y: center.y,
            text,
            font,
            size,
            word_spacing: 0.0,
        })
    }
}

/// Placeholder line for `file_name`, keeping the end of the name when the line is wider
/// than `max_width`.
fn placeholder_text(file_name: &str, font: BaseFont, size: f64, max_width: f64) -> String {
    let full = format!("[Image not available: {file_name}]");
    if font.text_width(&full, size) <= max_width {
        return full;
    }
    file_name
        .char_indices()
        .skip(1)
        .map(|(i, _)| format!("[Image not available: …{}]", &file_name[i..]))
        .find(|text| font.text_width(text, size) <= max_width)
        .unwrap_or_else(|| "[Image not available: …]".to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/document/layout.rs"]
mod tests;
