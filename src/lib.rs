//! storypress turns a finished storybook into print-ready artifacts.
//!
//! A storybook (title, characters with portraits, pages with scene text and illustrations)
//! is produced elsewhere and handed over as JSON. storypress provides the visual plumbing
//! around it:
//!
//! 1. **Reference sheets**: [`GridMontageComposer`] tiles several portraits into one labeled
//!    image, and [`MontageCache`] stores each distinct image set once under a content key.
//! 2. **Backgrounds**: [`TextureSynthesizer`] generates a parchment texture per page size and
//!    keeps the most recently used sizes.
//! 3. **Layout**: [`DocumentLayoutEngine`] places a cover and one landscape spread per page
//!    (illustration left, drop-capped text right, page number) and writes the PDF.
//!
//! [`StoryPress`] wires the three together from one [`StorybookConfig`].
//!
//! Constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Atomic outputs**: montages and PDFs are written to a temp sibling and renamed.
//! - **Bounded caches**: both caches have a fixed capacity and evict least recently used.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod assets;
mod document;
mod foundation;
mod model;
mod montage;
mod press;
mod texture;

/// Engine configuration and environment overrides.
pub mod config;

pub use assets::decode::{decode_image, decode_image_file, flatten_onto, normalize_generated_image};
pub use assets::fonts::{LabelFont, TextBrushRgba8, TextLayoutEngine, resolve_label_font};
pub use assets::write::{ensure_parent_dir, write_atomic, write_png_atomic};
pub use config::{
    CacheConfig, ENV_MONTAGE_CACHE_CAPACITY, ENV_OUTPUT_DIR, ENV_TEXTURE_SEED, MontageConfig,
    PageConfig, ParchmentConfig, StorybookConfig,
};
pub use document::layout::{
    DocumentLayoutEngine, DocumentPlan, PageElement, PageKind, PagePlan, PlacedImage, TextRole,
    TextRun,
};
pub use document::metrics::{BaseFont, encode_win_ansi, win_ansi_byte};
pub use document::pdf::write_pdf;
pub use document::text::{
    DropCap, SetLine, TextBlock, TextStyle, split_paragraphs, typeset, wrap_words,
};
pub use foundation::color::Rgb8;
pub use foundation::error::{PressError, PressResult};
pub use foundation::geometry::{
    Fit, Grid, Point, Rect, Size, center_offset, center_offset_f64, fit_rect, grid_dimensions,
    scale_to_fit, scale_to_fit_f64,
};
pub use foundation::policy::FailurePolicy;
pub use model::image_ref::ImageRef;
pub use model::storybook::{Character, Page, StorybookDocument};
pub use montage::cache::{EvictionPolicy, MontageCache, MontageKey, MontageOrdering};
pub use montage::compose::{GridMontageComposer, MontageComposer};
pub use montage::layout::{LayoutCell, MontageLayout, PixelRect};
pub use press::StoryPress;
pub use texture::blur::{autocontrast_u8, gaussian_blur_u8};
pub use texture::synth::{Texture, TextureSynthesizer};
