//! Render a storybook JSON file to PDF, with a reference sheet per page.
//!
//! ```text
//! cargo run --example render_storybook -- path/to/storybook.json [out.pdf]
//! ```
//!
//! `OUTPUT_DIR`, `STORYPRESS_TEXTURE_SEED` and `STORYPRESS_MONTAGE_CACHE_CAPACITY` are honored.

use std::path::PathBuf;

use anyhow::Context;
use storypress::{StoryPress, StorybookConfig, StorybookDocument};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .context("usage: render_storybook <storybook.json> [out.pdf]")?;
    let doc = StorybookDocument::from_path(&input)?;

    let press = StoryPress::new(StorybookConfig::from_env()?)?;
    for page in doc.pages_in_order() {
        match press.scene_reference_sheet(&doc, page)? {
            Some(sheet) => println!("page {}: {}", page.page_number, sheet.display()),
            None => println!("page {}: no reference sheet", page.page_number),
        }
    }

    let out = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| press.default_pdf_path(&doc));
    let written = press.render_document(&doc, &out)?;
    println!("wrote {}", written.display());
    Ok(())
}
