use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::StorybookConfig,
    document::layout::{DocumentLayoutEngine, DocumentPlan},
    foundation::error::PressResult,
    model::{
        image_ref::ImageRef,
        storybook::{Page, StorybookDocument},
    },
    montage::{
        cache::MontageCache,
        compose::{GridMontageComposer, MontageComposer},
    },
    texture::synth::TextureSynthesizer,
};

/// File stem used when a storybook has no usable title.
const UNTITLED_STEM: &str = "storybook";

/// The assembled engine: reference sheets, page backgrounds and document layout.
///
/// One instance owns both caches and is meant to live as long as the process that drives
/// it. It is `Send + Sync` whenever the composer is.
pub struct StoryPress<C: MontageComposer = GridMontageComposer> {
    config: StorybookConfig,
    textures: Arc<TextureSynthesizer>,
    montages: MontageCache<C>,
    layout: DocumentLayoutEngine,
}

impl StoryPress<GridMontageComposer> {
    /// Validate `config` and build the engine with the grid composer.
    pub fn new(config: StorybookConfig) -> PressResult<Self> {
        let composer = GridMontageComposer::new(config.montage.clone())?;
        Self::with_composer(config, composer)
    }
}

impl<C: MontageComposer> StoryPress<C> {
    /// Validate `config` and build the engine around a custom composer.
    pub fn with_composer(config: StorybookConfig, composer: C) -> PressResult<Self> {
        config.validate()?;
        let textures = Arc::new(TextureSynthesizer::new(config.parchment.clone())?);
        let layout = DocumentLayoutEngine::new(config.page.clone(), textures.clone())?;
        let montages = MontageCache::new(composer, config.output_dir.clone(), &config.cache);
        tracing::debug!(output_dir = %config.output_dir.display(), "storypress ready");
        Ok(Self {
            config,
            textures,
            montages,
            layout,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &StorybookConfig {
        &self.config
    }

    /// Shared page background synthesizer.
    pub fn textures(&self) -> &Arc<TextureSynthesizer> {
        &self.textures
    }

    /// Reference-sheet cache.
    pub fn montages(&self) -> &MontageCache<C> {
        &self.montages
    }

    /// Document layout engine.
    pub fn layout_engine(&self) -> &DocumentLayoutEngine {
        &self.layout
    }

    /// Reference sheet of the characters on `page`.
    ///
    /// `None` when none of them has a portrait. Unknown character names are an error.
    pub fn scene_reference_sheet(
        &self,
        doc: &StorybookDocument,
        page: &Page,
    ) -> PressResult<Option<PathBuf>> {
        let refs = doc.scene_references(page)?;
        self.sheet_for(&refs)
    }

    /// Reference sheet of every character with a portrait.
    pub fn cover_reference_sheet(&self, doc: &StorybookDocument) -> PressResult<Option<PathBuf>> {
        self.sheet_for(&doc.character_references())
    }

    fn sheet_for(&self, refs: &[ImageRef]) -> PressResult<Option<PathBuf>> {
        if refs.is_empty() {
            return Ok(None);
        }
        self.montages.get_or_create(refs).map(Some)
    }

    /// Lay out `doc` without writing anything.
    pub fn plan_document(&self, doc: &StorybookDocument) -> PressResult<DocumentPlan> {
        self.layout.layout(doc)
    }

    /// Write `doc` as a PDF at `out_path`.
    pub fn render_document(&self, doc: &StorybookDocument, out_path: &Path) -> PressResult<PathBuf> {
        self.layout.render_pdf(doc, out_path)
    }

    /// `<output_dir>/<title>.pdf`, with path separators in the title replaced.
    pub fn default_pdf_path(&self, doc: &StorybookDocument) -> PathBuf {
        let stem: String = doc
            .title
            .trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
            .collect();
        let stem = if stem.is_empty() || stem == "." || stem == ".." {
            UNTITLED_STEM.to_string()
        } else {
            stem
        };
        self.config.output_dir.join(format!("{stem}.pdf"))
    }
}

#[cfg(test)]
#[path = "../tests/unit/press.rs"]
mod tests;
