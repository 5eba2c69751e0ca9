use std::{collections::BTreeMap, path::Path};

use anyhow::Context;

use crate::{
    foundation::error::{PressError, PressResult},
    model::image_ref::ImageRef,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// A complete storybook as produced by the story and illustration stages.
///
/// Field names follow the JSON exchanged with those stages. Empty image paths mean the image
/// was never produced.
pub struct StorybookDocument {
    /// Book title, shown on the cover when there is no cover image.
    #[serde(rename = "storybook_title")]
    pub title: String,
    /// Cover illustration.
    #[serde(rename = "storybook_image_path", default)]
    pub cover_image_path: Option<String>,
    /// Prompt used to generate the cover.
    #[serde(rename = "storybook_prompt", default)]
    pub cover_prompt: String,
    /// Characters keyed by name.
    #[serde(default)]
    pub characters: BTreeMap<String, Character>,
    /// Story pages; not necessarily sorted.
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// A named character with its reference portrait.
pub struct Character {
    /// Character name, also the key in [`StorybookDocument::characters`].
    #[serde(rename = "character_name")]
    pub name: String,
    /// Prompt used to generate the portrait.
    #[serde(rename = "character_prompt", default)]
    pub prompt: String,
    /// Portrait image.
    #[serde(rename = "character_image_path", default)]
    pub image_path: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// One story page: a scene illustration next to its text.
pub struct Page {
    /// Story text. Blank lines separate paragraphs.
    #[serde(rename = "scene_text")]
    pub text: String,
    /// 1-based page number.
    pub page_number: u32,
    /// Names of the characters appearing in the scene.
    #[serde(default)]
    pub characters: Vec<String>,
    /// Prompt used to generate the scene.
    #[serde(rename = "scene_prompt", default)]
    pub scene_prompt: String,
    /// Scene illustration.
    #[serde(rename = "scene_image_path", default)]
    pub scene_image_path: Option<String>,
}

fn image_ref_for(path: Option<&String>) -> Option<ImageRef> {
    path.map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(ImageRef::from)
}

impl StorybookDocument {
    /// Parse a document from JSON text.
    pub fn from_json_str(json: &str) -> PressResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| PressError::invalid_input(format!("storybook json: {e}")))
    }

    /// Read and parse a document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PressResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read storybook from '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> PressResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PressError::serde(e.to_string()))
    }

    /// Cover image, if one was produced.
    pub fn cover_image(&self) -> Option<ImageRef> {
        image_ref_for(self.cover_image_path.as_ref())
    }

    /// Pages sorted by page number; ties keep input order.
    pub fn pages_in_order(&self) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self.pages.iter().collect();
        pages.sort_by_key(|p| p.page_number);
        pages
    }

    /// Portraits of every character that has one, in name order.
    pub fn character_references(&self) -> Vec<ImageRef> {
        self.characters
            .values()
            .filter_map(|c| c.image())
            .collect()
    }

    /// Portraits of the characters appearing on `page`, in the page's order.
    ///
    /// Unknown names are an error; characters without a portrait are skipped.
    pub fn scene_references(&self, page: &Page) -> PressResult<Vec<ImageRef>> {
        let mut out = Vec::with_capacity(page.characters.len());
        for name in &page.characters {
            let character = self.characters.get(name).ok_or_else(|| {
                PressError::invalid_input(format!(
                    "page {} references unknown character '{name}'",
                    page.page_number
                ))
            })?;
            if let Some(r) = character.image() {
                out.push(r);
            }
        }
        Ok(out)
    }
}

impl Character {
    /// Portrait image, if one was produced.
    pub fn image(&self) -> Option<ImageRef> {
        image_ref_for(self.image_path.as_ref())
    }
}

impl Page {
    /// Scene illustration, if one was produced.
    pub fn scene_image(&self) -> Option<ImageRef> {
        image_ref_for(self.scene_image_path.as_ref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/storybook.rs"]
mod tests;
