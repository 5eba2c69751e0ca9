//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a complete configuration. A few
//! values can also be overridden through the process environment, see
//! [`StorybookConfig::apply_env_overrides`].

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::{
        color::Rgb8,
        error::{PressError, PressResult},
        policy::FailurePolicy,
    },
    montage::cache::{EvictionPolicy, MontageOrdering},
};

/// Environment variable naming the directory montages are written to.
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
/// Environment variable holding a `u64` texture seed.
pub const ENV_TEXTURE_SEED: &str = "STORYPRESS_TEXTURE_SEED";
/// Environment variable holding the montage cache capacity.
pub const ENV_MONTAGE_CACHE_CAPACITY: &str = "STORYPRESS_MONTAGE_CACHE_CAPACITY";

/// Millimetres to PDF points.
pub const MM: f64 = 72.0 / 25.4;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Top-level configuration for [`crate::StoryPress`].
pub struct StorybookConfig {
    /// Page background synthesis.
    pub parchment: ParchmentConfig,
    /// Reference-sheet composition.
    pub montage: MontageConfig,
    /// Page geometry and typography.
    pub page: PageConfig,
    /// Montage cache behavior.
    pub cache: CacheConfig,
    /// Directory receiving `merge_<key>.png` composites.
    pub output_dir: PathBuf,
}

impl Default for StorybookConfig {
    fn default() -> Self {
        Self {
            parchment: ParchmentConfig::default(),
            montage: MontageConfig::default(),
            page: PageConfig::default(),
            cache: CacheConfig::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Parameters of the procedural parchment texture.
pub struct ParchmentConfig {
    /// Base paper color, `#RRGGBB`.
    pub base_color: String,
    /// Noise attenuation in `0..=1`.
    pub grain_strength: f32,
    /// Gaussian sigma applied to the raw noise, in pixels.
    pub blur_radius: f32,
    /// Texture resolution.
    pub dpi: f32,
    /// Lower bound for either texture dimension.
    pub min_px: u32,
    /// Shade offset of the dark fibres.
    pub dark_shade: i16,
    /// Shade offset of the light fibres.
    pub light_shade: i16,
    /// Light mask strength relative to `grain_strength`.
    pub light_grain_ratio: f32,
    /// Final softening sigma, in pixels.
    pub soften_radius: f32,
    /// Number of distinct texture sizes kept in memory.
    pub cache_capacity: usize,
    /// Fixed noise seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ParchmentConfig {
    fn default() -> Self {
        Self {
            base_color: "#F5EEDD".to_string(),
            grain_strength: 0.24,
            blur_radius: 1.2,
            dpi: 150.0,
            min_px: 64,
            dark_shade: -18,
            light_shade: 14,
            light_grain_ratio: 0.65,
            soften_radius: 0.4,
            cache_capacity: 4,
            seed: None,
        }
    }
}

impl ParchmentConfig {
    /// Parsed base color.
    pub fn base_rgb(&self) -> PressResult<Rgb8> {
        Rgb8::from_hex(&self.base_color)
    }

    /// Check every parameter, failing with `InvalidInput` on the first bad one.
    pub fn validate(&self) -> PressResult<()> {
        self.base_rgb()?;
        unit_interval("parchment.grain_strength", self.grain_strength)?;
        unit_interval("parchment.light_grain_ratio", self.light_grain_ratio)?;
        non_negative("parchment.blur_radius", self.blur_radius)?;
        non_negative("parchment.soften_radius", self.soften_radius)?;
        positive("parchment.dpi", self.dpi)?;
        if self.min_px == 0 {
            return Err(PressError::invalid_input("parchment.min_px must be > 0"));
        }
        if self.cache_capacity == 0 {
            return Err(PressError::invalid_input(
                "parchment.cache_capacity must be > 0",
            ));
        }
        Ok(())
    }

    /// Pixel size of the texture covering a `w_pt` x `h_pt` page.
    pub fn pixel_size(&self, w_pt: f64, h_pt: f64) -> (u32, u32) {
        let px = |pt: f64| -> u32 {
            let v = (pt / 72.0 * f64::from(self.dpi)).floor();
            let v = if v.is_finite() && v > 0.0 {
                v.min(f64::from(u32::MAX)) as u32
            } else {
                0
            };
            v.max(self.min_px)
        };
        (px(w_pt), px(h_pt))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Parameters of the labeled grid montage.
pub struct MontageConfig {
    /// Thumbnail box width.
    pub thumb_width: u32,
    /// Thumbnail box height.
    pub thumb_height: u32,
    /// Label size in pixels. Never shrunk to fit.
    pub font_size: f32,
    /// Fixed column count; `None` picks a near-square grid.
    pub columns: Option<u32>,
    /// Canvas and letterbox color, `#RRGGBB`.
    pub background: String,
    /// Label color, `#RRGGBB`.
    pub text_color: String,
    /// Outer canvas padding.
    pub padding: u32,
    /// Padding inside each cell.
    pub cell_padding: u32,
    /// Extra height added to the label band.
    pub label_padding: u32,
    /// Final image width.
    pub output_width: u32,
    /// Final image height.
    pub output_height: u32,
    /// Label font file tried before system fonts.
    pub font_path: Option<PathBuf>,
    /// What to do when one source image cannot be read.
    pub failure_policy: FailurePolicy,
}

impl Default for MontageConfig {
    fn default() -> Self {
        Self {
            thumb_width: 420,
            thumb_height: 420,
            font_size: 80.0,
            columns: None,
            background: "#FFFFFF".to_string(),
            text_color: "#000000".to_string(),
            padding: 30,
            cell_padding: 15,
            label_padding: 10,
            output_width: 724,
            output_height: 1024,
            font_path: None,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl MontageConfig {
    /// Parsed background color.
    pub fn background_rgb(&self) -> PressResult<Rgb8> {
        Rgb8::from_hex(&self.background)
    }

    /// Parsed label color.
    pub fn text_rgb(&self) -> PressResult<Rgb8> {
        Rgb8::from_hex(&self.text_color)
    }

    /// Check every parameter, failing with `InvalidInput` on the first bad one.
    pub fn validate(&self) -> PressResult<()> {
        self.background_rgb()?;
        self.text_rgb()?;
        positive("montage.font_size", self.font_size)?;
        if self.thumb_width == 0 || self.thumb_height == 0 {
            return Err(PressError::invalid_input("montage thumbnail box must be > 0"));
        }
        if self.output_width == 0 || self.output_height == 0 {
            return Err(PressError::invalid_input("montage output size must be > 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Page geometry and typography, in PDF points unless noted.
pub struct PageConfig {
    /// Cover width; spreads use the same sheet turned landscape.
    pub width_pt: f64,
    /// Cover height.
    pub height_pt: f64,
    /// Margin in millimetres.
    pub margin_mm: f64,
    /// Gap between the image and text columns, in millimetres.
    pub gap_mm: f64,
    /// Body text size.
    pub body_size: f64,
    /// Baseline-to-baseline distance of body text.
    pub leading: f64,
    /// Drop cap size as a multiple of `body_size`.
    pub drop_cap_scale: f64,
    /// Horizontal space between the drop cap and the indented lines.
    pub drop_cap_gap: f64,
    /// Extra space between paragraphs.
    pub paragraph_spacing: f64,
    /// Cover title size.
    pub title_size: f64,
    /// Missing-image placeholder size.
    pub placeholder_size: f64,
    /// Page number size.
    pub page_number_size: f64,
    /// Page number baseline, measured from the bottom edge.
    pub page_number_baseline: f64,
    /// Ink color, `#RRGGBB`.
    pub text_color: String,
    /// What to do when a page cannot be fully laid out.
    pub failure_policy: FailurePolicy,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width_pt: 419.527_559,
            height_pt: 595.275_591,
            margin_mm: 10.0,
            gap_mm: 6.0,
            body_size: 13.0,
            leading: 18.0,
            drop_cap_scale: 3.0,
            drop_cap_gap: 4.0,
            paragraph_spacing: 9.0,
            title_size: 24.0,
            placeholder_size: 10.0,
            page_number_size: 10.0,
            page_number_baseline: 6.0,
            text_color: "#000000".to_string(),
            failure_policy: FailurePolicy::Continue,
        }
    }
}

impl PageConfig {
    /// Margin in points.
    pub fn margin(&self) -> f64 {
        self.margin_mm * MM
    }

    /// Column gap in points.
    pub fn gap(&self) -> f64 {
        self.gap_mm * MM
    }

    /// Parsed ink color.
    pub fn text_rgb(&self) -> PressResult<Rgb8> {
        Rgb8::from_hex(&self.text_color)
    }

    /// Check every parameter, failing with `InvalidInput` on the first bad one.
    pub fn validate(&self) -> PressResult<()> {
        self.text_rgb()?;
        for (name, v) in [
            ("page.width_pt", self.width_pt),
            ("page.height_pt", self.height_pt),
            ("page.body_size", self.body_size),
            ("page.leading", self.leading),
            ("page.drop_cap_scale", self.drop_cap_scale),
            ("page.title_size", self.title_size),
            ("page.placeholder_size", self.placeholder_size),
            ("page.page_number_size", self.page_number_size),
        ] {
            positive(name, v)?;
        }
        for (name, v) in [
            ("page.margin_mm", self.margin_mm),
            ("page.gap_mm", self.gap_mm),
            ("page.drop_cap_gap", self.drop_cap_gap),
            ("page.paragraph_spacing", self.paragraph_spacing),
            ("page.page_number_baseline", self.page_number_baseline),
        ] {
            non_negative(name, v)?;
        }
        if 2.0 * self.margin() >= self.width_pt.min(self.height_pt) {
            return Err(PressError::invalid_input("page margins leave no content area"));
        }
        if 2.0 * self.margin() + self.gap() >= self.width_pt.max(self.height_pt) {
            return Err(PressError::invalid_input("spread columns have no width"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Montage cache behavior.
pub struct CacheConfig {
    /// Maximum number of recorded composites.
    pub montage_capacity: usize,
    /// What happens to the file of an evicted composite.
    pub eviction: EvictionPolicy,
    /// Slot assignment of composed images.
    pub ordering: MontageOrdering,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            montage_capacity: 64,
            eviction: EvictionPolicy::Keep,
            ordering: MontageOrdering::SortedByLabel,
        }
    }
}

impl StorybookConfig {
    /// Parse a configuration from JSON text. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> PressResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| PressError::invalid_input(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PressResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config from '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> PressResult<Self> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    /// Apply `OUTPUT_DIR`, `STORYPRESS_TEXTURE_SEED` and `STORYPRESS_MONTAGE_CACHE_CAPACITY`.
    pub fn apply_env_overrides(&mut self) -> PressResult<()> {
        self.apply_overrides_from(|k| std::env::var(k).ok())
    }

    /// Apply overrides from an arbitrary lookup; unset or blank values are ignored.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> PressResult<()> {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(seed) = get(ENV_TEXTURE_SEED) {
            let seed = seed.parse::<u64>().map_err(|_| {
                PressError::invalid_input(format!("{ENV_TEXTURE_SEED}='{seed}' is not a u64"))
            })?;
            self.parchment.seed = Some(seed);
        }
        if let Some(cap) = get(ENV_MONTAGE_CACHE_CAPACITY) {
            let cap = cap.parse::<usize>().ok().filter(|c| *c > 0).ok_or_else(|| {
                PressError::invalid_input(format!(
                    "{ENV_MONTAGE_CACHE_CAPACITY}='{cap}' must be a positive integer"
                ))
            })?;
            self.cache.montage_capacity = cap;
        }
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> PressResult<()> {
        self.parchment.validate()?;
        self.montage.validate()?;
        self.page.validate()?;
        if self.cache.montage_capacity == 0 {
            return Err(PressError::invalid_input(
                "cache.montage_capacity must be > 0",
            ));
        }
        Ok(())
    }
}

fn positive<T: Into<f64>>(name: &str, v: T) -> PressResult<()> {
    let v = v.into();
    if !v.is_finite() || v <= 0.0 {
        return Err(PressError::invalid_input(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

fn non_negative<T: Into<f64>>(name: &str, v: T) -> PressResult<()> {
    let v = v.into();
    if !v.is_finite() || v < 0.0 {
        return Err(PressError::invalid_input(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn unit_interval(name: &str, v: f32) -> PressResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(PressError::invalid_input(format!("{name} must be in 0..=1")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
