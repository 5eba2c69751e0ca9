use std::sync::{Arc, Mutex, PoisonError};

use image::RgbImage;
use rand::{RngCore, SeedableRng, rngs::StdRng};

use crate::{
    config::ParchmentConfig,
    foundation::{
        color::Rgb8,
        error::{PressError, PressResult},
        lru::LruCache,
        math::{mask_blend_u8, mix_seed},
    },
    texture::blur::{autocontrast_u8, gaussian_blur_u8},
};

/// Percentage of the noise histogram clipped at each end before stretching.
const AUTOCONTRAST_CUTOFF_PCT: f32 = 1.0;

/// Largest texture synthesized, in pixels.
const MAX_TEXTURE_PIXELS: usize = 1 << 26;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Opaque RGB8 page background.
pub struct Texture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGB8 pixels, `width * height * 3` bytes.
    pub rgb8: Vec<u8>,
}

impl Texture {
    /// Copy into an `image` buffer.
    pub fn to_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.rgb8.clone())
    }

    /// Pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 3;
        Some([self.rgb8[i], self.rgb8[i + 1], self.rgb8[i + 2]])
    }
}

/// Parchment backgrounds with a small per-size cache.
///
/// Textures are keyed by pixel size, so two page sizes that round to the same pixel grid share
/// one texture. The cache is bounded and evicts the least recently requested size.
pub struct TextureSynthesizer {
    config: ParchmentConfig,
    base: Rgb8,
    cache: Mutex<LruCache<(u32, u32), Arc<Texture>>>,
}

impl TextureSynthesizer {
    /// Validate `config` and build an empty synthesizer.
    pub fn new(config: ParchmentConfig) -> PressResult<Self> {
        config.validate()?;
        let base = config.base_rgb()?;
        let capacity = config.cache_capacity;
        Ok(Self {
            config,
            base,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Active parameters.
    pub fn config(&self) -> &ParchmentConfig {
        &self.config
    }

    /// Maximum number of cached sizes.
    pub fn capacity(&self) -> usize {
        self.config.cache_capacity
    }

    /// Cached sizes, least recently requested first.
    pub fn cached_sizes(&self) -> Vec<(u32, u32)> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys_lru_order()
    }

    /// Background for a page of `w_pt` x `h_pt` points.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn texture_for_page(&self, w_pt: f64, h_pt: f64) -> PressResult<Arc<Texture>> {
        let (w, h) = self.config.pixel_size(w_pt, h_pt);
        self.texture_for_pixels(w, h)
    }

    /// Cached background of exactly `w_px` x `h_px` pixels.
    pub fn texture_for_pixels(&self, w_px: u32, h_px: u32) -> PressResult<Arc<Texture>> {
        let key = (w_px, h_px);
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::debug!(w_px, h_px, "texture cache hit");
            return Ok(hit.clone());
        }

        tracing::debug!(w_px, h_px, "texture cache miss");
        let fresh = Arc::new(self.synthesize(w_px, h_px)?);

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        // A concurrent miss may have committed first; keep that one.
        if let Some(existing) = cache.get(&key) {
            return Ok(existing.clone());
        }
        for ((ew, eh), _) in cache.insert(key, fresh.clone()) {
            tracing::debug!(w_px = ew, h_px = eh, "texture evicted");
        }
        Ok(fresh)
    }

    /// Synthesize a background without touching the cache.
    pub fn synthesize(&self, w_px: u32, h_px: u32) -> PressResult<Texture> {
        if w_px == 0 || h_px == 0 {
            return Err(PressError::invalid_input(format!(
                "texture size {w_px}x{h_px} must be non-empty"
            )));
        }
        let len = (w_px as usize)
            .checked_mul(h_px as usize)
            .filter(|&n| n <= MAX_TEXTURE_PIXELS)
            .ok_or_else(|| {
                PressError::invalid_input(format!("texture size {w_px}x{h_px} is too large"))
            })?;

        let mut noise = vec![0u8; len];
        self.rng_for(w_px, h_px).fill_bytes(&mut noise);
        let mut noise = gaussian_blur_u8(&noise, w_px, h_px, 1, self.config.blur_radius)?;
        autocontrast_u8(&mut noise, AUTOCONTRAST_CUTOFF_PCT);

        let grain = self.config.grain_strength;
        let light_gain = grain * self.config.light_grain_ratio;
        let base = self.base.to_array();
        let dark = self.base.shade(self.config.dark_shade).to_array();
        let light = self.base.shade(self.config.light_shade).to_array();

        let mut rgb8 = Vec::with_capacity(len * 3);
        for n in noise {
            let dark_mask = (f32::from(n) * grain) as u8;
            let light_mask = (f32::from(255 - dark_mask) * light_gain) as u8;
            for c in 0..3 {
                let v = mask_blend_u8(base[c], dark[c], dark_mask);
                rgb8.push(mask_blend_u8(v, light[c], light_mask));
            }
        }

        let rgb8 = gaussian_blur_u8(&rgb8, w_px, h_px, 3, self.config.soften_radius)?;
        Ok(Texture {
            width: w_px,
            height: h_px,
            rgb8,
        })
    }

    fn rng_for(&self, w_px: u32, h_px: u32) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(mix_seed(seed, &[w_px, h_px])),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/synth.rs"]
mod tests;
