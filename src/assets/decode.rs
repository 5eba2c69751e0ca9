use std::path::Path;

use image::{DynamicImage, RgbImage};

use crate::foundation::{
    color::Rgb8,
    error::{PressError, PressResult},
    math::mask_blend_u8,
};

/// Decode encoded image bytes. Any failure is `ResourceUnavailable`.
pub fn decode_image(bytes: &[u8]) -> PressResult<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| PressError::resource_unavailable(format!("decode image: {e}")))
}

/// Read and decode an image file.
///
/// Missing, unreadable and undecodable files all map to `ResourceUnavailable` so callers can
/// degrade without inspecting IO errors.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn decode_image_file(path: &Path) -> PressResult<DynamicImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        PressError::resource_unavailable(format!("read image '{}': {e}", path.display()))
    })?;
    image::load_from_memory(&bytes).map_err(|e| {
        PressError::resource_unavailable(format!("decode image '{}': {e}", path.display()))
    })
}

/// Composite `img` over an opaque `bg`, dropping alpha.
pub fn flatten_onto(img: &DynamicImage, bg: Rgb8) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let bg = bg.to_array();
    let mut out = RgbImage::new(w, h);
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let a = src.0[3];
        for c in 0..3 {
            dst.0[c] = mask_blend_u8(bg[c], src.0[c], a);
        }
    }
    out
}

/// Normalize a freshly generated illustration to opaque RGB.
///
/// Palette images are expanded and alpha is flattened onto white, matching what the
/// illustration stage stores before handing paths to this engine.
pub fn normalize_generated_image(bytes: &[u8]) -> PressResult<RgbImage> {
    let img = decode_image(bytes)?;
    Ok(flatten_onto(&img, Rgb8::WHITE))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
