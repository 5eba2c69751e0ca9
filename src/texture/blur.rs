use crate::foundation::error::{PressError, PressResult};

/// Gaussian blur over interleaved 8-bit channels.
///
/// `sigma` is in pixels; the kernel reaches `ceil(3 * sigma)` pixels each way and edges are
/// clamped. A zero sigma returns the input unchanged.
pub fn gaussian_blur_u8(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    sigma: f32,
) -> PressResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| PressError::rendering("blur buffer size overflow"))?;
    if channels == 0 || src.len() != expected_len {
        return Err(PressError::rendering(
            "gaussian_blur_u8 expects src matching width*height*channels",
        ));
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(PressError::invalid_input("blur sigma must be finite and >= 0"));
    }
    let radius = (3.0 * sigma).ceil() as u32;
    if radius == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma);
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, channels, &kernel);
    vertical_pass(&tmp, &mut out, width, height, channels, &kernel);
    Ok(out)
}

/// Fixed-point one, the sum of every kernel.
const Q16_ONE: u32 = 1 << 16;

/// Taps `-radius..=radius` of a normalized Gaussian in Q16.
///
/// The center tap absorbs the rounding error so the taps always sum to [`Q16_ONE`].
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> Vec<u32> {
    let two_sigma_sq = 2.0 * f64::from(sigma).powi(2);
    let r = i64::from(radius);
    let falloff: Vec<f64> = (-r..=r)
        .map(|d| (-((d * d) as f64) / two_sigma_sq).exp())
        .collect();
    let total: f64 = falloff.iter().sum();

    let mut taps: Vec<u32> = falloff
        .iter()
        .map(|w| (w / total * f64::from(Q16_ONE)).round() as u32)
        .collect();
    let mid = taps.len() / 2;
    let sides: u32 = taps[..mid].iter().chain(&taps[mid + 1..]).sum();
    taps[mid] = Q16_ONE.saturating_sub(sides);
    taps
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, ch: usize, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    let mut acc = vec![0u64; ch];
    for y in 0..i64::from(height) {
        for x in 0..w {
            acc.fill(0);
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i64 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * ch;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * ch;
            for (c, a) in acc.iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(*a);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, ch: usize, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    let h = i64::from(height);
    let mut acc = vec![0u64; ch];
    for y in 0..h {
        for x in 0..w {
            acc.fill(0);
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i64 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * ch;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * ch;
            for (c, a) in acc.iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(*a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + u64::from(Q16_ONE / 2)) >> 16;
    (v.min(255)) as u8
}

/// Stretch `luma` so the darkest and brightest `cutoff_pct` percent clip to 0 and 255.
///
/// Leaves the buffer untouched when the remaining histogram collapses to a single level.
pub fn autocontrast_u8(luma: &mut [u8], cutoff_pct: f32) {
    let mut hist = [0u64; 256];
    for &v in luma.iter() {
        hist[usize::from(v)] += 1;
    }
    let total: u64 = hist.iter().sum();
    let cut = (total as f64 * f64::from(cutoff_pct.clamp(0.0, 50.0)) / 100.0).floor() as u64;

    let mut trimmed = hist;
    let mut remaining = cut;
    for bin in trimmed.iter_mut() {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(*bin);
        *bin -= take;
        remaining -= take;
    }
    remaining = cut;
    for bin in trimmed.iter_mut().rev() {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(*bin);
        *bin -= take;
        remaining -= take;
    }

    let Some(lo) = trimmed.iter().position(|&c| c > 0) else {
        return;
    };
    let Some(hi) = trimmed.iter().rposition(|&c| c > 0) else {
        return;
    };
    if hi <= lo {
        return;
    }

    let scale = 255.0 / (hi - lo) as f64;
    let offset = -(lo as f64) * scale;
    let mut lut = [0u8; 256];
    for (ix, slot) in lut.iter_mut().enumerate() {
        *slot = (ix as f64 * scale + offset).clamp(0.0, 255.0) as u8;
    }
    for v in luma.iter_mut() {
        *v = lut[usize::from(*v)];
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/blur.rs"]
mod tests;
