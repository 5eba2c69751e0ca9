//! Integer helpers for texture synthesis.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the little-endian bytes of `seed`, then of each value in `parts`.
///
/// Used to derive a per-size RNG seed, so each texture size is reproducible on its own.
pub(crate) fn mix_seed(seed: u64, parts: &[u32]) -> u64 {
    seed.to_le_bytes()
        .into_iter()
        .chain(parts.iter().flat_map(|p| p.to_le_bytes()))
        .fold(FNV_OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// `x * y / 255` with rounding.
pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Linear blend of `a` towards `b` by an 8-bit mask (`0` keeps `a`, `255` yields `b`).
pub(crate) fn mask_blend_u8(a: u8, b: u8, mask: u8) -> u8 {
    let m = u16::from(mask);
    mul_div255_u8(u16::from(b), m).saturating_add(mul_div255_u8(u16::from(a), 255 - m))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
