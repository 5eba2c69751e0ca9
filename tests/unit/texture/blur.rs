use super::*;

#[test]
fn zero_sigma_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    let out = gaussian_blur_u8(&src, 2, 1, 3, 0.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn constant_image_is_identity() {
    let (w, h) = (5u32, 4u32);
    let src = [245u8, 238, 221].repeat((w * h) as usize);
    let out = gaussian_blur_u8(&src, w, h, 3, 1.2).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h) as usize];
    src[(3 * w + 3) as usize] = 255;

    let out = gaussian_blur_u8(&src, w, h, 1, 1.2).unwrap();

    assert!(out.iter().filter(|&&v| v != 0).count() > 1);
    let sum: u32 = out.iter().map(|&v| u32::from(v)).sum();
    assert!((sum as i32 - 255).abs() <= 8);
    assert!(out[(3 * w + 3) as usize] < 255);
}

#[test]
fn mismatched_buffer_is_rejected() {
    assert!(gaussian_blur_u8(&[0u8; 5], 2, 2, 1, 1.0).is_err());
    assert!(gaussian_blur_u8(&[0u8; 4], 2, 2, 1, f32::NAN).is_err());
}

#[test]
fn autocontrast_stretches_to_full_range() {
    let mut luma: Vec<u8> = (100u8..=150).collect();
    autocontrast_u8(&mut luma, 0.0);
    assert_eq!(luma.first(), Some(&0));
    assert_eq!(luma.last(), Some(&255));
}

#[test]
fn autocontrast_cutoff_clips_outliers() {
    let mut luma = vec![128u8; 96];
    luma.extend([0u8, 255, 120, 136]);
    autocontrast_u8(&mut luma, 1.0);
    // The two extremes fall inside the 1% cut, so 120..=136 is stretched instead.
    assert_eq!(luma[96], 0);
    assert_eq!(luma[97], 255);
    assert_eq!(luma[98], 0);
    assert_eq!(luma[99], 255);
    assert_eq!(luma[0], 127);
}

#[test]
fn autocontrast_flat_histogram_is_unchanged() {
    let mut luma = vec![77u8; 64];
    autocontrast_u8(&mut luma, 1.0);
    assert!(luma.iter().all(|&v| v == 77));
}

#[test]
fn kernel_is_symmetric_and_sums_to_one() {
    for (radius, sigma) in [(1u32, 0.3f32), (4, 1.2), (15, 5.0)] {
        let k = gaussian_kernel_q16(radius, sigma);
        assert_eq!(k.len(), (2 * radius + 1) as usize);
        assert_eq!(k.iter().sum::<u32>(), Q16_ONE);
        assert!(k.iter().eq(k.iter().rev()));
        assert!(k[radius as usize] >= k[0]);
    }
}
