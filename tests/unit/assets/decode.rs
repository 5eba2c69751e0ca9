use std::io::Cursor;

use super::*;

fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn flatten_blends_alpha_over_background() {
    let img = image::RgbaImage::from_raw(2, 1, vec![0, 0, 0, 0, 200, 100, 0, 128]).unwrap();
    let flat = flatten_onto(&DynamicImage::ImageRgba8(img), Rgb8::WHITE);
    assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
    let p = flat.get_pixel(1, 0).0;
    assert!((i32::from(p[0]) - 227).abs() <= 1);
    assert!((i32::from(p[1]) - 177).abs() <= 1);
    assert!((i32::from(p[2]) - 127).abs() <= 1);
}

#[test]
fn opaque_images_pass_through() {
    let img = image::RgbImage::from_pixel(3, 2, image::Rgb([9, 8, 7]));
    let flat = flatten_onto(&DynamicImage::ImageRgb8(img.clone()), Rgb8::BLACK);
    assert_eq!(flat, img);
}

#[test]
fn normalize_generated_image_flattens_onto_white() {
    let img = image::RgbaImage::from_raw(1, 1, vec![10, 20, 30, 0]).unwrap();
    let rgb = normalize_generated_image(&png_bytes(DynamicImage::ImageRgba8(img))).unwrap();
    assert_eq!(rgb.dimensions(), (1, 1));
    assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
}

#[test]
fn garbage_bytes_are_resource_unavailable() {
    let err = decode_image(b"not an image").unwrap_err();
    assert!(err.is_resource_unavailable());
}

#[test]
fn missing_file_is_resource_unavailable() {
    let err = decode_image_file(Path::new("no/such/scene_1.png")).unwrap_err();
    assert!(err.is_resource_unavailable());
    assert!(err.to_string().contains("scene_1.png"));
}
