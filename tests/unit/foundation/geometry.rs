use super::*;

#[test]
fn scale_to_fit_stays_inside_box_and_keeps_ratio() {
    let cases = [
        (1024u32, 768u32, 420u32, 420u32),
        (300, 900, 420, 420),
        (7, 3, 724, 1024),
        (3000, 2, 420, 420),
        (512, 512, 420, 420),
        (1530, 2070, 724, 1024),
    ];
    for (w, h, bw, bh) in cases {
        let fit = scale_to_fit(w, h, bw, bh);
        assert!(fit.width <= bw && fit.height <= bh, "{w}x{h} in {bw}x{bh}");
        assert!(fit.width >= 1 && fit.height >= 1);
        let (_, fw, fh) = scale_to_fit_f64(f64::from(w), f64::from(h), f64::from(bw), f64::from(bh));
        assert!((fw / fh - f64::from(w) / f64::from(h)).abs() < 1e-9);
        assert!(fw <= f64::from(bw) + 1e-9 && fh <= f64::from(bh) + 1e-9);
    }
}

#[test]
fn scale_to_fit_fills_limiting_side_exactly() {
    let fit = scale_to_fit(1530, 2070, 724, 1024);
    assert_eq!(fit.width, 724);
    assert_eq!(fit.height, 979);

    let fit = scale_to_fit(2000, 1000, 420, 420);
    assert_eq!(fit.width, 420);
    assert_eq!(fit.height, 210);
}

#[test]
fn scale_to_fit_upscales_small_sources() {
    let fit = scale_to_fit(10, 20, 420, 420);
    assert!(fit.scale > 1.0);
    assert_eq!((fit.width, fit.height), (210, 420));
}

#[test]
fn scale_is_one_when_source_matches_box() {
    let fit = scale_to_fit(420, 420, 420, 420);
    assert!((fit.scale - 1.0).abs() < 1e-12);
    assert_eq!((fit.width, fit.height), (420, 420));
}

#[test]
fn scale_to_fit_floors_to_at_least_one_pixel() {
    let fit = scale_to_fit(10_000, 1, 100, 100);
    assert_eq!(fit.width, 100);
    assert_eq!(fit.height, 1);
}

#[test]
fn center_offset_uses_floor_division() {
    assert_eq!(center_offset(10, 10, 5, 4), (2, 3));
    assert_eq!(center_offset(724, 1024, 724, 1000), (0, 12));
    assert_eq!(center_offset(4, 4, 7, 4), (-2, 0));
}

#[test]
fn grid_dimensions_cover_all_items() {
    for n in 1..=40usize {
        let g = grid_dimensions(n, None);
        assert!((g.cols as usize) * (g.rows as usize) >= n);
        assert_eq!(g.rows as usize, n.div_ceil(g.cols as usize));
        assert_eq!(g.cols as usize, (n as f64).sqrt().ceil() as usize);
    }
}

#[test]
fn grid_dimensions_respects_explicit_columns() {
    let g = grid_dimensions(5, Some(1));
    assert_eq!((g.cols, g.rows), (1, 5));
    let g = grid_dimensions(5, Some(4));
    assert_eq!((g.cols, g.rows), (4, 2));
    // Zero columns falls back to the automatic shape.
    assert_eq!(grid_dimensions(4, Some(0)), grid_dimensions(4, None));
}

#[test]
fn grid_cell_of_is_row_major() {
    let g = grid_dimensions(5, None);
    assert_eq!(g.cols, 3);
    assert_eq!(g.cell_of(0), (0, 0));
    assert_eq!(g.cell_of(2), (0, 2));
    assert_eq!(g.cell_of(4), (1, 1));
}

#[test]
fn fit_rect_centers_inside_bounds() {
    let bounds = Rect::new(10.0, 20.0, 110.0, 220.0);
    let r = fit_rect(400.0, 200.0, bounds);
    assert!((r.width() - 100.0).abs() < 1e-9);
    assert!((r.height() - 50.0).abs() < 1e-9);
    assert!((r.x0 - 10.0).abs() < 1e-9);
    assert!((r.y0 - 95.0).abs() < 1e-9);
}
