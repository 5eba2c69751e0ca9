use std::path::{Path, PathBuf};

use image::RgbImage;

use super::*;
use crate::{
    config::ParchmentConfig,
    foundation::{error::PressError, policy::FailurePolicy},
};

fn scratch(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "storypress_layout_{name}_{}_{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn png(dir: &Path, name: &str, w: u32, h: u32) -> String {
    let path = dir.join(name);
    RgbImage::from_pixel(w, h, image::Rgb([40, 90, 160]))
        .save(&path)
        .unwrap();
    path.to_string_lossy().into_owned()
}

fn textures() -> Arc<TextureSynthesizer> {
    Arc::new(
        TextureSynthesizer::new(ParchmentConfig {
            dpi: 10.0,
            seed: Some(3),
            ..ParchmentConfig::default()
        })
        .unwrap(),
    )
}

fn engine(config: PageConfig) -> DocumentLayoutEngine {
    DocumentLayoutEngine::new(config, textures()).unwrap()
}

fn page(number: u32, text: &str, image: Option<String>) -> Page {
    Page {
        text: text.to_string(),
        page_number: number,
        scene_image_path: image,
        ..Page::default()
    }
}

fn story(pages: Vec<Page>) -> StorybookDocument {
    StorybookDocument {
        title: "Moonlit Forest".to_string(),
        pages,
        ..StorybookDocument::default()
    }
}

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn cover_then_spreads_in_page_order() {
    let doc = story(vec![
        page(3, "Three", None),
        page(1, "One", None),
        page(2, "Two", None),
    ]);
    let plan = engine(PageConfig::default()).layout(&doc).unwrap();
    let kinds: Vec<PageKind> = plan.pages.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            PageKind::Cover,
            PageKind::Spread { page_number: 1 },
            PageKind::Spread { page_number: 2 },
            PageKind::Spread { page_number: 3 },
        ]
    );
    assert_eq!(plan.title, "Moonlit Forest");
}

#[test]
fn cover_is_portrait_and_spreads_are_landscape() {
    let plan = engine(PageConfig::default())
        .layout(&story(vec![page(1, "One", None)]))
        .unwrap();
    let cover = &plan.pages[0];
    let spread = &plan.pages[1];
    assert!(cover.width < cover.height);
    assert!(near(spread.width, cover.height));
    assert!(near(spread.height, cover.width));
    assert!(cover.background.is_some());
    assert!(spread.background.is_some());
}

#[test]
fn title_is_centered_without_cover_image() {
    let plan = engine(PageConfig::default()).layout(&story(vec![])).unwrap();
    assert_eq!(plan.pages.len(), 1);
    let cover = &plan.pages[0];
    let runs: Vec<&TextRun> = cover.runs(TextRole::Title).collect();
    assert_eq!(runs.len(), 1);
    let run = runs[0];
    assert_eq!(run.text, "Moonlit Forest");
    assert_eq!(run.font, BaseFont::TimesBold);
    assert_eq!(run.size, 24.0);
    let width = run.font.text_width(&run.text, run.size);
    assert!(near(run.x + width / 2.0, cover.width / 2.0));
    assert!(near(run.y, cover.height / 2.0));
}

#[test]
fn long_titles_wrap_inside_the_margins() {
    let mut doc = story(vec![]);
    doc.title = "The Very Long and Entirely Unreasonable Tale of the Fox Who Counted Stars"
        .to_string();
    let cfg = PageConfig::default();
    let m = cfg.margin();
    let plan = engine(cfg).layout(&doc).unwrap();
    let cover = &plan.pages[0];
    let runs: Vec<&TextRun> = cover.runs(TextRole::Title).collect();
    assert!(runs.len() > 1);
    for pair in runs.windows(2) {
        assert!(pair[0].y > pair[1].y);
    }
    for run in &runs {
        assert!(run.x >= m - 1e-6);
        assert!(run.x + run.font.text_width(&run.text, run.size) <= cover.width - m + 1e-6);
    }
}

#[test]
fn cover_image_is_fitted_within_margins() {
    let dir = scratch("cover");
    let mut doc = story(vec![]);
    doc.cover_image_path = Some(png(&dir, "cover.png", 300, 100));
    let cfg = PageConfig::default();
    let m = cfg.margin();
    let plan = engine(cfg).layout(&doc).unwrap();
    let cover = &plan.pages[0];
    assert_eq!(cover.runs(TextRole::Title).count(), 0);
    let images: Vec<&PlacedImage> = cover.images().collect();
    assert_eq!(images.len(), 1);
    let r = images[0].rect;
    assert!(near(r.width(), cover.width - 2.0 * m));
    assert!(near(r.width() / r.height(), 3.0));
    assert!(near(r.center().y, cover.height / 2.0));
}

#[test]
fn missing_scene_image_becomes_placeholder() {
    let dir = scratch("missing");
    let doc = story(vec![
        page(1, "One", Some(png(&dir, "scene_1.png", 64, 64))),
        page(2, "Two", Some(dir.join("scene_2.png").to_string_lossy().into_owned())),
        page(3, "Three", Some(png(&dir, "scene_3.png", 64, 64))),
    ]);
    let plan = engine(PageConfig::default()).layout(&doc).unwrap();
    assert_eq!(plan.pages.len(), 4);

    assert_eq!(plan.pages[1].images().count(), 1);
    assert_eq!(plan.pages[3].images().count(), 1);

    let second = &plan.pages[2];
    assert_eq!(second.images().count(), 0);
    let placeholders: Vec<&TextRun> = second.runs(TextRole::Placeholder).collect();
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].text, "[Image not available: scene_2.png]");
    assert_eq!(placeholders[0].font, BaseFont::TimesItalic);
    assert_eq!(second.runs(TextRole::Body).count(), 1);
    assert_eq!(second.runs(TextRole::PageNumber).count(), 1);
}

#[test]
fn spread_sets_drop_cap_body_and_page_number() {
    let cfg = PageConfig::default();
    let m = cfg.margin();
    let gap = cfg.gap();
    let doc = story(vec![page(1, "Once upon a time.\n\nThe fox ran.", None)]);
    let plan = engine(cfg).layout(&doc).unwrap();
    let spread = &plan.pages[1];
    let col_w = (spread.width - 2.0 * m - gap) / 2.0;
    let right_x = m + col_w + gap;

    let cap: Vec<&TextRun> = spread.runs(TextRole::DropCap).collect();
    assert_eq!(cap.len(), 1);
    assert_eq!(cap[0].text, "O");
    assert!(near(cap[0].x, right_x));

    let body: Vec<&TextRun> = spread.runs(TextRole::Body).collect();
    let texts: Vec<&str> = body.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["nce upon a time.", "The fox ran."]);
    assert!(body[0].x > cap[0].x);
    assert!(near(body[1].x, right_x));
    assert!(body[0].y > body[1].y);
    assert!(cap[0].y > body[1].y);

    let number: Vec<&TextRun> = spread.runs(TextRole::PageNumber).collect();
    assert_eq!(number.len(), 1);
    assert_eq!(number[0].text, "1");
    let right_edge = number[0].x + number[0].font.text_width("1", number[0].size);
    assert!(near(right_edge, right_x + col_w));
    assert!(near(right_edge, spread.width - m));
    assert_eq!(number[0].y, 6.0);
}

#[test]
fn short_text_is_vertically_centered() {
    let cfg = PageConfig::default();
    let m = cfg.margin();
    let doc = story(vec![page(1, "Hi.", None)]);
    let plan = engine(cfg.clone()).layout(&doc).unwrap();
    let spread = &plan.pages[1];
    let cap = spread.runs(TextRole::DropCap).next().unwrap();

    let col_w = (spread.width - 2.0 * m - cfg.gap()) / 2.0;
    let block = typeset("Hi.", col_w, &TextStyle::from_page(&cfg));
    let top = cap.y + block.drop_cap.as_ref().unwrap().baseline;
    let bottom = top - block.height;
    assert!(near((top + bottom) / 2.0, spread.height / 2.0));
}

#[test]
fn overflowing_text_starts_at_the_column_top() {
    let cfg = PageConfig::default();
    let m = cfg.margin();
    let long = "The fox walked on and on beneath the patient moon. ".repeat(80);
    let plan = engine(cfg.clone()).layout(&story(vec![page(1, &long, None)])).unwrap();
    let spread = &plan.pages[1];
    let first = spread.runs(TextRole::Body).next().unwrap();
    let style = TextStyle::from_page(&cfg);
    let block = typeset(&long, (spread.width - 2.0 * m - cfg.gap()) / 2.0, &style);
    assert!(block.height > spread.height - 2.0 * m);
    assert!(near(first.y, spread.height - m - block.lines[0].baseline));
}

#[test]
fn blank_text_still_numbers_the_page() {
    let plan = engine(PageConfig::default())
        .layout(&story(vec![page(4, "  \n ", None)]))
        .unwrap();
    let spread = &plan.pages[1];
    assert_eq!(spread.runs(TextRole::DropCap).count(), 0);
    assert_eq!(spread.runs(TextRole::Body).count(), 0);
    assert_eq!(spread.runs(TextRole::PageNumber).next().unwrap().text, "4");
}

#[test]
fn texture_failure_follows_policy() {
    let huge = PageConfig {
        width_pt: 1.0e6,
        height_pt: 2.0e6,
        ..PageConfig::default()
    };
    let doc = story(vec![page(1, "One", None)]);

    let plan = engine(PageConfig {
        failure_policy: FailurePolicy::Continue,
        ..huge.clone()
    })
    .layout(&doc)
    .unwrap();
    assert_eq!(plan.pages.len(), 2);
    assert!(plan.pages.iter().all(|p| p.background.is_none()));

    let err = engine(PageConfig {
        failure_policy: FailurePolicy::Abort,
        ..huge
    })
    .layout(&doc)
    .unwrap_err();
    assert!(matches!(err, PressError::InvalidInput(_)));
}

#[test]
fn spreads_share_one_cached_texture() {
    let doc = story(vec![page(1, "One", None), page(2, "Two", None)]);
    let plan = engine(PageConfig::default()).layout(&doc).unwrap();
    let a = plan.pages[1].background.as_ref().unwrap();
    let b = plan.pages[2].background.as_ref().unwrap();
    assert!(Arc::ptr_eq(a, b));
    assert!(!Arc::ptr_eq(a, plan.pages[0].background.as_ref().unwrap()));
}

#[test]
fn render_pdf_writes_one_page_per_spread_plus_cover() {
    let dir = scratch("render");
    let out = dir.join("nested").join("Moonlit Forest.pdf");
    let doc = story(vec![page(1, "One", None), page(2, "Two", None)]);
    let written = engine(PageConfig::default())
        .render_pdf(&doc, &out)
        .unwrap();
    assert_eq!(written, out);
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(bytes.windows(8).any(|w| w == b"/Count 3"));
}

#[test]
fn long_placeholder_names_stay_inside_the_column() {
    let dir = scratch("long_name");
    let name = format!("{}_scene_1.png", "x".repeat(400));
    let missing = dir.join(&name).to_string_lossy().into_owned();
    let cfg = PageConfig::default();
    let m = cfg.margin();
    let gap = cfg.gap();
    let doc = story(vec![page(1, "One", Some(missing))]);
    let plan = engine(cfg).layout(&doc).unwrap();

    let spread = &plan.pages[1];
    let col_w = (spread.width - 2.0 * m - gap) / 2.0;
    let run = spread.runs(TextRole::Placeholder).next().unwrap();
    assert!(run.text.starts_with("[Image not available: …"));
    assert!(run.text.ends_with("_scene_1.png]"));
    let width = run.font.text_width(&run.text, run.size);
    assert!(width <= col_w + 1e-9);
    assert!(run.x >= m - 1e-9);
    assert!(run.x + width <= m + col_w + 1e-9);
}
