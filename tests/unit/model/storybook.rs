use super::*;

const SAMPLE: &str = r#"{
    "storybook_title": "Moonlit Forest",
    "storybook_image_path": "",
    "storybook_prompt": "a forest at night",
    "characters": {
        "Fox": {
            "character_name": "Fox",
            "character_prompt": "a red fox",
            "character_image_path": "out/tmp1_character_Fox.png"
        },
        "Owl": {
            "character_name": "Owl",
            "character_prompt": "an old owl",
            "character_image_path": ""
        }
    },
    "pages": [
        {"scene_text": "Three", "page_number": 3, "characters": ["Fox"], "scene_prompt": "p3"},
        {"scene_text": "One", "page_number": 1, "characters": ["Owl", "Fox"], "scene_prompt": "p1",
         "scene_image_path": "out/tmp2_scene_1.png"},
        {"scene_text": "Two", "page_number": 2, "characters": [], "scene_prompt": "p2"}
    ]
}"#;

#[test]
fn parses_collaborator_json() {
    let doc = StorybookDocument::from_json_str(SAMPLE).unwrap();
    assert_eq!(doc.title, "Moonlit Forest");
    assert_eq!(doc.cover_image(), None);
    assert_eq!(doc.characters.len(), 2);
    assert_eq!(doc.pages.len(), 3);
    assert_eq!(
        doc.pages[1].scene_image(),
        Some(ImageRef::new("out/tmp2_scene_1.png"))
    );
    assert_eq!(doc.pages[0].scene_image(), None);
}

#[test]
fn pages_in_order_sorts_by_number() {
    let doc = StorybookDocument::from_json_str(SAMPLE).unwrap();
    let numbers: Vec<u32> = doc.pages_in_order().iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn scene_references_skip_characters_without_portraits() {
    let doc = StorybookDocument::from_json_str(SAMPLE).unwrap();
    let page_one = doc.pages.iter().find(|p| p.page_number == 1).unwrap();
    let refs = doc.scene_references(page_one).unwrap();
    assert_eq!(refs, vec![ImageRef::new("out/tmp1_character_Fox.png")]);
    assert_eq!(doc.character_references().len(), 1);
}

#[test]
fn scene_references_reject_unknown_names() {
    let doc = StorybookDocument::from_json_str(SAMPLE).unwrap();
    let page = Page {
        text: "x".to_string(),
        page_number: 9,
        characters: vec!["Badger".to_string()],
        ..Page::default()
    };
    let err = doc.scene_references(&page).unwrap_err();
    assert!(matches!(err, PressError::InvalidInput(_)));
    assert!(err.to_string().contains("Badger"));
}

#[test]
fn malformed_json_is_invalid_input() {
    let err = StorybookDocument::from_json_str("{\"pages\": 3}").unwrap_err();
    assert!(matches!(err, PressError::InvalidInput(_)));
}

#[test]
fn json_roundtrip_keeps_field_names() {
    let doc = StorybookDocument::from_json_str(SAMPLE).unwrap();
    let json = doc.to_json_pretty().unwrap();
    assert!(json.contains("\"storybook_title\""));
    assert!(json.contains("\"scene_text\""));
    assert_eq!(StorybookDocument::from_json_str(&json).unwrap(), doc);
}
