//! Parsing behavior of whole documents.

use varsfile::{ConfigDocument, ConfigError};

const SAMPLE: &str = r#"# comment to end of line
version 3
name "Global Name"

:/window
width 1280
height 720   # inline comment
title "My Window # not a comment"
fullscreen false

:/player
speed 4.5
spawn (10.0 0.0 -2.5)
tint (1.0 0.5 0.25 1.0)
"#;

#[test]
fn test_sample_document() {
    let doc = ConfigDocument::parse(SAMPLE).unwrap();

    assert_eq!(doc.len(), 9);
    assert_eq!(doc.get_int("version").unwrap(), 3);
    assert_eq!(doc.get_str("name").unwrap(), "Global Name");
    assert_eq!(doc.get_int("window/width").unwrap(), 1280);
    assert_eq!(doc.get_int("window/height").unwrap(), 720);
    assert_eq!(
        doc.get_str("window/title").unwrap(),
        "My Window # not a comment"
    );
    assert!(!doc.get_bool("window/fullscreen").unwrap());
    assert_eq!(doc.get_float("player/speed").unwrap(), 4.5);

    let spawn = doc.get_vec3("player/spawn").unwrap();
    assert_eq!((spawn.x, spawn.y, spawn.z), (10.0, 0.0, -2.5));

    let tint = doc.get_vec4("player/tint").unwrap();
    assert_eq!(tint.to_array(), [1.0, 0.5, 0.25, 1.0]);
}

#[test]
fn test_raw_value_text() {
    let doc = ConfigDocument::parse(SAMPLE).unwrap();

    assert_eq!(doc.get_raw("window/height"), Some("720"));
    assert_eq!(doc.get_raw("name"), Some("\"Global Name\""));
    assert_eq!(doc.get_raw("player/spawn"), Some("(10.0 0.0 -2.5)"));
    assert_eq!(doc.get_raw("width"), None);
}

#[test]
fn test_section_does_not_leak_backwards() {
    let doc = ConfigDocument::parse("a 1\n:/s\nb 2\n").unwrap();
    assert!(doc.contains("a"));
    assert!(!doc.contains("s/a"));
    assert!(doc.contains("s/b"));
    assert!(!doc.contains("b"));
}

#[test]
fn test_same_key_in_different_sections() {
    let doc = ConfigDocument::parse("k 0\n:/one\nk 1\n:/two\nk 2\n:/one\nk 3\n").unwrap();
    assert_eq!(doc.len(), 3);
    assert_eq!(doc.get_int("k").unwrap(), 0);
    assert_eq!(doc.get_int("one/k").unwrap(), 3);
    assert_eq!(doc.get_int("two/k").unwrap(), 2);
}

#[test]
fn test_extended_key_characters() {
    let doc = ConfigDocument::parse(":/net-v2\nmax.retries 5\nbase_url \"http://x\"\n").unwrap();
    assert_eq!(doc.get_int("net-v2/max.retries").unwrap(), 5);
    assert_eq!(doc.get_str("net-v2/base_url").unwrap(), "http://x");
}

#[test]
fn test_indented_and_blank_lines() {
    let doc = ConfigDocument::parse("\n\n\t  :/s\n\n    \tk\t7\n\n").unwrap();
    assert_eq!(doc.get_int("s/k").unwrap(), 7);
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_unterminated_string_reports_position() {
    let err = ConfigDocument::parse("a 1\n:/s\n  msg \"oops\nb 2\n").unwrap_err();
    assert_eq!(err, ConfigError::UnterminatedString { line: 3, column: 7 });
}

#[test]
fn test_text_after_closing_quote_ignored() {
    let doc = ConfigDocument::parse("msg \"hi\" trailing words\n").unwrap();
    assert_eq!(doc.get_raw("msg"), Some("\"hi\""));
}

#[test]
fn test_values_not_typed_at_parse_time() {
    let doc = ConfigDocument::parse("odd (1 2\n").unwrap();
    assert_eq!(doc.get_raw("odd"), Some("(1 2"));
    assert!(matches!(
        doc.get_vec2("odd"),
        Err(ConfigError::TypeError { .. })
    ));
}

#[test]
fn test_byte_order_mark_keeps_first_key() {
    let doc = ConfigDocument::parse("\u{FEFF}width 800\nheight 600\n").unwrap();
    assert_eq!(doc.get_int("width").unwrap(), 800);
    assert_eq!(doc.get_int("height").unwrap(), 600);
    assert_eq!(doc.len(), 2);
}

#[test]
fn test_stray_prefix_before_key() {
    let doc = ConfigDocument::parse("@speed 5\n").unwrap();
    assert_eq!(doc.keys(), vec!["speed"]);
    assert_eq!(doc.get_int("speed").unwrap(), 5);
}
