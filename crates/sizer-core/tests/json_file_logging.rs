#![forbid(unsafe_code)]
#![cfg(feature = "tracing-json")]

//! File logging installs the global subscriber, so it is exercised from a
//! single test in its own binary.

use std::io::ErrorKind;

use sizer_core::logging::init_file_logging;

#[test]
fn json_lines_land_in_file_and_respect_filter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sizer.jsonl");

    init_file_logging(&path, Some("info")).unwrap();
    tracing::info!(size = 400, "size applied");
    tracing::debug!("hidden below info");

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(
        lines.iter().all(|l| l.starts_with('{') && l.ends_with('}')),
        "{text}"
    );
    let applied = lines
        .iter()
        .find(|l| l.contains(r#""message":"size applied""#))
        .unwrap_or_else(|| panic!("missing info line in {text}"));
    assert!(applied.contains(r#""level":"INFO""#));
    assert!(applied.contains(r#""size":400"#));
    assert!(text.contains("file logging enabled"));
    assert!(!text.contains("hidden below info"));

    let again = init_file_logging(&path, None).unwrap_err();
    assert_eq!(again.kind(), ErrorKind::AlreadyExists);
}
