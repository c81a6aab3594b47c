#![forbid(unsafe_code)]

//! Loading [`PopupOptions`] from TOML and JSON.
//!
//! Run:
//!   cargo test -p tether-runtime --features config --test config_loading

use std::io::Write;

use tether_runtime::{ConfigError, PopupOptions};
use web_time::Duration;

#[test]
fn full_toml_document() {
    let options = PopupOptions::from_toml_str(
        r#"
        alley_width = 4.0
        min_anchor_offset = 12.0
        reconcile_interval_ms = 500
        use_inner_positioning = true
        "#,
    )
    .unwrap();
    assert_eq!(options.alley_width, 4.0);
    assert_eq!(options.min_anchor_offset, 12.0);
    assert_eq!(options.reconcile_interval, Duration::from_millis(500));
    assert!(options.use_inner_positioning);
}

#[test]
fn missing_fields_take_defaults() {
    let options = PopupOptions::from_toml_str("alley_width = 8.0").unwrap();
    assert_eq!(options, PopupOptions::default().alley_width(8.0));

    let empty = PopupOptions::from_toml_str("").unwrap();
    assert_eq!(empty, PopupOptions::default());
}

#[test]
fn json_document() {
    let options =
        PopupOptions::from_json_str(r#"{"min_anchor_offset": 10, "reconcile_interval_ms": 250}"#)
            .unwrap();
    assert_eq!(options.min_anchor_offset, 10.0);
    assert_eq!(options.reconcile_interval, Duration::from_millis(250));
    assert_eq!(options.alley_width, 2.0);
}

#[test]
fn malformed_input_is_a_parse_error() {
    let err = PopupOptions::from_toml_str("alley_width = ").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");
    assert!(std::error::Error::source(&err).is_some());

    let err = PopupOptions::from_json_str("{").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)), "{err}");
}

#[test]
fn out_of_range_values_are_rejected() {
    let err = PopupOptions::from_toml_str("reconcile_interval_ms = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");

    let err = PopupOptions::from_json_str(r#"{"alley_width": -1}"#).unwrap_err();
    assert!(err.to_string().contains("alley_width"));
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "min_anchor_offset = 20.0").unwrap();
    writeln!(file, "reconcile_interval_ms = 750").unwrap();

    let options = PopupOptions::from_toml_file(file.path()).unwrap();
    assert_eq!(options.min_anchor_offset, 20.0);
    assert_eq!(options.reconcile_interval, Duration::from_millis(750));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PopupOptions::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)), "{err}");
}

#[test]
fn toml_output_loads_back() {
    let options = PopupOptions::default()
        .alley_width(6.0)
        .reconcile_interval(Duration::from_millis(300));
    let text = options.to_toml_string().unwrap();
    assert!(text.contains("reconcile_interval_ms = 300"));
    assert_eq!(PopupOptions::from_toml_str(&text).unwrap(), options);
}
