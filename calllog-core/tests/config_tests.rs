use calllog_core::{CallLogConfig, LogFormat, TextLayout};
use std::io::Write;

// =============================================================================
// CallLogConfig::load() from a real file
// =============================================================================

#[test]
fn test_load_full_yaml() {
    let yaml = r#"
entry:
  trace_id_key: "x-trace-id"
  span_id_key: "x-span-id"
  text_layout: legacy
log:
  level: "calllog=debug"
  format: json
"#;
    let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
    write!(tmpfile, "{yaml}").unwrap();

    let cfg = CallLogConfig::load(tmpfile.path()).unwrap();
    assert_eq!(cfg.entry.trace_id_key, "x-trace-id");
    assert_eq!(cfg.entry.span_id_key, "x-span-id");
    assert_eq!(cfg.entry.text_layout, TextLayout::Legacy);
    assert_eq!(cfg.log.level, "calllog=debug");
    assert_eq!(cfg.log.format, LogFormat::Json);
}

#[test]
fn test_load_partial_yaml_keeps_defaults() {
    let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
    write!(tmpfile, "entry:\n  span_id_key: span\n").unwrap();

    let cfg = CallLogConfig::load(tmpfile.path()).unwrap();
    assert_eq!(cfg.entry.span_id_key, "span");
    assert!(cfg.entry.trace_id_key.is_empty());
    assert_eq!(cfg.entry.text_layout, TextLayout::Legacy);
    assert_eq!(cfg.log.level, "info");
}

#[test]
fn test_load_malformed_yaml_is_error() {
    let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
    write!(tmpfile, "entry: [unclosed\n").unwrap();

    assert!(CallLogConfig::load(tmpfile.path()).is_err());
}

#[test]
fn test_config_serialization_roundtrip() {
    let mut cfg = CallLogConfig::default();
    cfg.entry.trace_id_key = "trace".into();
    cfg.entry.text_layout = TextLayout::KeyValue;
    cfg.log.format = LogFormat::Pretty;

    let json = serde_json::to_string(&cfg).unwrap();
    let back: CallLogConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.entry, cfg.entry);
    assert_eq!(back.log.format, LogFormat::Pretty);
}
