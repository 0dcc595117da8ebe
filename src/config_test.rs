use super::*;

#[test]
fn empty_config_uses_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.batch_size, 10);
    assert_eq!(config.cloc.binary, "cloc");
    assert_eq!(config.jsinspect.threshold, 30);
    assert_eq!(config.jsinspect.min_instances, 2);
    assert_eq!(config.jsinspect.ignore, "test|dist");
    assert_eq!(config.phpcpd.script, "vendor/bin/phpcpd");
    assert_eq!(config.phpcpd.memory_limit, "512M");
    assert_eq!(config.phpcpd.min_lines, 5);
    assert_eq!(config.phpcpd.min_tokens, 70);
    assert_eq!(config.import.depth, 1);
}

#[test]
fn partial_tables_keep_other_defaults() {
    let config = Config::parse(
        r#"
batch_size = 4

[phpcpd]
min_lines = 8
"#,
    )
    .unwrap();
    assert_eq!(config.batch_size, 4);
    assert_eq!(config.phpcpd.min_lines, 8);
    assert_eq!(config.phpcpd.min_tokens, 70);
    assert_eq!(config.jsinspect.threshold, 30);
}

#[test]
fn zero_batch_size_is_rejected() {
    let err = Config::parse("batch_size = 0").unwrap_err();
    assert!(err.to_string().contains("batch_size"));
}

#[test]
fn negative_depth_is_rejected() {
    assert!(Config::parse("[import]\ndepth = -1").is_err());
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(Config::parse("batch = 3").is_err());
}

#[test]
fn load_explicit_missing_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
    assert!(err.to_string().contains("cannot read config"));
}

#[test]
fn load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[cloc]\nbinary = \"/opt/cloc\"\n").unwrap();
    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.cloc.binary, "/opt/cloc");
}

#[test]
fn load_reports_path_on_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "batch_size = [").unwrap();
    let err = Config::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("invalid config"));
}
