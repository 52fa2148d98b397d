use std::io::Write;

use super::*;

fn write_toml(tag: &str, contents: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("afli_config_test_{}_{}.toml", std::process::id(), tag));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_load_full_config() {
    let path = write_toml(
        "full",
        r#"
            bucket_size = 4
            aggregate_size = 16
            nf_weights_path = "weights.txt"
            nf_batch_size = 2048
        "#,
    );
    let cfg = Config::load(&path).unwrap();
    assert_eq!(cfg.bucket_size, Some(4));
    assert_eq!(cfg.aggregate_size, 16);
    assert_eq!(cfg.nf_weights_path.as_deref(), Some("weights.txt"));
    assert_eq!(cfg.nf_batch_size, 2048);
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_partial_config_defaults_the_rest() {
    let path = write_toml("partial", "aggregate_size = 8\n");
    let cfg = Config::load(&path).unwrap();
    assert_eq!(cfg.bucket_size, None);
    assert_eq!(cfg.aggregate_size, 8);
    assert_eq!(cfg.nf_weights_path, None);
    assert_eq!(cfg.nf_batch_size, DEFAULT_NF_BATCH_SIZE);
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_missing_file_is_an_error() {
    let missing = std::env::temp_dir().join("afli_config_test_does_not_exist.toml");
    assert!(Config::load(&missing).is_err());
}

#[test]
fn test_load_malformed_toml_is_an_error() {
    let path = write_toml("malformed", "bucket_size = \"not a number\"\n");
    assert!(Config::load(&path).is_err());
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_default_config_has_no_bucket_size_override() {
    let cfg = Config::default();
    assert_eq!(cfg.bucket_size, None);
    assert_eq!(cfg.aggregate_size, 0);
}
