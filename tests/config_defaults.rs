use sane_desc::config::{self, Config};
use std::path::PathBuf;

#[test]
fn test_default_config_values() {
    let config = Config::default();

    // Left unset so SANE_DESC_PATH can still apply
    assert_eq!(config.general.description_dirs, None);
    assert_eq!(config.general.extension, "desc");
    assert_eq!(config.general.jobs, "auto");
    assert!(!config.general.keep_going);
    assert!(config.usb.include.is_empty());
    assert!(config.usb.exclude.is_empty());
}

#[test]
fn test_template_spells_out_default_dirs() {
    // Same locations the sane-backends tree uses
    assert_eq!(
        Config::template().general.description_dirs,
        Some(vec![
            PathBuf::from("doc/descriptions"),
            PathBuf::from("doc/descriptions-external")
        ])
    );
}

#[test]
fn test_config_file_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(config::CONFIG_FILE_NAME);

    let mut config = Config::default();
    config.usb.exclude = vec!["test".to_string(), "pnm".to_string()];
    std::fs::write(&path, config.to_toml()).unwrap();

    let loaded = Config::load_from_file(&path).expect("config should load");
    assert_eq!(loaded.usb.exclude, vec!["test", "pnm"]);
    assert_eq!(loaded.general.extension, "desc");
}

#[test]
fn test_invalid_config_is_ignored() {
    assert!(Config::parse("[general]\njobs = [1, 2]\n").is_none());
}

#[test]
fn test_config_file_wins_over_environment() {
    let cfg = Config::parse("[general]\ndescription_dirs = [\"from-file\"]\n").unwrap();
    assert_eq!(
        Config::description_dirs(Some(&cfg)),
        vec![PathBuf::from("from-file")]
    );
}

#[test]
fn test_environment_wins_over_defaults_with_partial_config_file() {
    // Only test in this binary that touches the environment
    unsafe {
        std::env::set_var(config::ENV_SANE_DESC_PATH, "/from/env");
    }

    let usb_only = Config::parse("[usb]\nexclude = [\"pnm\"]\n").unwrap();
    assert_eq!(
        Config::description_dirs(Some(&usb_only)),
        vec![PathBuf::from("/from/env")]
    );
    assert_eq!(Config::description_dirs(None), vec![PathBuf::from("/from/env")]);

    let with_dirs = Config::parse("[general]\ndescription_dirs = [\"from-file\"]\n").unwrap();
    assert_eq!(
        Config::description_dirs(Some(&with_dirs)),
        vec![PathBuf::from("from-file")]
    );

    unsafe {
        std::env::remove_var(config::ENV_SANE_DESC_PATH);
    }
}
