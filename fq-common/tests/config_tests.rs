//! Configuration loading and root folder resolution
//!
//! Uses serial_test because several tests set FQ_ROOT_FOLDER / FQ_CONFIG.

use fq_common::config::{
    default_root_folder, resolve_root_folder, TomlConfig, CONFIG_FILE_ENV, DEFAULT_PORT, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..TomlConfig::default()
    };

    let root = resolve_root_folder(Some(Path::new("/from/cli")), &config);
    assert_eq!(root, PathBuf::from("/from/cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..TomlConfig::default()
    };

    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_then_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..TomlConfig::default()
    };
    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/toml"));

    assert_eq!(resolve_root_folder(None, &TomlConfig::default()), default_root_folder());
}

#[test]
#[serial]
fn test_load_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 6001\nmedia_url = \"/stills/\"\nsession_retention_days = 3").unwrap();

    let config = TomlConfig::load(Some(file.path()));
    assert_eq!(config.port, 6001);
    assert_eq!(config.media_url, "/stills/");
    assert_eq!(config.session_retention_days, 3);
}

#[test]
#[serial]
fn test_load_from_env_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "bind_host = \"0.0.0.0\"").unwrap();

    env::set_var(CONFIG_FILE_ENV, file.path());
    let config = TomlConfig::load(None);
    env::remove_var(CONFIG_FILE_ENV);

    assert_eq!(config.bind_host, "0.0.0.0");
    assert_eq!(config.port, DEFAULT_PORT);
}

#[test]
#[serial]
fn test_missing_or_broken_file_uses_defaults() {
    let missing = TomlConfig::load(Some(Path::new("/nonexistent/framequiz.toml")));
    assert_eq!(missing.port, DEFAULT_PORT);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = [").unwrap();
    let broken = TomlConfig::load(Some(file.path()));
    assert_eq!(broken.port, DEFAULT_PORT);
    assert_eq!(broken.logging.level, "info");
}
