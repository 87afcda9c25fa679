// ABOUTME: Tests for configuration file loading, validation, and merging
// ABOUTME: Covers TOML parsing, XDG path resolution, and layered precedence across files

use gifpeek_cli::config::Config;
use gifpeek_cli::image_protocols::ThumbsMode;
use gifpeek_cli::output::ListingFormat;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_config_deserialize_empty() {
    let config: Config = toml::from_str("").expect("Should parse empty TOML");
    assert_eq!(config, Config::default());
}

#[test]
fn test_later_files_override_earlier_ones() {
    let dir = TempDir::new().unwrap();
    let user = write_config(
        &dir,
        "user.toml",
        r#"
        limit = 10
        thumbs = "never"
        tenor_api_key = "user-key"
        "#,
    );
    let project = write_config(
        &dir,
        "project.toml",
        r#"
        limit = 25
        format = "tsv"
        "#,
    );

    let config = Config::load_from_paths(&[user, project]).unwrap();
    assert_eq!(config.limit, Some(25));
    assert_eq!(config.thumbs, Some(ThumbsMode::Never));
    assert_eq!(config.format, Some(ListingFormat::Tsv));
    assert_eq!(config.tenor_api_key.as_deref(), Some("user-key"));
}

#[test]
fn test_missing_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    let present = write_config(&dir, "present.toml", "software_animation = true\n");
    let missing = dir.path().join("missing.toml");

    let config = Config::load_from_paths(&[missing, present]).unwrap();
    assert_eq!(config.software_animation, Some(true));
}

#[test]
fn test_invalid_file_reports_its_path() {
    let dir = TempDir::new().unwrap();
    let bad = write_config(&dir, "bad.toml", "cell_aspect = 3.5\n");

    let err = Config::load_from_paths(&[bad]).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("bad.toml"), "{}", message);
    assert!(message.contains("cell_aspect"), "{}", message);
}

#[test]
fn test_malformed_toml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let broken = write_config(&dir, "broken.toml", "limit = \n");

    let err = Config::load_from_file(&broken).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML config file"));
}

#[test]
#[serial_test::serial]
fn test_xdg_config_home_is_searched() {
    let dir = TempDir::new().unwrap();
    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let paths = Config::get_config_paths();
    let expected = dir.path().join("gifpeek").join("config.toml");

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    let xdg = paths.iter().position(|p| *p == expected).expect("XDG path listed");
    let project = paths.iter().position(|p| p.ends_with("gifpeek.toml")).unwrap();
    assert!(xdg < project, "project config must take precedence");
}
