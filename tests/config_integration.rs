//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use frostfire::config::AppConfig;
use serial_test::serial;
use std::fs;

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("frostfire_config_{}", name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("FF_PHYSICS__GRAVITY", "12.5");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("FF_PHYSICS__GRAVITY");

    assert_eq!(config.physics.gravity, 12.5);
    assert_eq!(config.to_session_config().controller.gravity, 12.5);
}

#[test]
#[serial]
fn test_env_override_nested_section() {
    std::env::set_var("FF_SESSION__SUBSTEPS", "4");
    std::env::set_var("FF_TARGET__SEED", "99");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("FF_SESSION__SUBSTEPS");
    std::env::remove_var("FF_TARGET__SEED");

    assert_eq!(config.session.substeps, 4);
    assert_eq!(config.target.seed, Some(99));
}

#[test]
#[serial]
fn test_default_file_matches_builtin_defaults() {
    let config = AppConfig::load().unwrap();
    let builtin = AppConfig::default();

    assert_eq!(config.session.level_path, builtin.session.level_path);
    assert_eq!(config.input, builtin.input);
    assert_eq!(
        config.physics.to_controller_config(),
        builtin.physics.to_controller_config()
    );
    assert_eq!(config.target.to_target_config(), builtin.target.to_target_config());
    assert_eq!(config.camera.to_camera_config(), builtin.camera.to_camera_config());
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = scratch_dir("user_override");
    fs::write(dir.join("default.toml"), "[camera]\nfov = 60.0\npitch_limit = 1.2\n").unwrap();
    fs::write(dir.join("user.toml"), "[camera]\nfov = 90.0\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.camera.fov, 90.0);
    assert_eq!(config.camera.pitch_limit, 1.2);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("definitely/not/a/config/dir").unwrap();
    assert_eq!(config.session.max_frame_dt, 0.05);
    assert_eq!(config.animation.fire_duration, 0.4);
}

#[test]
#[serial]
fn test_bad_value_is_error() {
    let dir = scratch_dir("bad_value");
    fs::write(dir.join("default.toml"), "[session]\nsubsteps = \"many\"\n").unwrap();

    let result = AppConfig::load_from(&dir);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Configuration error"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
#[serial]
fn test_invalid_file_values_rejected() {
    let dir = scratch_dir("invalid_values");
    fs::write(dir.join("default.toml"), "[session]\nmax_frame_dt = nan\n").unwrap();
    let result = AppConfig::load_from(&dir);
    assert!(result.unwrap_err().to_string().contains("max_frame_dt"));

    fs::write(dir.join("default.toml"), "[target]\ntag_radius = -1.0\n").unwrap();
    let result = AppConfig::load_from(&dir);
    assert!(result.unwrap_err().to_string().contains("tag_radius"));
    let _ = fs::remove_dir_all(&dir);
}
