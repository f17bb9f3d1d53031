//! Profile overlays read from disk

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use udfps_config::{ConfigError, HandlerProfile, VariantId};

/// Scratch directory holding profile overlays
struct ProfileDir {
    temp_dir: TempDir,
}

impl ProfileDir {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).expect("Failed to write profile");
        path
    }
}

#[test]
fn test_board_overlay() {
    let dir = ProfileDir::new();
    let path = dir.write(
        "press-watcher.toml",
        r#"
[paths]
fod_press_status = "/sys/devices/platform/goodix_ts.0/fod_press_status"

[vendor]
waiting_for_finger = [21, 23, 26]

[watcher]
max_backoff_ms = 100
"#,
    );

    let profile = HandlerProfile::load_with_overlay(VariantId::PressWatcher, &path).unwrap();
    let defaults = HandlerProfile::for_variant(VariantId::PressWatcher);

    assert_eq!(
        profile.paths.fod_press_status,
        Path::new("/sys/devices/platform/goodix_ts.0/fod_press_status")
    );
    assert_eq!(profile.paths.fod_enable, defaults.paths.fod_enable);
    assert!(profile.vendor.is_waiting_for_finger(26));
    assert_eq!(profile.watcher.max_backoff(), Duration::from_millis(100));
    assert_eq!(
        profile.watcher.initial_backoff(),
        defaults.watcher.initial_backoff()
    );
}

#[test]
fn test_empty_overlay_is_defaults() {
    let dir = ProfileDir::new();

    for variant in VariantId::all() {
        let path = dir.write(&format!("{}.toml", variant), "");
        let profile = HandlerProfile::load_with_overlay(*variant, &path).unwrap();
        assert_eq!(profile, HandlerProfile::for_variant(*variant));
    }
}

#[test]
fn test_saved_profile_reloads() {
    let dir = ProfileDir::new();
    let path = dir.temp_dir.path().join("nested").join("disp-feature.toml");

    let mut profile = HandlerProfile::for_variant(VariantId::DispFeature);
    profile.suppression.window_ms = 750;
    profile.save(&path).unwrap();

    assert_eq!(HandlerProfile::load(&path).unwrap(), profile);
    assert_eq!(
        HandlerProfile::load_with_overlay(VariantId::DispFeature, &path).unwrap(),
        profile
    );
}

#[test]
fn test_broken_overlays() {
    let dir = ProfileDir::new();

    let path = dir.write("syntax.toml", "[suppression\nwindow_ms = 1");
    assert!(matches!(
        HandlerProfile::load_with_overlay(VariantId::DispFeature, &path),
        Err(ConfigError::TomlParse(_))
    ));

    let path = dir.write("zero.toml", "[suppression]\nwindow_ms = 0");
    assert!(matches!(
        HandlerProfile::load_with_overlay(VariantId::DispFeature, &path),
        Err(ConfigError::Invalid(_))
    ));

    let path = dir.write("variant.toml", "variant = \"touch-hbm\"");
    assert!(matches!(
        HandlerProfile::load_with_overlay(VariantId::SysfsFod, &path),
        Err(ConfigError::Invalid(_))
    ));
}
