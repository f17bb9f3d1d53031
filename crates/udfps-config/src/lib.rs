//! Configuration for the UDFPS handler
//!
//! Every hardware revision gets a [`HandlerProfile`] built from compile-time
//! defaults. A TOML file may overlay any subset of those values; whatever it
//! leaves out keeps the variant default.

mod profiles;

pub use profiles::{
    DevicePaths, DisplayProfile, SuppressionProfile, TouchProfile, VendorCodes, WatcherProfile,
    vendor_code,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown handler variant: {0}")]
    UnknownVariant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Vendor configuration directory holding `<variant>.toml` overlays
pub const CONFIG_DIR: &str = "/vendor/etc/udfps";

/// Hardware revision a handler is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantId {
    /// Touch ioctl plus display-feature local HBM, with success suppression
    DispFeature,
    /// Sysfs FOD flags, illumination through the host device
    SysfsFod,
    /// Touch ioctl plus asynchronous press-status watcher
    PressWatcher,
    /// Touch ioctl down/up control plus display-feature local HBM
    TouchHbm,
}

impl VariantId {
    pub fn all() -> &'static [VariantId] {
        &[
            VariantId::DispFeature,
            VariantId::SysfsFod,
            VariantId::PressWatcher,
            VariantId::TouchHbm,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantId::DispFeature => "disp-feature",
            VariantId::SysfsFod => "sysfs-fod",
            VariantId::PressWatcher => "press-watcher",
            VariantId::TouchHbm => "touch-hbm",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "disp-feature" | "disp_feature" => Ok(VariantId::DispFeature),
            "sysfs-fod" | "sysfs_fod" => Ok(VariantId::SysfsFod),
            "press-watcher" | "press_watcher" => Ok(VariantId::PressWatcher),
            "touch-hbm" | "touch_hbm" => Ok(VariantId::TouchHbm),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

impl FromStr for VariantId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable configuration of one handler instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerProfile {
    pub variant: VariantId,

    pub paths: DevicePaths,

    #[serde(default)]
    pub touch: TouchProfile,

    #[serde(default)]
    pub display: DisplayProfile,

    #[serde(default)]
    pub vendor: VendorCodes,

    #[serde(default)]
    pub suppression: SuppressionProfile,

    #[serde(default)]
    pub watcher: WatcherProfile,
}

impl HandlerProfile {
    /// Compile-time defaults for a hardware revision
    pub fn for_variant(variant: VariantId) -> Self {
        let mut profile = Self {
            variant,
            paths: DevicePaths::default(),
            touch: TouchProfile::default(),
            display: DisplayProfile::default(),
            vendor: VendorCodes::default(),
            suppression: SuppressionProfile::default(),
            watcher: WatcherProfile::default(),
        };

        match variant {
            VariantId::DispFeature => {
                profile.suppression.enabled = true;
            }
            VariantId::SysfsFod => {
                profile.paths = DevicePaths::tp_dev();
                profile.vendor.waiting_for_finger = vec![vendor_code::WAITING_FOR_FINGER];
            }
            VariantId::PressWatcher => {
                profile.paths = DevicePaths::tp_dev();
                profile.vendor.waiting_for_finger = vec![
                    vendor_code::WAITING_FOR_FINGER,
                    vendor_code::WAITING_FOR_FINGER_ALT,
                ];
            }
            VariantId::TouchHbm => {}
        }

        profile
    }

    /// Load a complete profile from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let profile: Self = toml::from_str(&contents)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Overlay a partial TOML file onto the variant defaults
    pub fn load_with_overlay(variant: VariantId, path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let overlay: toml::Value = toml::from_str(&contents)?;

        let mut base = toml::Value::try_from(Self::for_variant(variant))?;
        merge_toml(&mut base, overlay);

        let profile: Self = base.try_into()?;
        if profile.variant != variant {
            return Err(ConfigError::Invalid(format!(
                "{} declares variant {}, expected {}",
                path.display(),
                profile.variant,
                variant
            )));
        }

        profile.validate()?;
        Ok(profile)
    }

    /// Variant defaults, overlaid by `CONFIG_DIR/<variant>.toml` when present
    pub fn load_default(variant: VariantId) -> Result<Self, ConfigError> {
        let overlay = Path::new(CONFIG_DIR).join(format!("{}.toml", variant));
        if overlay.exists() {
            return Self::load_with_overlay(variant, &overlay);
        }

        tracing::warn!("No profile overlay for {}, using defaults", variant);
        Ok(Self::for_variant(variant))
    }

    /// Save the profile to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Profile saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.suppression.enabled && self.suppression.window_ms == 0 {
            return Err(ConfigError::Invalid(
                "suppression window must be non-zero when enabled".into(),
            ));
        }

        if self.watcher.initial_backoff_ms == 0 {
            return Err(ConfigError::Invalid(
                "watcher initial backoff must be non-zero".into(),
            ));
        }

        if self.watcher.initial_backoff_ms > self.watcher.max_backoff_ms {
            return Err(ConfigError::Invalid(format!(
                "watcher initial backoff {}ms exceeds max {}ms",
                self.watcher.initial_backoff_ms, self.watcher.max_backoff_ms
            )));
        }

        Ok(())
    }
}

/// Helper function to merge TOML values
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_variant_defaults() {
        let disp = HandlerProfile::for_variant(VariantId::DispFeature);
        assert!(disp.suppression.enabled);
        assert_eq!(disp.suppression.window_ms, 500);
        assert!(disp.vendor.waiting_for_finger.is_empty());

        let sysfs = HandlerProfile::for_variant(VariantId::SysfsFod);
        assert!(!sysfs.suppression.enabled);
        assert_eq!(sysfs.vendor.waiting_for_finger, vec![21]);

        let watcher = HandlerProfile::for_variant(VariantId::PressWatcher);
        assert_eq!(watcher.vendor.waiting_for_finger, vec![21, 23]);

        for variant in VariantId::all() {
            assert!(HandlerProfile::for_variant(*variant).validate().is_ok());
        }
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!(
            VariantId::parse("disp-feature").unwrap(),
            VariantId::DispFeature
        );
        assert_eq!(
            "PRESS_WATCHER".parse::<VariantId>().unwrap(),
            VariantId::PressWatcher
        );
        assert!(matches!(
            VariantId::parse("fpc"),
            Err(ConfigError::UnknownVariant(_))
        ));

        for variant in VariantId::all() {
            assert_eq!(VariantId::parse(variant.as_str()).unwrap(), *variant);
        }
    }

    #[test]
    fn test_serialize_deserialize() {
        let profile = HandlerProfile::for_variant(VariantId::PressWatcher);
        let toml_str = toml::to_string(&profile).unwrap();
        assert!(toml_str.contains("variant = \"press-watcher\""));

        let parsed: HandlerProfile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, profile);
    }

    #[test]
    fn test_overlay() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[paths]
touch_dev = "/dev/touch_alt"

[suppression]
window_ms = 300
"#
        )
        .unwrap();

        let profile = HandlerProfile::load_with_overlay(VariantId::DispFeature, file.path()).unwrap();
        assert_eq!(profile.paths.touch_dev, PathBuf::from("/dev/touch_alt"));
        assert_eq!(
            profile.paths.disp_feature,
            DevicePaths::default().disp_feature
        );
        assert_eq!(profile.suppression.window_ms, 300);
        assert!(profile.suppression.enabled);
    }

    #[test]
    fn test_overlay_variant_mismatch() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "variant = \"touch-hbm\"").unwrap();

        let result = HandlerProfile::load_with_overlay(VariantId::SysfsFod, file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_backoff_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[watcher]\ninitial_backoff_ms = 500\nmax_backoff_ms = 10"
        )
        .unwrap();

        let result = HandlerProfile::load_with_overlay(VariantId::PressWatcher, file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("touch-hbm.toml");

        let profile = HandlerProfile::for_variant(VariantId::TouchHbm);
        profile.save(&path).unwrap();

        let loaded = HandlerProfile::load(&path).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_load_missing() {
        let result = HandlerProfile::load(Path::new("/nonexistent/udfps.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_merge_toml() {
        let mut base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\nz = 4").unwrap();
        merge_toml(&mut base, overlay);

        let table = base.get("a").unwrap();
        assert_eq!(table.get("x").unwrap().as_integer(), Some(1));
        assert_eq!(table.get("y").unwrap().as_integer(), Some(3));
        assert_eq!(table.get("z").unwrap().as_integer(), Some(4));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("/vendor/etc/udfps/x.toml"));
        assert!(format!("{}", err).contains("not found"));

        let err = ConfigError::UnknownVariant("fpc".to_string());
        assert!(format!("{}", err).contains("fpc"));
    }
}
