//! Per-backend profile sections
//!
//! Each section carries compile-time defaults for one backend; a variant
//! only reads the sections for the backends it drives.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use udfps_hal::display::{
    DISP_FEATURE_LOCAL_HBM, LOCAL_HBM_NORMAL_WHITE_1000NIT, LOCAL_HBM_OFF_TO_NORMAL,
    MI_DISP_PRIMARY,
};

/// Vendor codes reported alongside acquisition results
pub mod vendor_code {
    /// Sensor is armed and waiting for a finger
    pub const WAITING_FOR_FINGER: i32 = 21;
    /// Reported instead of 21 by some firmware revisions
    pub const WAITING_FOR_FINGER_ALT: i32 = 23;
}

/// Device node locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePaths {
    /// Touch control character device
    pub touch_dev: PathBuf,
    /// Display-feature character device
    pub disp_feature: PathBuf,
    /// FOD enable attribute
    pub fod_enable: PathBuf,
    /// Press flag attribute written by the handler
    pub fod_press: PathBuf,
    /// Press status attribute published by the touch driver
    pub fod_press_status: PathBuf,
}

impl Default for DevicePaths {
    fn default() -> Self {
        Self {
            touch_dev: PathBuf::from("/dev/xiaomi-touch"),
            disp_feature: PathBuf::from("/dev/mi_display/disp_feature"),
            fod_enable: PathBuf::from("/sys/devices/platform/goodix_ts.0/fod_enable"),
            fod_press: PathBuf::from("/sys/devices/platform/goodix_ts.0/fod_press"),
            fod_press_status: PathBuf::from("/sys/class/touch/touch_dev/fod_press_status"),
        }
    }
}

impl DevicePaths {
    /// Touch panels exposing FOD state under the `tp_dev` class node
    pub fn tp_dev() -> Self {
        Self {
            fod_enable: PathBuf::from("/sys/class/touch/tp_dev/fod_status"),
            fod_press: PathBuf::from("/sys/class/touch/tp_dev/fod_press"),
            ..Self::default()
        }
    }
}

/// Touch driver addressing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchProfile {
    #[serde(default)]
    pub touch_id: i32,
}

/// Local HBM request template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProfile {
    #[serde(default = "default_disp_id")]
    pub disp_id: u32,
    #[serde(default = "default_local_hbm_feature")]
    pub local_hbm_feature: u32,
    /// Feature value while the finger is down
    #[serde(default = "default_hbm_on")]
    pub hbm_on: i32,
    /// Feature value restoring normal brightness
    #[serde(default = "default_hbm_off")]
    pub hbm_off: i32,
}

fn default_disp_id() -> u32 {
    MI_DISP_PRIMARY
}

fn default_local_hbm_feature() -> u32 {
    DISP_FEATURE_LOCAL_HBM
}

fn default_hbm_on() -> i32 {
    LOCAL_HBM_NORMAL_WHITE_1000NIT
}

fn default_hbm_off() -> i32 {
    LOCAL_HBM_OFF_TO_NORMAL
}

impl Default for DisplayProfile {
    fn default() -> Self {
        Self {
            disp_id: default_disp_id(),
            local_hbm_feature: default_local_hbm_feature(),
            hbm_on: default_hbm_on(),
            hbm_off: default_hbm_off(),
        }
    }
}

/// Vendor codes a variant reacts to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorCodes {
    /// Codes that re-arm the FOD enable flag
    #[serde(default)]
    pub waiting_for_finger: Vec<i32>,
}

impl VendorCodes {
    pub fn is_waiting_for_finger(&self, code: i32) -> bool {
        self.waiting_for_finger.contains(&code)
    }
}

/// Finger-up suppression after a successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressionProfile {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_window_ms() -> u64 {
    500
}

impl Default for SuppressionProfile {
    fn default() -> Self {
        Self {
            enabled: false,
            window_ms: default_window_ms(),
        }
    }
}

impl SuppressionProfile {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Retry pacing for the press-status watcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatcherProfile {
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_initial_backoff_ms() -> u64 {
    1
}

fn default_max_backoff_ms() -> u64 {
    250
}

impl Default for WatcherProfile {
    fn default() -> Self {
        Self {
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl WatcherProfile {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}
