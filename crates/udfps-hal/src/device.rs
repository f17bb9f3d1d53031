//! Fingerprint device contract and backend discovery
//!
//! The owning fingerprint module hands the handler an opaque device object
//! whose only entry point we use is the extended command call. Every other
//! device node is opened through [`Hardware`], which keeps the handler
//! independent from the concrete Linux nodes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::Result;
use crate::display::{DispFeatureDevice, DisplayControl};
use crate::press::{PressSource, SysfsPressSource};
use crate::sysfs::{FlagControl, SysfsFlag};
use crate::touch::{TouchControl, TouchDevice};

/// Extended command: set the illumination level used for the capture.
pub const COMMAND_NIT: i32 = 10;
pub const PARAM_NIT_UDFPS: i32 = 1;
pub const PARAM_NIT_NONE: i32 = 0;

/// Extended command: report the finger press state.
pub const COMMAND_FOD_PRESS_STATUS: i32 = 1;
pub const PARAM_FOD_PRESSED: i32 = 1;
pub const PARAM_FOD_RELEASED: i32 = 0;

#[derive(Debug, Error)]
pub enum HalError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("ioctl {request} failed: {source}")]
    Ioctl {
        request: &'static str,
        source: nix::Error,
    },

    #[error("Device unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HalError {
    pub(crate) fn open(path: &Path, source: std::io::Error) -> Self {
        HalError::Open {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The biometric device that owns the handler.
///
/// Implementations must tolerate calls from the watcher thread as well as
/// from the host's callback thread.
pub trait FingerprintDevice: Send + Sync {
    /// Forward a vendor extended command. The return value is the device's
    /// status code, zero on success.
    fn ext_cmd(&self, cmd: i32, param: i32) -> i32;
}

/// Opens the device nodes a handler drives.
pub trait Hardware: Send + Sync {
    fn open_touch(&self, path: &Path) -> Result<Arc<dyn TouchControl>>;

    fn open_display(&self, path: &Path) -> Result<Arc<dyn DisplayControl>>;

    fn open_flag(&self, path: &Path) -> Result<Arc<dyn FlagControl>>;

    /// Open a read-only press-status source for the watcher thread.
    fn open_press_source(&self, path: &Path) -> Result<Box<dyn PressSource>>;
}

/// Real device nodes under `/dev` and `/sys`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxHardware;

impl LinuxHardware {
    pub fn new() -> Self {
        Self
    }
}

impl Hardware for LinuxHardware {
    fn open_touch(&self, path: &Path) -> Result<Arc<dyn TouchControl>> {
        Ok(Arc::new(TouchDevice::open(path)?))
    }

    fn open_display(&self, path: &Path) -> Result<Arc<dyn DisplayControl>> {
        Ok(Arc::new(DispFeatureDevice::open(path)?))
    }

    fn open_flag(&self, path: &Path) -> Result<Arc<dyn FlagControl>> {
        Ok(Arc::new(SysfsFlag::open(path)?))
    }

    fn open_press_source(&self, path: &Path) -> Result<Box<dyn PressSource>> {
        Ok(Box::new(SysfsPressSource::open(path)?))
    }
}
