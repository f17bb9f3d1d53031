//! Hardware Abstraction Layer (HAL) for under-display fingerprint sensors
//!
//! This crate exposes the device nodes a fingerprint-on-display handler has
//! to drive through a small set of typed traits, so the handler logic can run
//! against the real Linux nodes or against the recording mocks in [`mock`].
//!
//! # Backends
//!
//! - Touch control device (`/dev/xiaomi-touch`), commands sent via ioctl
//! - Display-feature device (`/dev/mi_display/disp_feature`), local HBM via ioctl
//! - Sysfs flag files (FOD enable, press status), plain `"0"`/`"1"` writes
//! - Press-status notification source, woken through `poll(2)`
//! - The owning fingerprint device's extended-command entry point
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use udfps_hal::{Hardware, LinuxHardware, TouchCommand, TouchMode};
//!
//! fn main() -> udfps_hal::Result<()> {
//!     let hardware = LinuxHardware::new();
//!     let touch = hardware.open_touch(Path::new("/dev/xiaomi-touch"))?;
//!     touch.set_mode(TouchCommand::new(0, TouchMode::FodEnable, 1))?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod display;
pub mod mock;
pub mod press;
pub mod sysfs;
pub mod touch;

pub use device::{
    COMMAND_FOD_PRESS_STATUS, COMMAND_NIT, FingerprintDevice, HalError, Hardware, LinuxHardware,
    PARAM_FOD_PRESSED, PARAM_FOD_RELEASED, PARAM_NIT_NONE, PARAM_NIT_UDFPS,
};
pub use display::{DispFeatureDevice, DisplayControl, DisplayFeatureRequest};
pub use press::{PressSource, SysfsPressSource, WaitError};
pub use sysfs::{FlagControl, SysfsFlag};
pub use touch::{TouchCommand, TouchControl, TouchDevice, TouchMode};

/// HAL Result type
pub type Result<T> = std::result::Result<T, HalError>;
