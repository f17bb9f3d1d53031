//! Display-feature driver control
//!
//! Handles local high-brightness mode (LHBM) over the fingerprint area via
//! the panel driver's feature ioctl.

use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use crate::{HalError, Result};

/// Primary panel id
pub const MI_DISP_PRIMARY: u32 = 0;

/// Feature id for local high-brightness mode
pub const DISP_FEATURE_LOCAL_HBM: u32 = 9;

pub const LOCAL_HBM_OFF_TO_NORMAL: i32 = 0;
pub const LOCAL_HBM_NORMAL_WHITE_1000NIT: i32 = 1;

/// `struct disp_base` from the panel driver UAPI
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispBase {
    pub flag: u32,
    pub disp_id: u32,
}

/// `struct disp_feature_req` from the panel driver UAPI
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct DispFeatureReq {
    pub base: DispBase,
    pub feature_id: u32,
    pub feature_val: i32,
    pub tx_len: u32,
    pub tx_ptr: u64,
    pub rx_len: u32,
    pub rx_ptr: u64,
}

nix::ioctl_readwrite!(mi_disp_ioctl_set_feature, b'D', 0x01, DispFeatureReq);

/// A feature write addressed to one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFeatureRequest {
    pub disp_id: u32,
    pub feature_id: u32,
    pub value: i32,
}

impl DisplayFeatureRequest {
    pub fn new(disp_id: u32, feature_id: u32, value: i32) -> Self {
        Self {
            disp_id,
            feature_id,
            value,
        }
    }

    /// Local HBM request on the primary panel
    pub fn local_hbm(value: i32) -> Self {
        Self::new(MI_DISP_PRIMARY, DISP_FEATURE_LOCAL_HBM, value)
    }

    /// Same panel and feature, different value
    pub fn with_value(self, value: i32) -> Self {
        Self { value, ..self }
    }

    pub fn to_raw(&self) -> DispFeatureReq {
        DispFeatureReq {
            base: DispBase {
                flag: 0,
                disp_id: self.disp_id,
            },
            feature_id: self.feature_id,
            feature_val: self.value,
            ..Default::default()
        }
    }
}

/// Anything that accepts display feature writes
pub trait DisplayControl: Send + Sync {
    fn set_feature(&self, request: DisplayFeatureRequest) -> Result<()>;
}

/// Display-feature character device
#[derive(Debug)]
pub struct DispFeatureDevice {
    file: File,
    path: PathBuf,
}

impl DispFeatureDevice {
    /// Open the display-feature node read-write
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| HalError::open(path, e))?;

        tracing::debug!("Opened display feature device {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DisplayControl for DispFeatureDevice {
    fn set_feature(&self, request: DisplayFeatureRequest) -> Result<()> {
        let mut raw = request.to_raw();

        // SAFETY: `raw` is a properly laid out `disp_feature_req` with no
        // tx/rx buffers attached.
        unsafe { mi_disp_ioctl_set_feature(self.file.as_raw_fd(), &mut raw) }.map_err(
            |source| HalError::Ioctl {
                request: "MI_DISP_IOCTL_SET_FEATURE",
                source,
            },
        )?;

        tracing::trace!(
            "display {} feature {} = {}",
            request.disp_id,
            request.feature_id,
            request.value
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_hbm_request() {
        let on = DisplayFeatureRequest::local_hbm(LOCAL_HBM_NORMAL_WHITE_1000NIT);
        assert_eq!(on.disp_id, MI_DISP_PRIMARY);
        assert_eq!(on.feature_id, DISP_FEATURE_LOCAL_HBM);

        let off = on.with_value(LOCAL_HBM_OFF_TO_NORMAL);
        assert_eq!(off.feature_id, on.feature_id);
        assert_eq!(off.value, LOCAL_HBM_OFF_TO_NORMAL);
    }

    #[test]
    fn test_raw_request_has_no_buffers() {
        let raw = DisplayFeatureRequest::new(1, 9, 1).to_raw();
        assert_eq!(raw.base, DispBase { flag: 0, disp_id: 1 });
        assert_eq!(raw.feature_val, 1);
        assert_eq!(raw.tx_len, 0);
        assert_eq!(raw.tx_ptr, 0);
        assert_eq!(raw.rx_ptr, 0);
    }
}
