//! Touch controller mode switches
//!
//! The touch driver exposes a character device that takes a fixed-size
//! integer record `{touch_id, mode, value}` through a single ioctl.

use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use libc::c_int;

use crate::{HalError, Result};

/// Size of the record the driver copies in, in `c_int` units.
pub const MAX_BUF_SIZE: usize = 256;

const THP_CMD_BASE: i32 = 1000;
const TOUCH_MAGIC: u8 = b't';
const SET_CUR_VALUE: u8 = 0;

nix::ioctl_write_ptr_bad!(
    touch_ioc_set_cur_value,
    nix::request_code_none!(TOUCH_MAGIC, SET_CUR_VALUE),
    [c_int; MAX_BUF_SIZE]
);

/// Touch driver mode types (from the driver's `MODE_TYPE` enum)
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchMode {
    /// Enable fingerprint-on-display touch reporting
    FodEnable = 10,
    /// Finger down/up control for the touch host processor
    FodDownUpCtl = THP_CMD_BASE + 1,
}

impl TouchMode {
    /// Raw mode code as understood by the driver
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            TouchMode::FodEnable => "fod_enable",
            TouchMode::FodDownUpCtl => "fod_downup_ctl",
        }
    }
}

/// A single mode write to the touch driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchCommand {
    pub touch_id: i32,
    pub mode: TouchMode,
    pub value: i32,
}

impl TouchCommand {
    pub fn new(touch_id: i32, mode: TouchMode, value: i32) -> Self {
        Self {
            touch_id,
            mode,
            value,
        }
    }

    /// Encode into the zero-padded record the driver expects
    pub fn to_buffer(&self) -> [c_int; MAX_BUF_SIZE] {
        let mut buf = [0 as c_int; MAX_BUF_SIZE];
        buf[0] = self.touch_id;
        buf[1] = self.mode.code();
        buf[2] = self.value;
        buf
    }
}

/// Anything that accepts touch mode writes
pub trait TouchControl: Send + Sync {
    fn set_mode(&self, command: TouchCommand) -> Result<()>;
}

/// Touch control character device
#[derive(Debug)]
pub struct TouchDevice {
    file: File,
    path: PathBuf,
}

impl TouchDevice {
    /// Open the touch control node read-write
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| HalError::open(path, e))?;

        tracing::debug!("Opened touch device {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TouchControl for TouchDevice {
    fn set_mode(&self, command: TouchCommand) -> Result<()> {
        let buf = command.to_buffer();

        // SAFETY: the driver reads at most MAX_BUF_SIZE ints from `buf`,
        // which stays alive for the duration of the call.
        unsafe { touch_ioc_set_cur_value(self.file.as_raw_fd(), &buf) }.map_err(|source| {
            HalError::Ioctl {
                request: "TOUCH_IOC_SET_CUR_VALUE",
                source,
            }
        })?;

        tracing::trace!(
            "touch {} mode {} = {}",
            command.touch_id,
            command.mode.name(),
            command.value
        );
        Ok(())
    }
}
