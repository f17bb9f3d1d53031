//! Sysfs attribute flags
//!
//! Boolean driver attributes written as plain text `"0"` / `"1"`.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use crate::{HalError, Result};

/// A writable boolean attribute
pub trait FlagControl: Send + Sync {
    fn write_flag(&self, on: bool) -> Result<()>;
}

/// Sysfs attribute opened once for writing
#[derive(Debug)]
pub struct SysfsFlag {
    file: File,
    path: PathBuf,
}

impl SysfsFlag {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| HalError::open(path, e))?;

        tracing::debug!("Opened sysfs flag {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlagControl for SysfsFlag {
    fn write_flag(&self, on: bool) -> Result<()> {
        let value: &[u8] = if on { b"1" } else { b"0" };
        // Attributes are rewritten from offset 0 on every store
        self.file.write_all_at(value, 0)?;
        tracing::trace!("{} <- {}", self.path.display(), on as u8);
        Ok(())
    }
}

/// Decode the boolean at the start of an attribute file.
///
/// Reads from offset 0 without moving the file cursor, so it can be called
/// after every wake-up on the same descriptor.
pub fn read_bool(file: &File) -> io::Result<bool> {
    let mut c = [0u8; 1];
    let n = file.read_at(&mut c, 0)?;
    if n != 1 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "attribute is empty",
        ));
    }
    Ok(c[0] != b'0')
}
