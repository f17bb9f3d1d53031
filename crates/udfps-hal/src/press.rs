//! Press-status notification source
//!
//! The touch driver publishes finger press state in a sysfs attribute and
//! signals changes with `sysfs_notify`, which wakes `poll(2)` waiters with
//! `POLLPRI | POLLERR`, so `POLLERR` on its own is the change signal and not
//! a failure. The state itself is always re-read from the file content
//! rather than from the wake-up.

use std::fs::File;
use std::os::fd::AsFd;
use std::path::{Path, PathBuf};

use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use thiserror::Error;

use crate::sysfs::read_bool;
use crate::{HalError, Result};

/// Why a wait on a press source did not produce a state
#[derive(Debug, Error)]
pub enum WaitError {
    /// The source woke up but its content could not be read back
    #[error("press source reported an error: {0}")]
    Reported(String),

    /// The wait itself failed; retry quietly
    #[error("press source wait failed")]
    Transient,

    /// The source is gone and will never produce another event
    #[error("press source closed")]
    Closed,
}

/// A blocking source of finger press state changes
pub trait PressSource: Send {
    /// Block until the press state changes and return the current state
    /// (`true` = pressed).
    fn wait_for_change(&mut self) -> std::result::Result<bool, WaitError>;
}

/// Press-status sysfs attribute watched with `poll(2)`
#[derive(Debug)]
pub struct SysfsPressSource {
    file: File,
    path: PathBuf,
}

impl SysfsPressSource {
    /// Open the attribute read-only
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| HalError::open(path, e))?;

        tracing::debug!("Opened press status source {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_state(&self) -> std::result::Result<bool, WaitError> {
        read_bool(&self.file)
            .map_err(|e| WaitError::Reported(format!("read {}: {}", self.path.display(), e)))
    }
}

/// Decide what a finished `poll(2)` means for the watcher
fn check_wake(polled: nix::Result<PollFlags>) -> std::result::Result<(), WaitError> {
    match polled {
        Err(errno) => {
            tracing::debug!("Press status poll failed: {}", errno);
            Err(WaitError::Transient)
        }
        Ok(revents) if revents.contains(PollFlags::POLLNVAL) => Err(WaitError::Closed),
        Ok(_) => Ok(()),
    }
}

impl PressSource for SysfsPressSource {
    fn wait_for_change(&mut self) -> std::result::Result<bool, WaitError> {
        let mut fds = [PollFd::new(
            self.file.as_fd(),
            PollFlags::POLLPRI | PollFlags::POLLERR,
        )];

        let polled = poll(&mut fds, PollTimeout::NONE)
            .map(|_| fds[0].revents().unwrap_or_else(PollFlags::empty));
        check_wake(polled)?;

        self.read_state()
    }
}
