//! Press-status watcher
//!
//! A dedicated thread blocks on a [`PressSource`] and hands every decoded
//! press state to a callback. The thread is started once, never restarted,
//! and runs until its source goes away. Failed waits are retried after a
//! bounded exponential backoff so a misbehaving source cannot spin it.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use udfps_config::WatcherProfile;
use udfps_hal::{Hardware, PressSource, WaitError};

/// Delay between retries of a failing wait
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let max = max.max(initial);
        Self {
            initial,
            max,
            current: initial,
        }
    }

    pub fn from_profile(profile: &WatcherProfile) -> Self {
        Self::new(profile.initial_backoff(), profile.max_backoff())
    }

    /// Delay to sleep now; doubles the next one up to the cap
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Watcher configuration, consumed when the thread starts
pub struct PressWatcher {
    hardware: Arc<dyn Hardware>,
    path: PathBuf,
    backoff: Backoff,
}

impl PressWatcher {
    pub fn new(hardware: Arc<dyn Hardware>, path: PathBuf, backoff: Backoff) -> Self {
        Self {
            hardware,
            path,
            backoff,
        }
    }

    /// Start the watcher thread. The source is opened on that thread; if it
    /// cannot be opened the thread logs and exits.
    pub fn spawn<F>(self, on_change: F) -> io::Result<JoinHandle<()>>
    where
        F: FnMut(bool) + Send + 'static,
    {
        thread::Builder::new()
            .name("udfps-press-watcher".into())
            .spawn(move || self.run(on_change))
    }

    fn run<F: FnMut(bool)>(mut self, mut on_change: F) {
        let mut source = match self.hardware.open_press_source(&self.path) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!("Press watcher disabled: {}", e);
                return;
            }
        };

        tracing::info!("Press watcher started on {}", self.path.display());
        watch(source.as_mut(), &mut self.backoff, &mut on_change);
    }
}

/// Forward press changes from `source` until it closes
pub fn watch(source: &mut dyn PressSource, backoff: &mut Backoff, on_change: &mut dyn FnMut(bool)) {
    loop {
        match source.wait_for_change() {
            Ok(pressed) => {
                backoff.reset();
                tracing::debug!(pressed, "Press status changed");
                on_change(pressed);
            }
            Err(WaitError::Reported(reason)) => {
                tracing::error!("Press status wait failed: {}", reason);
                thread::sleep(backoff.next_delay());
            }
            Err(WaitError::Transient) => {
                thread::sleep(backoff.next_delay());
            }
            Err(WaitError::Closed) => {
                tracing::warn!("Press status source closed, watcher exiting");
                return;
            }
        }
    }
}
