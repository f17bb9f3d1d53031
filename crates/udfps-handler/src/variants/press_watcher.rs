//! Touch ioctl with an asynchronous press-status watcher
//!
//! On this revision the touch driver knows when the finger actually lands on
//! the sensor and publishes it through a pollable sysfs attribute. A watcher
//! thread forwards every change to the fingerprint module as a press-status
//! report. It holds only the host device, never a touch or display handle.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use udfps_config::{HandlerProfile, VariantId};
use udfps_hal::{
    COMMAND_FOD_PRESS_STATUS, FingerprintDevice, Hardware, PARAM_FOD_PRESSED, PARAM_FOD_RELEASED,
    TouchMode,
};

use crate::acquired;
use crate::devices::DeviceHandles;
use crate::handler::UdfpsHandler;
use crate::watcher::{Backoff, PressWatcher};

pub struct PressWatcherHandler {
    profile: HandlerProfile,
    hardware: Arc<dyn Hardware>,
    handles: Option<DeviceHandles>,
    watcher: Option<JoinHandle<()>>,
}

impl PressWatcherHandler {
    pub fn new(profile: HandlerProfile, hardware: Arc<dyn Hardware>) -> Self {
        Self {
            profile,
            hardware,
            handles: None,
            watcher: None,
        }
    }

    /// Whether the watcher thread is still running
    pub fn is_watching(&self) -> bool {
        self.watcher
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the watcher thread to exit. It only does so once its source
    /// closes, so this is meant for sources that end.
    pub fn join_watcher(&mut self) -> Option<thread::Result<()>> {
        self.watcher.take().map(JoinHandle::join)
    }

    fn activate(&self) {
        let Some(handles) = &self.handles else { return };

        handles.set_fod_enable(true);
        handles.set_touch_mode(TouchMode::FodEnable, 1);
    }

    fn deactivate(&self) {
        let Some(handles) = &self.handles else { return };

        handles.set_touch_mode(TouchMode::FodEnable, 0);
        handles.set_fod_enable(false);
    }

    fn start_watcher(&mut self, device: Arc<dyn FingerprintDevice>) {
        let watcher = PressWatcher::new(
            Arc::clone(&self.hardware),
            self.profile.paths.fod_press_status.clone(),
            Backoff::from_profile(&self.profile.watcher),
        );

        match watcher.spawn(move |pressed| forward_press(device.as_ref(), pressed)) {
            Ok(handle) => self.watcher = Some(handle),
            Err(e) => tracing::error!("Failed to spawn press watcher: {}", e),
        }
    }
}

/// Report a press change from the touch driver back to the fingerprint module
fn forward_press(device: &dyn FingerprintDevice, pressed: bool) {
    let param = if pressed {
        PARAM_FOD_PRESSED
    } else {
        PARAM_FOD_RELEASED
    };

    let status = device.ext_cmd(COMMAND_FOD_PRESS_STATUS, param);
    if status != 0 {
        tracing::debug!("Press status {} returned {}", param, status);
    }
}

impl UdfpsHandler for PressWatcherHandler {
    fn variant(&self) -> VariantId {
        VariantId::PressWatcher
    }

    fn init(&mut self, device: Arc<dyn FingerprintDevice>) {
        if self.handles.is_some() {
            tracing::warn!("{} handler already initialized", self.variant());
            return;
        }

        let paths = &self.profile.paths;
        let hardware = self.hardware.as_ref();
        let handles = DeviceHandles::new(Arc::clone(&device), &self.profile)
            .with_touch(hardware, &paths.touch_dev)
            .with_fod_enable(hardware, &paths.fod_enable);

        self.start_watcher(device);
        self.handles = Some(handles);

        tracing::info!("{} handler initialized", self.variant());
    }

    fn on_finger_down(&mut self, _x: u32, _y: u32, _minor: f32, _major: f32) {
        self.activate();
    }

    fn on_finger_up(&mut self) {
        self.deactivate();
    }

    fn on_acquired(&mut self, result: i32, vendor_code: i32) {
        if acquired::is_terminal(result) {
            self.on_finger_up();
        } else if self.profile.vendor.is_waiting_for_finger(vendor_code) {
            tracing::debug!("Vendor code {}, re-arming FOD", vendor_code);
            if let Some(handles) = &self.handles {
                handles.set_fod_enable(true);
            }
        }
    }

    fn on_authentication_succeeded(&mut self) {
        self.deactivate();
    }

    fn on_authentication_failed(&mut self) {
        self.on_finger_up();
    }

    fn cancel(&mut self) {
        self.deactivate();
    }
}
