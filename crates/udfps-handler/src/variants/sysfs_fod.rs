//! Sysfs FOD flags, illumination through the host device
//!
//! No touch or panel ioctls on this revision: the touch driver takes the
//! FOD enable and press state as sysfs attributes and the fingerprint
//! module drives the illumination itself via the NIT command.

use std::sync::Arc;

use udfps_config::{HandlerProfile, VariantId};
use udfps_hal::{COMMAND_NIT, FingerprintDevice, Hardware, PARAM_NIT_NONE, PARAM_NIT_UDFPS};

use crate::acquired;
use crate::devices::DeviceHandles;
use crate::handler::UdfpsHandler;

pub struct SysfsFodHandler {
    profile: HandlerProfile,
    hardware: Arc<dyn Hardware>,
    handles: Option<DeviceHandles>,
}

impl SysfsFodHandler {
    pub fn new(profile: HandlerProfile, hardware: Arc<dyn Hardware>) -> Self {
        Self {
            profile,
            hardware,
            handles: None,
        }
    }

    fn activate(&self) {
        let Some(handles) = &self.handles else { return };

        handles.set_fod_enable(true);
        handles.ext_cmd(COMMAND_NIT, PARAM_NIT_UDFPS);
        handles.set_fod_press(true);
    }

    fn deactivate(&self) {
        let Some(handles) = &self.handles else { return };

        handles.set_fod_press(false);
        handles.ext_cmd(COMMAND_NIT, PARAM_NIT_NONE);
        handles.set_fod_enable(false);
    }
}

impl UdfpsHandler for SysfsFodHandler {
    fn variant(&self) -> VariantId {
        VariantId::SysfsFod
    }

    fn init(&mut self, device: Arc<dyn FingerprintDevice>) {
        if self.handles.is_some() {
            tracing::warn!("{} handler already initialized", self.variant());
            return;
        }

        let paths = &self.profile.paths;
        let hardware = self.hardware.as_ref();
        self.handles = Some(
            DeviceHandles::new(device, &self.profile)
                .with_fod_enable(hardware, &paths.fod_enable)
                .with_fod_press(hardware, &paths.fod_press),
        );

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
