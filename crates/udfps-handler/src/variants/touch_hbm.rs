//! Touch ioctl down/up control + display-feature local HBM
//!
//! Everything goes through ioctls; the fingerprint module is not told about
//! illumination or press state on this revision. Deactivation runs the
//! activate steps in reverse.

use std::sync::Arc;

use udfps_config::{HandlerProfile, VariantId};
use udfps_hal::{FingerprintDevice, Hardware, TouchMode};

use crate::acquired;
use crate::devices::DeviceHandles;
use crate::handler::UdfpsHandler;

pub struct TouchHbmHandler {
    profile: HandlerProfile,
    hardware: Arc<dyn Hardware>,
    handles: Option<DeviceHandles>,
}

impl TouchHbmHandler {
    pub fn new(profile: HandlerProfile, hardware: Arc<dyn Hardware>) -> Self {
        Self {
            profile,
            hardware,
            handles: None,
        }
    }

    fn activate(&self) {
        let Some(handles) = &self.handles else { return };

        handles.set_touch_mode(TouchMode::FodEnable, 1);
        handles.set_touch_mode(TouchMode::FodDownUpCtl, 1);
        handles.set_local_hbm(true);
    }

    fn deactivate(&self) {
        let Some(handles) = &self.handles else { return };

        handles.set_local_hbm(false);
        handles.set_touch_mode(TouchMode::FodDownUpCtl, 0);
        handles.set_touch_mode(TouchMode::FodEnable, 0);
    }
}

impl UdfpsHandler for TouchHbmHandler {
    fn variant(&self) -> VariantId {
        VariantId::TouchHbm
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
                .with_touch(hardware, &paths.touch_dev)
                .with_display(hardware, &paths.disp_feature),
        );

        tracing::info!("{} handler initialized", self.variant());
    }

    fn on_finger_down(&mut self, _x: u32, _y: u32, _minor: f32, _major: f32) {
        self.activate();
    }

    fn on_finger_up(&mut self) {
        self.deactivate();
    }

    fn on_acquired(&mut self, result: i32, _vendor_code: i32) {
        if acquired::is_terminal(result) {
            self.on_finger_up();
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
