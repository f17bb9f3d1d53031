//! Touch ioctl + display-feature local HBM
//!
//! The only revision that suppresses finger events for a short window after
//! a successful authentication: the panel is already leaving HBM at that
//! point and a second deactivate makes it flicker.

use std::sync::Arc;

use udfps_config::{HandlerProfile, VariantId};
use udfps_hal::{
    COMMAND_FOD_PRESS_STATUS, COMMAND_NIT, FingerprintDevice, Hardware, PARAM_FOD_PRESSED,
    PARAM_FOD_RELEASED, PARAM_NIT_NONE, PARAM_NIT_UDFPS, TouchMode,
};

use crate::acquired;
use crate::devices::DeviceHandles;
use crate::handler::UdfpsHandler;
use crate::suppression::SuppressionWindow;

pub struct DispFeatureHandler {
    profile: HandlerProfile,
    hardware: Arc<dyn Hardware>,
    handles: Option<DeviceHandles>,
    suppression: Option<SuppressionWindow>,
}

impl DispFeatureHandler {
    pub fn new(profile: HandlerProfile, hardware: Arc<dyn Hardware>) -> Self {
        let suppression = profile
            .suppression
            .enabled
            .then(|| SuppressionWindow::new(profile.suppression.window()));

        Self {
            profile,
            hardware,
            handles: None,
            suppression,
        }
    }

    fn is_suppressed(&self) -> bool {
        self.suppression
            .as_ref()
            .is_some_and(SuppressionWindow::is_active)
    }

    fn activate(&self) {
        let Some(handles) = &self.handles else { return };

        handles.set_touch_mode(TouchMode::FodEnable, 1);
        handles.ext_cmd(COMMAND_NIT, PARAM_NIT_UDFPS);
        handles.set_local_hbm(true);
        handles.ext_cmd(COMMAND_FOD_PRESS_STATUS, PARAM_FOD_PRESSED);
    }

    fn deactivate(&self) {
        let Some(handles) = &self.handles else { return };

        handles.set_touch_mode(TouchMode::FodEnable, 0);
        handles.ext_cmd(COMMAND_NIT, PARAM_NIT_NONE);
        handles.set_local_hbm(false);
        handles.ext_cmd(COMMAND_FOD_PRESS_STATUS, PARAM_FOD_RELEASED);
    }
}

impl UdfpsHandler for DispFeatureHandler {
    fn variant(&self) -> VariantId {
        VariantId::DispFeature
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
                .with_display(hardware, &paths.disp_feature)
                .with_touch(hardware, &paths.touch_dev),
        );

        tracing::info!("{} handler initialized", self.variant());
    }

    fn on_finger_down(&mut self, _x: u32, _y: u32, _minor: f32, _major: f32) {
        if self.is_suppressed() {
            tracing::debug!("Finger down suppressed after authentication");
            return;
        }
        self.activate();
    }

    fn on_finger_up(&mut self) {
        if self.is_suppressed() {
            tracing::debug!("Finger up suppressed after authentication");
            return;
        }
        self.deactivate();
    }

    fn on_acquired(&mut self, result: i32, _vendor_code: i32) {
        if acquired::is_terminal(result) {
            self.on_finger_up();
        }
    }

    fn on_authentication_succeeded(&mut self) {
        if let Some(window) = &mut self.suppression {
            window.arm();
        }
        self.deactivate();
    }

    fn on_authentication_failed(&mut self) {
        self.on_finger_up();
    }

    fn cancel(&mut self) {
        self.deactivate();
    }
}
