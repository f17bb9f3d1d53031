//! Device handles owned by a handler
//!
//! Handles are opened once at `init`. A node that fails to open stays
//! `None` and every later write to it is skipped; write failures are logged
//! and dropped so one backend never blocks the others.

use std::path::Path;
use std::sync::Arc;

use udfps_config::HandlerProfile;
use udfps_hal::{
    DisplayControl, DisplayFeatureRequest, FingerprintDevice, FlagControl, Hardware,
    TouchCommand, TouchControl, TouchMode,
};

fn opened<T: ?Sized>(what: &str, path: &Path, result: udfps_hal::Result<Arc<T>>) -> Option<Arc<T>> {
    match result {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!("Failed to open {} at {}: {}", what, path.display(), e);
            None
        }
    }
}

/// Backend handles plus the request templates built from the profile
#[derive(Clone)]
pub struct DeviceHandles {
    host: Arc<dyn FingerprintDevice>,
    touch: Option<Arc<dyn TouchControl>>,
    display: Option<Arc<dyn DisplayControl>>,
    fod_enable: Option<Arc<dyn FlagControl>>,
    fod_press: Option<Arc<dyn FlagControl>>,
    touch_id: i32,
    hbm_on: DisplayFeatureRequest,
    hbm_off: DisplayFeatureRequest,
}

impl DeviceHandles {
    /// Handles with no backend opened yet
    pub fn new(host: Arc<dyn FingerprintDevice>, profile: &HandlerProfile) -> Self {
        let display = &profile.display;
        let hbm_on =
            DisplayFeatureRequest::new(display.disp_id, display.local_hbm_feature, display.hbm_on);

        Self {
            host,
            touch: None,
            display: None,
            fod_enable: None,
            fod_press: None,
            touch_id: profile.touch.touch_id,
            hbm_on,
            hbm_off: hbm_on.with_value(display.hbm_off),
        }
    }

    pub fn with_touch(mut self, hardware: &dyn Hardware, path: &Path) -> Self {
        self.touch = opened("touch device", path, hardware.open_touch(path));
        self
    }

    pub fn with_display(mut self, hardware: &dyn Hardware, path: &Path) -> Self {
        self.display = opened("display feature device", path, hardware.open_display(path));
        self
    }

    pub fn with_fod_enable(mut self, hardware: &dyn Hardware, path: &Path) -> Self {
        self.fod_enable = opened("FOD enable flag", path, hardware.open_flag(path));
        self
    }

    pub fn with_fod_press(mut self, hardware: &dyn Hardware, path: &Path) -> Self {
        self.fod_press = opened("FOD press flag", path, hardware.open_flag(path));
        self
    }

    pub fn set_touch_mode(&self, mode: TouchMode, value: i32) {
        let Some(touch) = &self.touch else {
            tracing::debug!("No touch device, skipping {} = {}", mode.name(), value);
            return;
        };

        if let Err(e) = touch.set_mode(TouchCommand::new(self.touch_id, mode, value)) {
            tracing::warn!("Failed to set touch {} = {}: {}", mode.name(), value, e);
        }
    }

    /// Switch local HBM over the sensor on or back to normal
    pub fn set_local_hbm(&self, on: bool) {
        let Some(display) = &self.display else {
            tracing::debug!("No display feature device, skipping local HBM");
            return;
        };

        let request = if on { self.hbm_on } else { self.hbm_off };
        if let Err(e) = display.set_feature(request) {
            tracing::warn!("Failed to set local HBM to {}: {}", request.value, e);
        }
    }

    pub fn set_fod_enable(&self, on: bool) {
        write_flag("FOD enable", self.fod_enable.as_deref(), on);
    }

    pub fn set_fod_press(&self, on: bool) {
        write_flag("FOD press", self.fod_press.as_deref(), on);
    }

    /// Forward an extended command to the owning fingerprint device
    pub fn ext_cmd(&self, cmd: i32, param: i32) {
        let status = self.host.ext_cmd(cmd, param);
        if status != 0 {
            tracing::debug!("extCmd({}, {}) returned {}", cmd, param, status);
        }
    }
}

fn write_flag(what: &str, flag: Option<&dyn FlagControl>, on: bool) {
    let Some(flag) = flag else {
        tracing::debug!("No {} flag, skipping", what);
        return;
    };

    if let Err(e) = flag.write_flag(on) {
        tracing::warn!("Failed to write {} flag: {}", what, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use udfps_config::VariantId;
    use udfps_hal::mock::{DeviceOp, MockHardware};

    fn profile() -> HandlerProfile {
        HandlerProfile::for_variant(VariantId::TouchHbm)
    }

    #[test]
    fn test_missing_handles_are_skipped() {
        let hardware = MockHardware::new();
        let handles = DeviceHandles::new(hardware.fingerprint_device(), &profile());

        handles.set_touch_mode(TouchMode::FodEnable, 1);
        handles.set_local_hbm(true);
        handles.set_fod_enable(true);
        handles.set_fod_press(true);
        assert!(hardware.ops().is_empty());

        handles.ext_cmd(10, 1);
        assert_eq!(hardware.ops(), vec![DeviceOp::ExtCmd { cmd: 10, param: 1 }]);
    }

    #[test]
    fn test_hbm_templates_follow_profile() {
        let hardware = MockHardware::new();
        let mut profile = profile();
        profile.display.disp_id = 1;
        profile.display.hbm_on = 7;

        let handles = DeviceHandles::new(hardware.fingerprint_device(), &profile)
            .with_display(&hardware, &profile.paths.disp_feature);
        handles.set_local_hbm(true);
        handles.set_local_hbm(false);

        assert_eq!(
            hardware.ops(),
            vec![
                DeviceOp::Display(DisplayFeatureRequest::new(1, 9, 7)),
                DeviceOp::Display(DisplayFeatureRequest::new(1, 9, 0)),
            ]
        );
    }

    #[test]
    fn test_write_failures_do_not_block_other_backends() {
        let hardware = MockHardware::new();
        let profile = profile();
        let handles = DeviceHandles::new(hardware.fingerprint_device(), &profile)
            .with_touch(&hardware, &profile.paths.touch_dev)
            .with_display(&hardware, &profile.paths.disp_feature);

        hardware.set_failing_writes(true);
        handles.set_touch_mode(TouchMode::FodEnable, 1);
        handles.set_local_hbm(true);
        handles.ext_cmd(1, 1);

        assert_eq!(hardware.ops(), vec![DeviceOp::ExtCmd { cmd: 1, param: 1 }]);
    }
}
