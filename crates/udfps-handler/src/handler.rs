//! Capability interface consumed by the fingerprint host module

use std::sync::Arc;

use udfps_config::VariantId;
use udfps_hal::FingerprintDevice;

/// Lifecycle callbacks from the fingerprint host.
///
/// The host serializes calls per session. Every callback is best effort:
/// device failures are logged and swallowed, never surfaced to the host.
/// Callbacks a variant has no use for keep the default no-op body.
pub trait UdfpsHandler: Send {
    /// Hardware revision this handler drives
    fn variant(&self) -> VariantId;

    /// Open device handles. Only the first call has any effect.
    fn init(&mut self, device: Arc<dyn FingerprintDevice>);

    /// Finger touched the sensor area. Geometry is informational only.
    fn on_finger_down(&mut self, _x: u32, _y: u32, _minor: f32, _major: f32) {}

    /// Finger left the sensor area; also the common reset path.
    fn on_finger_up(&mut self) {}

    fn on_acquired(&mut self, _result: i32, _vendor_code: i32) {}

    fn on_authentication_succeeded(&mut self) {}

    fn on_authentication_failed(&mut self) {}

    /// Host aborted the operation; drop every active hardware effect.
    fn cancel(&mut self) {}
}
