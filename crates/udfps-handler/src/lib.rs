//! Finger-press handling for under-display fingerprint sensors
//!
//! The fingerprint host loads this as a plug-in and reports the lifecycle of
//! every touch on the sensor area. Each handler turns those callbacks into
//! the ordered device writes its hardware revision needs: touch controller
//! FOD modes, local high-brightness mode on the panel, sysfs flags, and
//! extended commands back to the fingerprint module.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use udfps_config::{HandlerProfile, VariantId};
//! use udfps_hal::mock::MockHardware;
//! use udfps_handler::create_handler;
//!
//! let hardware = MockHardware::new();
//! let profile = HandlerProfile::for_variant(VariantId::DispFeature);
//!
//! let mut handler = create_handler(profile, Arc::new(hardware.clone()));
//! handler.init(hardware.fingerprint_device());
//! handler.on_finger_down(540, 1800, 2.0, 3.0);
//! handler.on_acquired(1, 0);
//! ```

pub mod acquired;
pub mod devices;
pub mod factory;
pub mod handler;
pub mod suppression;
pub mod variants;
pub mod watcher;

pub use acquired::AcquiredInfo;
pub use devices::DeviceHandles;
pub use factory::{UDFPS_HANDLER_FACTORY, UdfpsHandlerFactory, create_handler, destroy_handler};
pub use handler::UdfpsHandler;
pub use suppression::SuppressionWindow;
pub use variants::{DispFeatureHandler, PressWatcherHandler, SysfsFodHandler, TouchHbmHandler};
pub use watcher::{Backoff, PressWatcher};
