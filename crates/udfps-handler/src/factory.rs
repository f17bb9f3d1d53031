//! Plug-in entry points
//!
//! The fingerprint host looks up one factory table per module and uses it to
//! create and destroy handlers; the variant is picked from the profile.

use std::sync::Arc;

use udfps_config::{HandlerProfile, VariantId};
use udfps_hal::Hardware;

use crate::handler::UdfpsHandler;
use crate::variants::{DispFeatureHandler, PressWatcherHandler, SysfsFodHandler, TouchHbmHandler};

/// Create the handler for `profile.variant`
pub fn create_handler(profile: HandlerProfile, hardware: Arc<dyn Hardware>) -> Box<dyn UdfpsHandler> {
    tracing::debug!("Creating {} handler", profile.variant);

    match profile.variant {
        VariantId::DispFeature => Box::new(DispFeatureHandler::new(profile, hardware)),
        VariantId::SysfsFod => Box::new(SysfsFodHandler::new(profile, hardware)),
        VariantId::PressWatcher => Box::new(PressWatcherHandler::new(profile, hardware)),
        VariantId::TouchHbm => Box::new(TouchHbmHandler::new(profile, hardware)),
    }
}

/// Release a handler and its device handles
pub fn destroy_handler(handler: Box<dyn UdfpsHandler>) {
    tracing::debug!("Destroying {} handler", handler.variant());
    drop(handler);
}

/// Factory table exported to the fingerprint host
pub struct UdfpsHandlerFactory {
    pub create: fn(HandlerProfile, Arc<dyn Hardware>) -> Box<dyn UdfpsHandler>,
    pub destroy: fn(Box<dyn UdfpsHandler>),
}

pub static UDFPS_HANDLER_FACTORY: UdfpsHandlerFactory = UdfpsHandlerFactory {
    create: create_handler,
    destroy: destroy_handler,
};
