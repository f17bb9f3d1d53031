//! UDFPS Probe
//!
//! Bench tool for bringing up a fingerprint handler on a device. Builds the
//! selected variant against the real device nodes, then replays lifecycle
//! events as the fingerprint HAL would send them.
//!
//! ```text
//! udfps-probe <variant> [--config FILE] [--watch SECS] [EVENT...]
//!
//! events: down | up | acquired:<result>[:<vendor>] | success | failed
//!         | cancel | sleep:<ms>
//! ```

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use udfps_config::{HandlerProfile, VariantId};
use udfps_hal::{FingerprintDevice, LinuxHardware};
use udfps_handler::{UdfpsHandler, create_handler, destroy_handler};

const USAGE: &str = "usage: udfps-probe <variant> [--config FILE] [--watch SECS] [EVENT...]";

/// A lifecycle event to replay
#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    FingerDown,
    FingerUp,
    Acquired { result: i32, vendor_code: i32 },
    Succeeded,
    Failed,
    Cancel,
    Sleep(Duration),
}

impl Event {
    fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        let name = parts.next().unwrap_or_default();

        let event = match name {
            "down" => Event::FingerDown,
            "up" => Event::FingerUp,
            "success" => Event::Succeeded,
            "failed" => Event::Failed,
            "cancel" => Event::Cancel,
            "acquired" => {
                let result = parts
                    .next()
                    .context("acquired needs a result code")?
                    .parse()
                    .with_context(|| format!("Bad result code in {:?}", s))?;
                let vendor_code = match parts.next() {
                    Some(code) => code
                        .parse()
                        .with_context(|| format!("Bad vendor code in {:?}", s))?,
                    None => 0,
                };
                Event::Acquired {
                    result,
                    vendor_code,
                }
            }
            "sleep" => {
                let ms = parts
                    .next()
                    .context("sleep needs a duration in ms")?
                    .parse()
                    .with_context(|| format!("Bad duration in {:?}", s))?;
                Event::Sleep(Duration::from_millis(ms))
            }
            _ => bail!("Unknown event: {}", s),
        };

        if parts.next().is_some() {
            bail!("Trailing fields in event: {}", s);
        }
        Ok(event)
    }

    fn apply(self, handler: &mut dyn UdfpsHandler) {
        match self {
            Event::FingerDown => handler.on_finger_down(0, 0, 0.0, 0.0),
            Event::FingerUp => handler.on_finger_up(),
            Event::Acquired {
                result,
                vendor_code,
            } => handler.on_acquired(result, vendor_code),
            Event::Succeeded => handler.on_authentication_succeeded(),
            Event::Failed => handler.on_authentication_failed(),
            Event::Cancel => handler.cancel(),
            Event::Sleep(duration) => thread::sleep(duration),
        }
    }
}

/// Parsed command line
#[derive(Debug)]
struct Args {
    variant: VariantId,
    config: Option<PathBuf>,
    watch: Option<Duration>,
    events: Vec<Event>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();

        let variant = args.next().context(USAGE)?;
        let variant = VariantId::parse(&variant)?;

        let mut config = None;
        let mut watch = None;
        let mut events = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    config = Some(PathBuf::from(args.next().context("--config needs a path")?));
                }
                "--watch" => {
                    let secs: u64 = args
                        .next()
                        .context("--watch needs a duration in seconds")?
                        .parse()
                        .context("Bad --watch duration")?;
                    watch = Some(Duration::from_secs(secs));
                }
                _ => events.push(Event::parse(&arg)?),
            }
        }

        Ok(Self {
            variant,
            config,
            watch,
            events,
        })
    }
}

/// Host stand-in that logs what the fingerprint module would be told
struct LoggingDevice;

impl FingerprintDevice for LoggingDevice {
    fn ext_cmd(&self, cmd: i32, param: i32) -> i32 {
        info!("extCmd({}, {})", cmd, param);
        0
    }
}

fn main() -> Result<()> {
    setup_logging();

    let args = Args::parse(std::env::args().skip(1))?;

    let profile = match &args.config {
        Some(path) => HandlerProfile::load_with_overlay(args.variant, path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => HandlerProfile::load_default(args.variant)?,
    };

    info!("UDFPS probe starting ({})", profile.variant);

    let mut handler = create_handler(profile, Arc::new(LinuxHardware));
    handler.init(Arc::new(LoggingDevice));

    for event in &args.events {
        info!("-> {:?}", event);
        event.apply(handler.as_mut());
    }

    if let Some(duration) = args.watch {
        if args.variant != VariantId::PressWatcher {
            warn!("{} has no press watcher, waiting anyway", args.variant);
        }
        info!("Watching for {:?}", duration);
        thread::sleep(duration);
    }

    destroy_handler(handler);
    info!("UDFPS probe done");
    Ok(())
}

/// Setup logging to console
fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_ansi(false))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_events() {
        assert_eq!(Event::parse("down").unwrap(), Event::FingerDown);
        assert_eq!(Event::parse("cancel").unwrap(), Event::Cancel);
        assert_eq!(
            Event::parse("acquired:6").unwrap(),
            Event::Acquired {
                result: 6,
                vendor_code: 0
            }
        );
        assert_eq!(
            Event::parse("acquired:6:21").unwrap(),
            Event::Acquired {
                result: 6,
                vendor_code: 21
            }
        );
        assert_eq!(
            Event::parse("sleep:600").unwrap(),
            Event::Sleep(Duration::from_millis(600))
        );
    }

    #[test]
    fn test_parse_bad_events() {
        assert!(Event::parse("press").is_err());
        assert!(Event::parse("acquired").is_err());
        assert!(Event::parse("acquired:x").is_err());
        assert!(Event::parse("sleep:-1").is_err());
        assert!(Event::parse("down:1").is_err());
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&[
            "press-watcher",
            "--config",
            "/tmp/udfps.toml",
            "down",
            "--watch",
            "3",
            "up",
        ])
        .unwrap();

        assert_eq!(parsed.variant, VariantId::PressWatcher);
        assert_eq!(parsed.config, Some(PathBuf::from("/tmp/udfps.toml")));
        assert_eq!(parsed.watch, Some(Duration::from_secs(3)));
        assert_eq!(parsed.events, vec![Event::FingerDown, Event::FingerUp]);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["bogus"]).is_err());
        assert!(args(&["sysfs-fod", "--watch"]).is_err());
        assert!(args(&["sysfs-fod", "--config"]).is_err());
    }

    #[test]
    fn test_events_drive_mock_handler() {
        use udfps_hal::mock::MockHardware;

        let hardware = MockHardware::new();
        let profile = HandlerProfile::for_variant(VariantId::TouchHbm);
        let mut handler = create_handler(profile, Arc::new(hardware.clone()));
        handler.init(hardware.fingerprint_device());

        for event in [Event::FingerDown, Event::Acquired { result: 1, vendor_code: 0 }] {
            event.apply(handler.as_mut());
        }
        assert_eq!(hardware.ops().len(), 6);
    }
}
