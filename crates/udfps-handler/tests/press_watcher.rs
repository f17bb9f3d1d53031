//! Press-status forwarding through the watcher thread

use std::sync::Arc;
use std::time::{Duration, Instant};

use udfps_config::{HandlerProfile, VariantId};
use udfps_hal::mock::{DeviceOp, MockHardware, PressStep};
use udfps_hal::{
    COMMAND_FOD_PRESS_STATUS, COMMAND_NIT, PARAM_FOD_PRESSED, PARAM_FOD_RELEASED, TouchMode,
};
use udfps_handler::{PressWatcherHandler, UdfpsHandler};

fn press_status(param: i32) -> DeviceOp {
    DeviceOp::ExtCmd {
        cmd: COMMAND_FOD_PRESS_STATUS,
        param,
    }
}

fn run_script(hardware: &MockHardware, steps: Vec<PressStep>) -> PressWatcherHandler {
    hardware.set_press_script(steps);

    let mut handler = PressWatcherHandler::new(
        HandlerProfile::for_variant(VariantId::PressWatcher),
        Arc::new(hardware.clone()),
    );
    handler.init(hardware.fingerprint_device());
    handler
}

fn press_reports(ops: &[DeviceOp]) -> Vec<i32> {
    ops.iter()
        .filter_map(|op| match op {
            DeviceOp::ExtCmd { cmd, param } if *cmd == COMMAND_FOD_PRESS_STATUS => Some(*param),
            _ => None,
        })
        .collect()
}

#[test]
fn test_forwards_each_wake_up_in_order() {
    let hardware = MockHardware::new();
    let mut handler = run_script(
        &hardware,
        vec![
            PressStep::Change(true),
            PressStep::Change(false),
            PressStep::Change(true),
        ],
    );
    assert!(handler.join_watcher().unwrap().is_ok());

    assert_eq!(
        hardware.ops(),
        vec![
            press_status(PARAM_FOD_PRESSED),
            press_status(PARAM_FOD_RELEASED),
            press_status(PARAM_FOD_PRESSED),
        ]
    );
}

#[test]
fn test_failed_waits_forward_nothing() {
    let hardware = MockHardware::new();
    let mut handler = run_script(
        &hardware,
        vec![
            PressStep::Transient,
            PressStep::Reported,
            PressStep::Change(true),
            PressStep::Reported,
            PressStep::Transient,
            PressStep::Change(false),
        ],
    );
    handler.join_watcher();

    assert_eq!(
        press_reports(&hardware.ops()),
        vec![PARAM_FOD_PRESSED, PARAM_FOD_RELEASED]
    );
}

#[test]
fn test_failing_source_backs_off_within_cap() {
    let hardware = MockHardware::new();
    let start = Instant::now();
    let mut handler = run_script(&hardware, vec![PressStep::Transient; 12]);
    handler.join_watcher();

    // 1 + 2 + 4 + ... capped at 250ms: bounded, but clearly not a spin
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(200), "{:?}", elapsed);
    assert!(elapsed < Duration::from_secs(5), "{:?}", elapsed);
    assert!(hardware.ops().is_empty());
}

#[test]
fn test_watcher_commands_are_disjoint_from_callbacks() {
    let hardware = MockHardware::new();
    let mut handler = run_script(
        &hardware,
        vec![PressStep::Change(true), PressStep::Change(false)],
    );
    handler.join_watcher();
    let watcher_ops = hardware.take_ops();

    handler.on_finger_down(0, 0, 0.0, 0.0);
    handler.on_finger_up();
    let callback_ops = hardware.take_ops();

    // The watcher only reports press status
    assert_eq!(
        watcher_ops,
        vec![
            press_status(PARAM_FOD_PRESSED),
            press_status(PARAM_FOD_RELEASED),
        ]
    );
    assert!(!watcher_ops.iter().any(|op| matches!(op, DeviceOp::Touch(_))));
    assert!(
        !watcher_ops
            .iter()
            .any(|op| matches!(op, DeviceOp::ExtCmd { cmd, .. } if *cmd == COMMAND_NIT))
    );

    // and the callbacks never do
    assert!(
        !callback_ops
            .iter()
            .any(|op| matches!(op, DeviceOp::ExtCmd { .. }))
    );
    assert!(callback_ops.iter().all(|op| match op {
        DeviceOp::Touch(command) => command.mode == TouchMode::FodEnable,
        _ => true,
    }));
}

#[test]
fn test_watcher_source_unavailable() {
    let hardware = MockHardware::new();
    let profile = HandlerProfile::for_variant(VariantId::PressWatcher);
    hardware.make_unavailable(profile.paths.fod_press_status.clone());
    hardware.set_press_script([PressStep::Change(true)]);

    let mut handler = PressWatcherHandler::new(profile, Arc::new(hardware.clone()));
    handler.init(hardware.fingerprint_device());
    assert!(handler.join_watcher().unwrap().is_ok());
    assert!(hardware.ops().is_empty());

    // Callbacks still work without the watcher
    handler.on_finger_down(0, 0, 0.0, 0.0);
    assert_eq!(hardware.ops().len(), 2);
}
