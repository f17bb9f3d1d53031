//! Mock implementations for testing without real hardware
//!
//! Every mock backend records the operations it receives into one shared
//! [`MockState`], in issue order, and tracks the last value written to each
//! touch mode, display feature, sysfs flag and extended command. Tests can
//! then assert on exact sequences or on final device state.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use udfps_hal::mock::MockHardware;
//! use udfps_hal::{FingerprintDevice, Hardware, TouchCommand, TouchMode};
//!
//! let hardware = MockHardware::new();
//! let touch = hardware.open_touch(Path::new("/dev/xiaomi-touch")).unwrap();
//! touch.set_mode(TouchCommand::new(0, TouchMode::FodEnable, 1)).unwrap();
//! hardware.fingerprint_device().ext_cmd(10, 1);
//!
//! assert_eq!(hardware.ops().len(), 2);
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::display::{DisplayControl, DisplayFeatureRequest};
use crate::press::{PressSource, WaitError};
use crate::sysfs::FlagControl;
use crate::touch::{TouchCommand, TouchControl, TouchMode};
use crate::{FingerprintDevice, HalError, Hardware, Result};

/// One operation observed by the mock backends
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOp {
    Touch(TouchCommand),
    Display(DisplayFeatureRequest),
    Flag { path: PathBuf, on: bool },
    ExtCmd { cmd: i32, param: i32 },
}

/// One scripted wake-up of the mock press source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressStep {
    /// The source woke up and now reads this state
    Change(bool),
    /// The source reported an error condition
    Reported,
    /// The wait was interrupted
    Transient,
}

/// Last value written to every backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSnapshot {
    pub touch_modes: HashMap<(i32, TouchMode), i32>,
    pub display_features: HashMap<(u32, u32), i32>,
    pub flags: HashMap<PathBuf, bool>,
    pub ext_cmds: HashMap<i32, i32>,
}

/// Shared mock state for synchronized access
#[derive(Debug, Default)]
pub struct MockState {
    /// Operations in issue order
    pub ops: Vec<DeviceOp>,
    /// Current device values
    pub current: DeviceSnapshot,
    /// Paths whose open fails
    pub unavailable: HashSet<PathBuf>,
    /// Reject every touch, display and flag write
    pub failing_writes: bool,
    /// Wake-ups served by the next opened press source
    pub press_script: Option<VecDeque<PressStep>>,
    /// Paths successfully opened, in order
    pub opened: Vec<PathBuf>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply(&mut self, op: DeviceOp) {
        match &op {
            DeviceOp::Touch(command) => {
                self.current
                    .touch_modes
                    .insert((command.touch_id, command.mode), command.value);
            }
            DeviceOp::Display(request) => {
                self.current
                    .display_features
                    .insert((request.disp_id, request.feature_id), request.value);
            }
            DeviceOp::Flag { path, on } => {
                self.current.flags.insert(path.clone(), *on);
            }
            DeviceOp::ExtCmd { cmd, param } => {
                self.current.ext_cmds.insert(*cmd, *param);
            }
        }
        self.ops.push(op);
    }
}

fn record_write(state: &RwLock<MockState>, op: DeviceOp) -> Result<()> {
    let mut state = state
        .write()
        .map_err(|_| HalError::Unavailable("mock state poisoned".into()))?;

    if state.failing_writes {
        tracing::debug!("[MOCK] Rejected {:?}", op);
        return Err(HalError::Unavailable(format!("write rejected: {:?}", op)));
    }

    tracing::debug!("[MOCK] {:?}", op);
    state.apply(op);
    Ok(())
}

/// Mock hardware handing out recording backends
#[derive(Debug, Clone, Default)]
pub struct MockHardware {
    state: Arc<RwLock<MockState>>,
}

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get shared state for manipulation in tests
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        Arc::clone(&self.state)
    }

    /// Host fingerprint device recording into the same state
    pub fn fingerprint_device(&self) -> Arc<MockFingerprintDevice> {
        Arc::new(MockFingerprintDevice {
            state: Arc::clone(&self.state),
        })
    }

    /// Make every later open of `path` fail
    pub fn make_unavailable(&self, path: impl Into<PathBuf>) {
        if let Ok(mut state) = self.state.write() {
            state.unavailable.insert(path.into());
        }
    }

    /// Simulate a driver rejecting every write
    pub fn set_failing_writes(&self, failing: bool) {
        if let Ok(mut state) = self.state.write() {
            state.failing_writes = failing;
        }
    }

    /// Script the wake-ups of the next opened press source. Once the script
    /// runs out the source reports itself closed.
    pub fn set_press_script(&self, steps: impl IntoIterator<Item = PressStep>) {
        if let Ok(mut state) = self.state.write() {
            state.press_script = Some(steps.into_iter().collect());
        }
    }

    /// Recorded operations in issue order
    pub fn ops(&self) -> Vec<DeviceOp> {
        self.state
            .read()
            .map(|s| s.ops.clone())
            .unwrap_or_default()
    }

    /// Recorded operations, clearing the log
    pub fn take_ops(&self) -> Vec<DeviceOp> {
        self.state
            .write()
            .map(|mut s| std::mem::take(&mut s.ops))
            .unwrap_or_default()
    }

    /// Current value of every backend
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.state
            .read()
            .map(|s| s.current.clone())
            .unwrap_or_default()
    }

    /// Paths opened so far
    pub fn opened(&self) -> Vec<PathBuf> {
        self.state
            .read()
            .map(|s| s.opened.clone())
            .unwrap_or_default()
    }

    fn check_open(&self, path: &Path) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| HalError::Unavailable("mock state poisoned".into()))?;

        if state.unavailable.contains(path) {
            tracing::debug!("[MOCK] Open of {} refused", path.display());
            return Err(HalError::open(
                path,
                io::Error::from(io::ErrorKind::NotFound),
            ));
        }

        state.opened.push(path.to_path_buf());
        Ok(())
    }
}

impl Hardware for MockHardware {
    fn open_touch(&self, path: &Path) -> Result<Arc<dyn TouchControl>> {
        self.check_open(path)?;
        Ok(Arc::new(MockTouch {
            state: Arc::clone(&self.state),
        }))
    }

    fn open_display(&self, path: &Path) -> Result<Arc<dyn DisplayControl>> {
        self.check_open(path)?;
        Ok(Arc::new(MockDisplay {
            state: Arc::clone(&self.state),
        }))
    }

    fn open_flag(&self, path: &Path) -> Result<Arc<dyn FlagControl>> {
        self.check_open(path)?;
        Ok(Arc::new(MockFlag {
            path: path.to_path_buf(),
            state: Arc::clone(&self.state),
        }))
    }

    fn open_press_source(&self, path: &Path) -> Result<Box<dyn PressSource>> {
        self.check_open(path)?;

        let script = self
            .state
            .write()
            .ok()
            .and_then(|mut s| s.press_script.take())
            .ok_or_else(|| HalError::open(path, io::Error::from(io::ErrorKind::NotFound)))?;

        Ok(Box::new(MockPressSource { script }))
    }
}

/// Mock touch controller
pub struct MockTouch {
    state: Arc<RwLock<MockState>>,
}

impl TouchControl for MockTouch {
    fn set_mode(&self, command: TouchCommand) -> Result<()> {
        record_write(&self.state, DeviceOp::Touch(command))
    }
}

/// Mock display-feature device
pub struct MockDisplay {
    state: Arc<RwLock<MockState>>,
}

impl DisplayControl for MockDisplay {
    fn set_feature(&self, request: DisplayFeatureRequest) -> Result<()> {
        record_write(&self.state, DeviceOp::Display(request))
    }
}

/// Mock sysfs flag
pub struct MockFlag {
    path: PathBuf,
    state: Arc<RwLock<MockState>>,
}

impl FlagControl for MockFlag {
    fn write_flag(&self, on: bool) -> Result<()> {
        record_write(
            &self.state,
            DeviceOp::Flag {
                path: self.path.clone(),
                on,
            },
        )
    }
}

/// Mock press source replaying a script
pub struct MockPressSource {
    script: VecDeque<PressStep>,
}

impl PressSource for MockPressSource {
    fn wait_for_change(&mut self) -> std::result::Result<bool, WaitError> {
        match self.script.pop_front() {
            Some(PressStep::Change(pressed)) => Ok(pressed),
            Some(PressStep::Reported) => Err(WaitError::Reported("scripted error".into())),
            Some(PressStep::Transient) => Err(WaitError::Transient),
            None => Err(WaitError::Closed),
        }
    }
}

/// Mock host fingerprint device
pub struct MockFingerprintDevice {
    state: Arc<RwLock<MockState>>,
}

impl FingerprintDevice for MockFingerprintDevice {
    fn ext_cmd(&self, cmd: i32, param: i32) -> i32 {
        if let Ok(mut state) = self.state.write() {
            state.apply(DeviceOp::ExtCmd { cmd, param });
        }
        tracing::debug!("[MOCK] extCmd({}, {})", cmd, param);
        0
    }
}
