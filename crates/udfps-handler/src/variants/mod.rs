//! Handlers, one per hardware revision
//!
//! | Variant         | Touch ioctl | Display ioctl | Sysfs flags | Watcher |
//! |-----------------|-------------|---------------|-------------|---------|
//! | `disp-feature`  | yes         | yes           | no          | no      |
//! | `sysfs-fod`     | no          | no            | yes         | no      |
//! | `press-watcher` | yes         | no            | yes         | yes     |
//! | `touch-hbm`     | yes         | yes           | no          | no      |

mod disp_feature;
mod press_watcher;
mod sysfs_fod;
mod touch_hbm;

pub use disp_feature::DispFeatureHandler;
pub use press_watcher::PressWatcherHandler;
pub use sysfs_fod::SysfsFodHandler;
pub use touch_hbm::TouchHbmHandler;
