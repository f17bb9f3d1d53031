//! Acquisition result codes
//!
//! Numbering follows the biometrics `AcquiredInfo` interface.

/// Frame quality reported by the fingerprint HAL for each capture
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquiredInfo {
    Unknown = 0,
    Good = 1,
    Partial = 2,
    Insufficient = 3,
    SensorDirty = 4,
    TooSlow = 5,
    TooFast = 6,
    Vendor = 7,
    Start = 8,
    TooDark = 9,
    TooBright = 10,
    Immobile = 11,
    RetryingCapture = 12,
    LiftTooSoon = 13,
    PowerPress = 14,
    ReEnroll = 15,
}

impl AcquiredInfo {
    pub fn all() -> &'static [AcquiredInfo] {
        &[
            AcquiredInfo::Unknown,
            AcquiredInfo::Good,
            AcquiredInfo::Partial,
            AcquiredInfo::Insufficient,
            AcquiredInfo::SensorDirty,
            AcquiredInfo::TooSlow,
            AcquiredInfo::TooFast,
            AcquiredInfo::Vendor,
            AcquiredInfo::Start,
            AcquiredInfo::TooDark,
            AcquiredInfo::TooBright,
            AcquiredInfo::Immobile,
            AcquiredInfo::RetryingCapture,
            AcquiredInfo::LiftTooSoon,
            AcquiredInfo::PowerPress,
            AcquiredInfo::ReEnroll,
        ]
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::all().iter().copied().find(|info| info.code() == code)
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    /// Whether the sensor is done with this touch and the illumination can
    /// be dropped. Everything else means the sensor is still settling.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AcquiredInfo::Good
                | AcquiredInfo::Partial
                | AcquiredInfo::Insufficient
                | AcquiredInfo::SensorDirty
                | AcquiredInfo::TooSlow
                | AcquiredInfo::TooFast
                | AcquiredInfo::TooDark
                | AcquiredInfo::TooBright
                | AcquiredInfo::Immobile
                | AcquiredInfo::LiftTooSoon
        )
    }
}

/// Terminal check on a raw code; unknown codes are never terminal
pub fn is_terminal(code: i32) -> bool {
    AcquiredInfo::from_code(code).is_some_and(AcquiredInfo::is_terminal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        for info in AcquiredInfo::all() {
            assert_eq!(AcquiredInfo::from_code(info.code()), Some(*info));
        }
        assert_eq!(AcquiredInfo::from_code(-1), None);
        assert_eq!(AcquiredInfo::from_code(16), None);
    }

    #[test]
    fn test_terminal_allow_list() {
        let terminal: Vec<i32> = AcquiredInfo::all()
            .iter()
            .filter(|info| info.is_terminal())
            .map(|info| info.code())
            .collect();
        assert_eq!(terminal, vec![1, 2, 3, 4, 5, 6, 9, 10, 11, 13]);
    }

    #[test]
    fn test_raw_codes() {
        assert!(is_terminal(1));
        assert!(!is_terminal(AcquiredInfo::Vendor.code()));
        assert!(!is_terminal(AcquiredInfo::Start.code()));
        assert!(!is_terminal(1000));
        assert!(!is_terminal(i32::MIN));
    }
}
