//! Runtime process state.
//!
//! [`ProcessState`] is the persisted record describing the current
//! holding/incubation run. It is owned exclusively by the
//! [`AppService`](crate::app::service::AppService) and mutated only through
//! its operations; every collaborator receives an explicit handle — there
//! are no ambient globals.
//!
//! Custom override fields use `Option<f32>` (`None` = unset) rather than
//! NaN sentinels; the NVS record converts at the storage boundary.

use crate::profiles::DEFAULT_PROFILE_ID;

// ---------------------------------------------------------------------------
// Control / process modes
// ---------------------------------------------------------------------------

/// Whether automatic lamp/turn control applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ControlMode {
    Unmanaged = 0,
    Managed = 1,
}

impl ControlMode {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Unmanaged),
            1 => Some(Self::Managed),
            _ => None,
        }
    }
}

/// Current phase of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProcessType {
    None = 0,
    EggHolding = 1,
    Incubation = 2,
}

impl ProcessType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::EggHolding),
            2 => Some(Self::Incubation),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ProcessState
// ---------------------------------------------------------------------------

/// The persisted record for one holding/incubation run.
///
/// Invariants (enforced by the service operations and the storage
/// boundary): `active` implies `process_type != None`; `profile_id` always
/// resolves in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessState {
    /// A process is currently running.
    pub active: bool,

    pub control_mode: ControlMode,
    pub process_type: ProcessType,

    /// Catalog row id, or [`CUSTOM_PROFILE_ID`](crate::profiles::CUSTOM_PROFILE_ID).
    pub profile_id: u8,

    /// Wall-clock seconds at process start; a monotonic-uptime fallback
    /// when the clock was unset at start. 0 = no process ever started.
    pub start_epoch: u64,
    /// Nominal "day N" the process was started at.
    pub start_day: u16,
    /// Derived: `start_day + floor(elapsed / 86400)` once the clock is set.
    pub current_day: u16,

    /// Wall-clock seconds of the last egg turn. 0 = never turned this run.
    pub last_turn_epoch: u64,

    // Custom overrides — consulted only while `profile_id` is the Custom
    // sentinel.
    pub custom_min_f: Option<f32>,
    pub custom_max_f: Option<f32>,
    pub custom_hum_min: Option<f32>,
    pub custom_hum_max: Option<f32>,
    /// 0 = unlimited.
    pub custom_total_days: u16,
    /// 0 = turning disabled.
    pub custom_turns_per_day: u8,
}

impl Default for ProcessState {
    fn default() -> Self {
        Self {
            active: false,
            control_mode: ControlMode::Unmanaged,
            process_type: ProcessType::None,
            profile_id: DEFAULT_PROFILE_ID,
            start_epoch: 0,
            start_day: 1,
            current_day: 0,
            last_turn_epoch: 0,
            custom_min_f: None,
            custom_max_f: None,
            custom_hum_min: None,
            custom_hum_max: None,
            custom_total_days: 0,
            custom_turns_per_day: 0,
        }
    }
}

impl ProcessState {
    /// Whether the Custom sentinel profile is selected.
    pub fn is_custom(&self) -> bool {
        self.profile_id == crate::profiles::CUSTOM_PROFILE_ID
    }

    /// Whether a process is running (active with a real phase).
    pub fn is_running(&self) -> bool {
        self.active && self.process_type != ProcessType::None
    }
}

// ---------------------------------------------------------------------------
// Active targets
// ---------------------------------------------------------------------------

/// The currently effective comfort band, resolved from the selected
/// profile + process type, or from the custom overrides. `None` fields
/// mean "no target — make no lamp decision".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActiveTargets {
    pub temp_min_f: Option<f32>,
    pub temp_max_f: Option<f32>,
    pub hum_min: Option<f32>,
    pub hum_max: Option<f32>,
}

impl ActiveTargets {
    pub const UNSET: Self = Self {
        temp_min_f: None,
        temp_max_f: None,
        hum_min: None,
        hum_max: None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_compiled_in_record() {
        let s = ProcessState::default();
        assert!(!s.active);
        assert_eq!(s.control_mode, ControlMode::Unmanaged);
        assert_eq!(s.process_type, ProcessType::None);
        assert_eq!(s.profile_id, DEFAULT_PROFILE_ID);
        assert_eq!(s.start_day, 1);
        assert_eq!(s.current_day, 0);
        assert_eq!(s.last_turn_epoch, 0);
        assert!(s.custom_min_f.is_none());
        assert_eq!(s.custom_turns_per_day, 0);
    }

    #[test]
    fn default_state_is_not_running() {
        assert!(!ProcessState::default().is_running());
    }

    #[test]
    fn mode_and_type_round_trip_through_u8() {
        for m in [ControlMode::Unmanaged, ControlMode::Managed] {
            assert_eq!(ControlMode::from_u8(m as u8), Some(m));
        }
        for t in [ProcessType::None, ProcessType::EggHolding, ProcessType::Incubation] {
            assert_eq!(ProcessType::from_u8(t as u8), Some(t));
        }
        assert_eq!(ControlMode::from_u8(2), None);
        assert_eq!(ProcessType::from_u8(3), None);
    }
}
