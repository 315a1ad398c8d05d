//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (HTTP API,
//! serial console) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.

use crate::process::ProcessType;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Begin a holding or incubation run.
    StartProcess {
        process_type: ProcessType,
        profile_id: u8,
        start_day: u16,
    },

    /// Abort the current run and return to idle. Always succeeds.
    CancelProcess,

    /// Move a holding run into incubation.
    TransitionProcess,

    /// Install the user-supplied overrides behind the Custom profile id.
    SetCustomProfile(CustomProfile),

    /// Clear the process state back to compiled-in defaults and persist.
    ResetState,
}

/// User-supplied parameters for the Custom profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomProfile {
    pub temp_min_f: f32,
    pub temp_max_f: f32,
    pub hum_min: f32,
    pub hum_max: f32,
    /// 0 = unlimited.
    pub total_days: u16,
    /// 0 = turning disabled.
    pub turns_per_day: u8,
}

impl CustomProfile {
    /// Range-check before the values are installed. Invalid input is
    /// rejected, not clamped — a garbled request must not silently widen
    /// the comfort band.
    pub fn validate(&self) -> Result<(), CommandError> {
        if !self.temp_min_f.is_finite() || !self.temp_max_f.is_finite() {
            return Err(CommandError::InvalidCustomRange("temperature not finite"));
        }
        if !(32.0..=120.0).contains(&self.temp_min_f) || !(32.0..=120.0).contains(&self.temp_max_f)
        {
            return Err(CommandError::InvalidCustomRange("temperature must be 32–120 °F"));
        }
        if self.temp_min_f >= self.temp_max_f {
            return Err(CommandError::InvalidCustomRange("temp min must be below max"));
        }
        if !self.hum_min.is_finite() || !self.hum_max.is_finite() {
            return Err(CommandError::InvalidCustomRange("humidity not finite"));
        }
        if !(0.0..=100.0).contains(&self.hum_min) || !(0.0..=100.0).contains(&self.hum_max) {
            return Err(CommandError::InvalidCustomRange("humidity must be 0–100 %"));
        }
        if self.hum_min >= self.hum_max {
            return Err(CommandError::InvalidCustomRange("humidity min must be below max"));
        }
        if self.turns_per_day > 24 {
            return Err(CommandError::InvalidCustomRange("turns/day must be 0–24"));
        }
        Ok(())
    }
}

/// Validation rejections from lifecycle operations. The operation leaves
/// all state untouched; the caller surfaces the rejection to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// A process is already running.
    AlreadyActive,
    /// The profile id does not resolve in the catalog.
    UnknownProfile(u8),
    /// `start` was asked for the `None` process type.
    InvalidProcessType,
    /// `transition` is only valid from a holding run.
    NotHolding,
    /// A custom-profile field failed range validation.
    InvalidCustomRange(&'static str),
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AlreadyActive => write!(f, "a process is already running"),
            Self::UnknownProfile(id) => write!(f, "unknown profile id {id}"),
            Self::InvalidProcessType => write!(f, "process type must be holding or incubation"),
            Self::NotHolding => write!(f, "transition requires an active holding process"),
            Self::InvalidCustomRange(msg) => write!(f, "invalid custom profile: {msg}"),
        }
    }
}
