//! Outbound application events and the status snapshot.
//!
//! The [`AppService`](super::service::AppService) emits [`AppEvent`]s
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on
//! the other side decide what to do with them — log to serial, push over
//! the WebSocket feed, etc.

use serde::Serialize;

use crate::process::ProcessType;

use super::ports::MotorStatus;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A holding or incubation run started.
    ProcessStarted {
        process_type: ProcessType,
        profile_id: u8,
        start_day: u16,
    },

    /// The run was cancelled and state returned to defaults.
    ProcessCancelled,

    /// A holding run moved into incubation.
    ProcessTransitioned,

    /// Incubation reached its total-days limit and auto-completed.
    ProcessCompleted { day: u16 },

    /// The eggs were turned.
    EggsTurned { epoch: u64 },

    /// The lamp-desired flag changed.
    LampChanged { on: bool },

    /// Custom profile overrides were installed.
    CustomProfileUpdated,

    /// Process state was reset to compiled-in defaults.
    StateReset,

    /// Periodic status snapshot for the push feed.
    Status(StatusReport),
}

/// A point-in-time snapshot of the whole controller, shaped for the
/// JSON status feed (`None` floats serialize as `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    // -- Process --
    pub active: bool,
    pub control_mode: u8,
    pub process_type: u8,
    pub profile_id: u8,
    pub start_epoch: u64,
    pub start_day: u16,
    pub day: u16,
    pub last_turn_epoch: u64,

    // -- Custom overrides (meaningful while profile_id is Custom) --
    pub custom_min_f: Option<f32>,
    pub custom_max_f: Option<f32>,
    pub custom_hum_min: Option<f32>,
    pub custom_hum_max: Option<f32>,
    pub custom_total_days: u16,
    pub custom_turns_per_day: u8,

    // -- Climate --
    pub temp_f: Option<f32>,
    pub temp_c: Option<f32>,
    pub rh: Option<f32>,
    pub ah: Option<f32>,
    pub dew_f: Option<f32>,
    pub heat_f: Option<f32>,

    // -- Active targets --
    pub tmin: Option<f32>,
    pub tmax: Option<f32>,
    pub hmin: Option<f32>,
    pub hmax: Option<f32>,

    // -- Actuators --
    pub lamp: bool,
    pub motor_position: u32,
    pub motor_phase: f32,
    pub motor_last_turn: u64,
    pub motor_turns_per_day: u32,
    pub motor_seconds_until_next: u32,
}

impl StatusReport {
    pub(crate) fn with_motor(mut self, motor: MotorStatus) -> Self {
        self.motor_position = motor.absolute_position;
        self.motor_phase = motor.rotation_phase;
        self.motor_last_turn = motor.last_turn_epoch;
        self.motor_turns_per_day = motor.turns_per_day;
        self.motor_seconds_until_next = motor.seconds_until_next_turn;
        self
    }
}
