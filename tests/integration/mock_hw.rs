//! Mock port implementations for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO.

use broodbox::app::events::AppEvent;
use broodbox::app::ports::{
    ClockPort, EventSink, LampPort, MotorStatus, SensorPort, StatePort, StorageError, TurnerPort,
};
use broodbox::process::ProcessState;
use broodbox::sensors::{f_to_c, SensorReading};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    SetTurnsPerDay(u32),
    TurnOnce,
    SetLamp(bool),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    /// What the next `SensorPort::read` returns.
    pub reading: Option<SensorReading>,
    pub turns_per_day: u32,
    pub turn_count: u32,
    pub lamp: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            reading: None,
            turns_per_day: 0,
            turn_count: 0,
            lamp: false,
        }
    }

    pub fn last_rate_call(&self) -> Option<u32> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::SetTurnsPerDay(n) => Some(*n),
            _ => None,
        })
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self) -> Option<SensorReading> {
        self.reading
    }
}

impl TurnerPort for MockHardware {
    fn set_turns_per_day(&mut self, turns: u32) {
        self.turns_per_day = turns;
        self.calls.push(ActuatorCall::SetTurnsPerDay(turns));
    }

    fn turn_once(&mut self) {
        self.turn_count += 1;
        self.calls.push(ActuatorCall::TurnOnce);
    }

    fn motor_status(&self) -> MotorStatus {
        MotorStatus {
            turns_per_day: self.turns_per_day,
            ..MotorStatus::default()
        }
    }
}

impl LampPort for MockHardware {
    fn set_lamp(&mut self, on: bool) {
        self.lamp = on;
        self.calls.push(ActuatorCall::SetLamp(on));
    }

    fn lamp_is_on(&self) -> bool {
        self.lamp
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    /// `None` = wall clock not set.
    pub epoch: Option<u64>,
    pub uptime: u64,
}

#[allow(dead_code)]
impl MockClock {
    pub fn unset() -> Self {
        Self {
            epoch: None,
            uptime: 0,
        }
    }

    pub fn at(epoch: u64) -> Self {
        Self {
            epoch: Some(epoch),
            uptime: 60,
        }
    }
}

impl ClockPort for MockClock {
    fn now_epoch(&self) -> Option<u64> {
        self.epoch
    }

    fn uptime_secs(&self) -> u64 {
        self.uptime
    }
}

// ── MockStore ─────────────────────────────────────────────────

pub struct MockStore {
    pub last: Option<ProcessState>,
    pub save_count: u32,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self {
            last: None,
            save_count: 0,
            fail_writes: false,
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatePort for MockStore {
    fn load(&self) -> Result<Option<ProcessState>, StorageError> {
        Ok(self.last.clone())
    }

    fn save(&mut self, state: &ProcessState) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.save_count += 1;
        self.last = Some(state.clone());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<String>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.contains(needle))
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(format!("{:?}", event));
    }
}

// ── Reading helpers ───────────────────────────────────────────

/// A valid reading with the given temperature (°F, exact) at 50 %RH.
#[allow(dead_code)]
pub fn reading_f(temp_f: f32) -> SensorReading {
    let mut r = SensorReading::from_raw(f_to_c(temp_f), 50.0);
    // from_raw round-trips through °C; pin the value the tests compare.
    r.temp_f = temp_f;
    r
}
