//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the DHT sensor, the egg-turner stepper, and the lamp relay,
//! exposing them through [`SensorPort`], [`TurnerPort`] and [`LampPort`].
//! This is the only module that hands wall-clock/uptime values to the
//! mechanical drivers; on non-espidf targets the underlying drivers use
//! cfg-gated simulation backends.

use crate::app::ports::{ClockPort, LampPort, MotorStatus, SensorPort, TurnerPort};
use crate::drivers::relay::LampRelay;
use crate::drivers::stepper::StepperDriver;
use crate::sensors::dht::DhtSensor;
use crate::sensors::SensorReading;

use super::time::Esp32Clock;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    dht: DhtSensor,
    stepper: StepperDriver,
    relay: LampRelay,
    clock: Esp32Clock,
}

impl HardwareAdapter {
    pub fn new(dht: DhtSensor, stepper: StepperDriver, relay: LampRelay, clock: Esp32Clock) -> Self {
        Self {
            dht,
            stepper,
            relay,
            clock,
        }
    }

    /// Timestamp for the mechanical drivers: wall clock once set, uptime
    /// fallback before that (same convention as the process record).
    fn now_secs(&self) -> u64 {
        self.clock
            .now_epoch()
            .unwrap_or_else(|| self.clock.uptime_secs())
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read(&mut self) -> Option<SensorReading> {
        self.dht.read()
    }
}

// ── TurnerPort implementation ─────────────────────────────────

impl TurnerPort for HardwareAdapter {
    fn set_turns_per_day(&mut self, turns: u32) {
        self.stepper.set_turns_per_day(turns);
    }

    fn turn_once(&mut self) {
        let now = self.now_secs();
        self.stepper.turn_once(now);
    }

    fn motor_status(&self) -> MotorStatus {
        self.stepper.status(self.now_secs())
    }
}

// ── LampPort implementation ───────────────────────────────────

impl LampPort for HardwareAdapter {
    fn set_lamp(&mut self, on: bool) {
        self.relay.set(on);
    }

    fn lamp_is_on(&self) -> bool {
        self.relay.is_on()
    }
}
