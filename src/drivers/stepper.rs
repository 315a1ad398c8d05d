//! Egg-turning stepper motor driver (step/dir interface).
//!
//! Executes one full rotation as a synchronous step burst — bounded and
//! short enough for the 1 Hz control loop cadence — and tracks absolute
//! position, rotation phase, the configured turn rate, and when the last
//! turn happened. It never decides *when* to turn; the application core
//! owns the schedule and calls [`StepperDriver::turn_once`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the step/dir/enable pins with busy-wait pulses.
//! On host/test: pure in-memory state, same arithmetic.

use log::info;

use crate::app::ports::MotorStatus;
use crate::drivers::{delay_us, gpio_init_output, gpio_write};

/// Wiring of one step-dir stepper driver.
#[derive(Debug, Clone, Copy)]
pub struct StepperConfig {
    pub pin_step: i32,
    pub pin_dir: i32,
    pub pin_enable: i32,
    /// Full steps for one egg-turn rotation.
    pub steps_per_turn: u32,
    /// Half-period of one step pulse (µs).
    pub step_pulse_us: u32,
    pub invert_dir: bool,
}

pub struct StepperDriver {
    config: StepperConfig,
    /// Total steps taken since init (`steps_per_turn` steps = 360°).
    absolute_position: u32,
    /// Epoch seconds of the last completed turn (0 = never).
    last_turn_epoch: u64,
    turns_per_day: u32,
}

impl StepperDriver {
    pub fn new(config: StepperConfig) -> Self {
        gpio_init_output(config.pin_step, false);
        gpio_init_output(config.pin_dir, config.invert_dir);
        // Enable is active LOW; keep the coils de-energised between turns.
        gpio_init_output(config.pin_enable, true);

        Self {
            config,
            absolute_position: 0,
            last_turn_epoch: 0,
            turns_per_day: 0,
        }
    }

    /// Energise or release the driver (enable pin is active LOW).
    pub fn enable(&mut self, on: bool) {
        gpio_write(self.config.pin_enable, !on);
    }

    /// Execute one full rotation, blocking for the step burst.
    /// `now_secs` stamps the completed turn (wall clock, or uptime while
    /// the clock is unset).
    pub fn turn_once(&mut self, now_secs: u64) {
        self.enable(true);

        for _ in 0..self.config.steps_per_turn {
            gpio_write(self.config.pin_step, true);
            delay_us(self.config.step_pulse_us);
            gpio_write(self.config.pin_step, false);
            delay_us(self.config.step_pulse_us);
        }

        self.enable(false);

        self.absolute_position = self
            .absolute_position
            .wrapping_add(self.config.steps_per_turn);
        self.last_turn_epoch = now_secs;

        info!(
            "stepper: turned once, position={} phase={:.1}°",
            self.absolute_position,
            self.phase_degrees()
        );
    }

    /// Target turn rate, set by the core from the active profile.
    pub fn set_turns_per_day(&mut self, turns: u32) {
        if turns != self.turns_per_day {
            info!("stepper: turns/day {} -> {}", self.turns_per_day, turns);
        }
        self.turns_per_day = turns;
    }

    pub fn turns_per_day(&self) -> u32 {
        self.turns_per_day
    }

    /// Current phase within one rotation, degrees 0.0–360.0.
    pub fn phase_degrees(&self) -> f32 {
        let in_rotation = self.absolute_position % self.config.steps_per_turn;
        in_rotation as f32 * 360.0 / self.config.steps_per_turn as f32
    }

    /// Mechanical status snapshot. `now_secs` uses the same time base as
    /// the `now_secs` passed to [`turn_once`].
    pub fn status(&self, now_secs: u64) -> MotorStatus {
        let seconds_until_next_turn = if self.turns_per_day > 0 && self.last_turn_epoch > 0 {
            let interval = 86_400 / u64::from(self.turns_per_day);
            let elapsed = now_secs.saturating_sub(self.last_turn_epoch);
            interval.saturating_sub(elapsed) as u32 // 0 = overdue
        } else {
            0
        };

        MotorStatus {
            absolute_position: self.absolute_position,
            rotation_phase: self.phase_degrees(),
            last_turn_epoch: self.last_turn_epoch,
            turns_per_day: self.turns_per_day,
            seconds_until_next_turn,
        }
    }
}
