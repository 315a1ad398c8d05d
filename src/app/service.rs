//! Application service — the process/control state machine.
//!
//! [`AppService`] owns the [`ProcessState`] and drives its whole
//! lifecycle: start/cancel/transition, day counting, auto-completion,
//! the egg-turning schedule, and the lamp decision. All I/O flows
//! through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!  ClockPort  ──▶ │        AppService        │ ──▶ TurnerPort
//!                 │  ProcessState · Targets  │ ──▶ LampPort
//!                 └────────────┬─────────────┘
//!                              └──────────────▶ StatePort
//! ```
//!
//! State machine over `(active, process_type)`:
//!
//! ```text
//!  IDLE ──start(Holding)──▶ HOLDING ──transition──▶ INCUBATING
//!    │                         │                        │
//!    └──────start(Incubation)──┼────────────────────────┤
//!    ▲                         │                        │
//!    └──────── cancel ─────────┴──── cancel / days-up ──┘
//! ```

use log::{info, warn};

use crate::process::{ActiveTargets, ControlMode, ProcessState, ProcessType};
use crate::profiles::{self, EggProfile};
use crate::sensors::SensorReading;

use super::commands::{AppCommand, CommandError, CustomProfile};
use super::events::{AppEvent, StatusReport};
use super::ports::{
    ClockPort, EventSink, LampPort, MotorStatus, SensorPort, StatePort, TurnerPort,
};

/// Seconds per nominal process day.
const SECS_PER_DAY: u64 = 86_400;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    state: ProcessState,
    /// Cached comfort band, recomputed on every relevant mutation.
    targets: ActiveTargets,
    /// The single lamp-desired flag (hysteresis memory).
    lamp_on: bool,
    /// Latest sensor snapshot seen by `tick`.
    last_reading: Option<SensorReading>,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from the restored state (or defaults on
    /// first boot). Call [`startup_sync`](Self::startup_sync) next so the
    /// actuators match the restored record.
    pub fn new(restored: Option<ProcessState>) -> Self {
        let state = restored.unwrap_or_default();
        if state.active {
            info!(
                "resuming {:?} run: profile={} day={}",
                state.process_type, state.profile_id, state.current_day
            );
        }
        let targets = Self::resolve_targets(&state);
        Self {
            state,
            targets,
            lamp_on: false,
            last_reading: None,
            tick_count: 0,
        }
    }

    /// Re-assert actuator configuration after boot: turn rate from the
    /// restored state, lamp released until the first managed tick.
    pub fn startup_sync(&mut self, hw: &mut (impl TurnerPort + LampPort)) {
        hw.set_turns_per_day(u32::from(self.resolved_turns_per_day()));
        hw.set_lamp(false);
        self.lamp_on = false;
    }

    // ── Command dispatch ──────────────────────────────────────

    /// Process one external command to completion.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut (impl TurnerPort + LampPort),
        clock: &impl ClockPort,
        store: &mut impl StatePort,
        sink: &mut impl EventSink,
    ) -> Result<(), CommandError> {
        match cmd {
            AppCommand::StartProcess {
                process_type,
                profile_id,
                start_day,
            } => self.start_process(process_type, profile_id, start_day, hw, clock, store, sink),
            AppCommand::CancelProcess => {
                self.cancel_process(hw, store, sink);
                Ok(())
            }
            AppCommand::TransitionProcess => self.transition_process(hw, store, sink),
            AppCommand::SetCustomProfile(custom) => self.set_custom_profile(custom, store, sink),
            AppCommand::ResetState => {
                self.reset_state(hw, store, sink);
                Ok(())
            }
        }
    }

    // ── Lifecycle transitions ─────────────────────────────────

    /// Start a holding or incubation run.
    ///
    /// Pure validation first — on rejection nothing is mutated.
    pub fn start_process(
        &mut self,
        process_type: ProcessType,
        profile_id: u8,
        start_day: u16,
        hw: &mut impl TurnerPort,
        clock: &impl ClockPort,
        store: &mut impl StatePort,
        sink: &mut impl EventSink,
    ) -> Result<(), CommandError> {
        if process_type == ProcessType::None {
            return Err(CommandError::InvalidProcessType);
        }
        let profile =
            profiles::profile_by_id(profile_id).ok_or(CommandError::UnknownProfile(profile_id))?;
        if self.state.active {
            return Err(CommandError::AlreadyActive);
        }

        self.state.active = true;
        self.state.control_mode = ControlMode::Managed;
        self.state.process_type = process_type;
        self.state.profile_id = profile_id;
        // Wall clock when set, monotonic uptime otherwise; the uptime
        // fallback keeps day counting meaningful until NTP arrives.
        self.state.start_epoch = clock.now_epoch().unwrap_or_else(|| clock.uptime_secs());
        self.state.start_day = start_day;
        self.state.current_day = start_day;
        self.state.last_turn_epoch = 0;

        hw.set_turns_per_day(u32::from(self.turns_for(profile, process_type)));

        self.targets = Self::resolve_targets(&self.state);
        self.persist(store);

        info!(
            "process started: {:?} profile={} ({}) day={}",
            process_type, profile_id, profile.name, start_day
        );
        sink.emit(&AppEvent::ProcessStarted {
            process_type,
            profile_id,
            start_day,
        });
        Ok(())
    }

    /// Abort the current run. Always succeeds; state returns to the
    /// compiled-in defaults and is persisted.
    pub fn cancel_process(
        &mut self,
        hw: &mut (impl TurnerPort + LampPort),
        store: &mut impl StatePort,
        sink: &mut impl EventSink,
    ) {
        self.state = ProcessState::default();
        self.targets = Self::resolve_targets(&self.state);
        hw.set_turns_per_day(0);
        self.set_lamp(false, hw, sink);
        self.persist(store);

        info!("process cancelled");
        sink.emit(&AppEvent::ProcessCancelled);
    }

    /// Move a holding run into incubation.
    pub fn transition_process(
        &mut self,
        hw: &mut impl TurnerPort,
        store: &mut impl StatePort,
        sink: &mut impl EventSink,
    ) -> Result<(), CommandError> {
        if !self.state.active || self.state.process_type != ProcessType::EggHolding {
            return Err(CommandError::NotHolding);
        }

        self.state.process_type = ProcessType::Incubation;
        hw.set_turns_per_day(u32::from(self.resolved_turns_per_day()));
        self.targets = Self::resolve_targets(&self.state);
        self.persist(store);

        info!("holding -> incubation, day {}", self.state.current_day);
        sink.emit(&AppEvent::ProcessTransitioned);
        Ok(())
    }

    /// Install the custom overrides. Rejected while a run is active —
    /// changing the band mid-run would bypass the start validation.
    pub fn set_custom_profile(
        &mut self,
        custom: CustomProfile,
        store: &mut impl StatePort,
        sink: &mut impl EventSink,
    ) -> Result<(), CommandError> {
        if self.state.active {
            return Err(CommandError::AlreadyActive);
        }
        custom.validate()?;

        self.state.custom_min_f = Some(custom.temp_min_f);
        self.state.custom_max_f = Some(custom.temp_max_f);
        self.state.custom_hum_min = Some(custom.hum_min);
        self.state.custom_hum_max = Some(custom.hum_max);
        self.state.custom_total_days = custom.total_days;
        self.state.custom_turns_per_day = custom.turns_per_day;

        self.targets = Self::resolve_targets(&self.state);
        self.persist(store);

        sink.emit(&AppEvent::CustomProfileUpdated);
        Ok(())
    }

    /// Clear everything back to compiled-in defaults and persist.
    pub fn reset_state(
        &mut self,
        hw: &mut (impl TurnerPort + LampPort),
        store: &mut impl StatePort,
        sink: &mut impl EventSink,
    ) {
        self.state = ProcessState::default();
        self.targets = Self::resolve_targets(&self.state);
        hw.set_turns_per_day(0);
        self.set_lamp(false, hw, sink);
        self.persist(store);

        info!("process state reset to defaults");
        sink.emit(&AppEvent::StateReset);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: read the sensor, advance the day counter,
    /// auto-complete finished incubations, turn eggs when due, and apply
    /// the lamp hysteresis.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + TurnerPort + LampPort),
        clock: &impl ClockPort,
        store: &mut impl StatePort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        self.last_reading = hw.read();

        if !self.state.active {
            return;
        }

        let now = clock.now_epoch();

        // Day counter — only once the wall clock is trustworthy.
        if let Some(now) = now {
            if self.state.start_epoch != 0 {
                let elapsed = now.saturating_sub(self.state.start_epoch);
                self.state.current_day = self
                    .state
                    .start_day
                    .saturating_add((elapsed / SECS_PER_DAY) as u16);
            }
        }

        // Auto-complete a finished incubation.
        if self.state.process_type == ProcessType::Incubation {
            if let Some(profile) = profiles::profile_by_id(self.state.profile_id) {
                let total_days = if self.state.is_custom() {
                    self.state.custom_total_days
                } else {
                    profile.inc_total_days
                };
                if total_days > 0 && self.state.current_day >= total_days {
                    self.state.active = false;
                    self.state.process_type = ProcessType::None;
                    hw.set_turns_per_day(0);
                    self.set_lamp(false, hw, sink);
                    self.persist(store);

                    info!("incubation complete at day {}", self.state.current_day);
                    sink.emit(&AppEvent::ProcessCompleted {
                        day: self.state.current_day,
                    });
                    return;
                }
            }
        }

        // Egg turning.
        if self.turn_due(now) {
            hw.turn_once();
            if let Some(now) = now {
                self.state.last_turn_epoch = now;
            }
            self.persist(store);
            sink.emit(&AppEvent::EggsTurned {
                epoch: self.state.last_turn_epoch,
            });

            // Guard against the rate having been changed externally.
            if self.state.is_custom() && self.state.custom_turns_per_day > 0 {
                hw.set_turns_per_day(u32::from(self.state.custom_turns_per_day));
            }
        }

        // Lamp decision.
        self.evaluate_lamp(hw, sink);
    }

    // ── Egg-turning schedule ──────────────────────────────────

    /// Whether a turn is due at `now`. Never due while inactive, without
    /// a resolvable profile, with a zero rate, or before the clock is
    /// set. Due immediately when the run has never turned.
    fn turn_due(&self, now: Option<u64>) -> bool {
        if !self.state.active {
            return false;
        }
        if profiles::profile_by_id(self.state.profile_id).is_none() {
            return false;
        }
        let turns = self.resolved_turns_per_day();
        if turns == 0 {
            return false;
        }
        let Some(now) = now else {
            return false;
        };
        if self.state.last_turn_epoch == 0 {
            return true;
        }

        let interval = SECS_PER_DAY / u64::from(turns);
        now.saturating_sub(self.state.last_turn_epoch) >= interval
    }

    /// Turn rate for the current state: the custom override behind the
    /// Custom id, otherwise the catalog row for the current phase.
    fn resolved_turns_per_day(&self) -> u8 {
        if self.state.is_custom() {
            return self.state.custom_turns_per_day;
        }
        match profiles::profile_by_id(self.state.profile_id) {
            Some(p) => self.turns_for(p, self.state.process_type),
            None => 0,
        }
    }

    fn turns_for(&self, profile: &EggProfile, process_type: ProcessType) -> u8 {
        if self.state.is_custom() && self.state.custom_turns_per_day > 0 {
            return self.state.custom_turns_per_day;
        }
        if process_type == ProcessType::Incubation {
            profile.inc_turns_per_day
        } else {
            profile.hold_turns_per_day
        }
    }

    // ── Lamp control ──────────────────────────────────────────

    /// Hysteresis over the active band: on below `tmin`, off at `tmax`
    /// and above, unchanged in between (deliberate dead band). Forced
    /// off when unmanaged or when either the reading or the targets are
    /// unavailable.
    fn evaluate_lamp(&mut self, hw: &mut impl LampPort, sink: &mut impl EventSink) {
        let desired = if self.state.control_mode != ControlMode::Managed {
            false
        } else {
            match (self.last_reading, self.targets.temp_min_f, self.targets.temp_max_f) {
                (Some(reading), Some(tmin), Some(tmax)) => {
                    let mut on = self.lamp_on;
                    if reading.temp_f < tmin {
                        on = true;
                    } else if reading.temp_f >= tmax {
                        on = false;
                    }
                    on
                }
                _ => false,
            }
        };
        self.set_lamp(desired, hw, sink);
    }

    fn set_lamp(&mut self, on: bool, hw: &mut impl LampPort, sink: &mut impl EventSink) {
        if on != self.lamp_on {
            sink.emit(&AppEvent::LampChanged { on });
        }
        self.lamp_on = on;
        hw.set_lamp(on);
    }

    // ── Target resolution ─────────────────────────────────────

    fn resolve_targets(state: &ProcessState) -> ActiveTargets {
        if state.is_custom() {
            return ActiveTargets {
                temp_min_f: state.custom_min_f,
                temp_max_f: state.custom_max_f,
                hum_min: state.custom_hum_min,
                hum_max: state.custom_hum_max,
            };
        }
        let Some(p) = profiles::profile_by_id(state.profile_id) else {
            return ActiveTargets::UNSET;
        };
        if state.process_type == ProcessType::Incubation {
            ActiveTargets {
                temp_min_f: Some(p.inc_temp_min_f),
                temp_max_f: Some(p.inc_temp_max_f),
                hum_min: Some(p.inc_hum_min),
                hum_max: Some(p.inc_hum_max),
            }
        } else {
            ActiveTargets {
                temp_min_f: Some(p.hold_temp_min_f),
                temp_max_f: Some(p.hold_temp_max_f),
                hum_min: Some(p.hold_hum_min),
                hum_max: Some(p.hold_hum_max),
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn process(&self) -> &ProcessState {
        &self.state
    }

    /// The currently effective comfort band.
    pub fn targets(&self) -> ActiveTargets {
        self.targets
    }

    /// The lamp-desired flag.
    pub fn lamp_on(&self) -> bool {
        self.lamp_on
    }

    pub fn last_reading(&self) -> Option<SensorReading> {
        self.last_reading
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Build the full status snapshot for the presentation layer.
    pub fn status(&self, motor: MotorStatus) -> StatusReport {
        let r = self.last_reading;
        StatusReport {
            active: self.state.active,
            control_mode: self.state.control_mode as u8,
            process_type: self.state.process_type as u8,
            profile_id: self.state.profile_id,
            start_epoch: self.state.start_epoch,
            start_day: self.state.start_day,
            day: self.state.current_day,
            last_turn_epoch: self.state.last_turn_epoch,

            custom_min_f: self.state.custom_min_f,
            custom_max_f: self.state.custom_max_f,
            custom_hum_min: self.state.custom_hum_min,
            custom_hum_max: self.state.custom_hum_max,
            custom_total_days: self.state.custom_total_days,
            custom_turns_per_day: self.state.custom_turns_per_day,

            temp_f: r.map(|r| r.temp_f),
            temp_c: r.map(|r| r.temp_c),
            rh: r.map(|r| r.humidity),
            ah: r.map(|r| r.abs_humidity),
            dew_f: r.map(|r| r.dew_point_f),
            heat_f: r.map(|r| r.heat_index_f),

            tmin: self.targets.temp_min_f,
            tmax: self.targets.temp_max_f,
            hmin: self.targets.hum_min,
            hmax: self.targets.hum_max,

            lamp: self.lamp_on,
            motor_position: 0,
            motor_phase: 0.0,
            motor_last_turn: 0,
            motor_turns_per_day: 0,
            motor_seconds_until_next: 0,
        }
        .with_motor(motor)
    }

    // ── Internal ──────────────────────────────────────────────

    /// Best-effort persistence: a failed write is logged, never surfaced
    /// as an operation failure — the in-memory state stays authoritative
    /// until the next successful write.
    fn persist(&self, store: &mut impl StatePort) {
        if let Err(e) = store.save(&self.state) {
            warn!("process state save failed: {e}");
        }
    }
}
