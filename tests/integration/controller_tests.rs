//! End-to-end tests for the process/control state machine: lifecycle
//! transitions, day counting, auto-completion, the egg-turning schedule,
//! and the lamp hysteresis — all through the public port boundary.

use broodbox::app::commands::{AppCommand, CommandError, CustomProfile};
use broodbox::app::ports::TurnerPort;
use broodbox::app::service::AppService;
use broodbox::process::{ControlMode, ProcessState, ProcessType};
use broodbox::profiles::CUSTOM_PROFILE_ID;

use crate::mock_hw::{reading_f, ActuatorCall, MockClock, MockHardware, MockStore, RecordingSink};

const T0: u64 = 1_700_000_000;

fn make_rig() -> (AppService, MockHardware, MockClock, MockStore, RecordingSink) {
    (
        AppService::new(None),
        MockHardware::new(),
        MockClock::at(T0),
        MockStore::new(),
        RecordingSink::new(),
    )
}

fn start(
    app: &mut AppService,
    hw: &mut MockHardware,
    clock: &MockClock,
    store: &mut MockStore,
    sink: &mut RecordingSink,
    process_type: ProcessType,
    profile_id: u8,
    start_day: u16,
) -> Result<(), CommandError> {
    app.start_process(process_type, profile_id, start_day, hw, clock, store, sink)
}

// ── Lifecycle: start ──────────────────────────────────────────

#[test]
fn start_initializes_state_targets_and_rate() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();

    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .expect("start must succeed from idle");

    let p = app.process();
    assert!(p.active);
    assert_eq!(p.control_mode, ControlMode::Managed);
    assert_eq!(p.process_type, ProcessType::Incubation);
    assert_eq!(p.profile_id, 0);
    assert_eq!(p.start_epoch, T0);
    assert_eq!(p.current_day, 1, "currentDay == startDay after start");
    assert_eq!(p.last_turn_epoch, 0, "never turned this run");

    // Chicken incubation band + rate.
    assert_eq!(app.targets().temp_min_f, Some(98.0));
    assert_eq!(app.targets().temp_max_f, Some(100.5));
    assert_eq!(hw.last_rate_call(), Some(4));

    assert_eq!(store.save_count, 1, "start persists once");
    assert!(sink.contains("ProcessStarted"));
}

#[test]
fn start_holding_uses_holding_band_and_rate() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();

    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::EggHolding, 0, 1)
        .unwrap();

    assert_eq!(app.targets().temp_min_f, Some(55.0));
    assert_eq!(app.targets().temp_max_f, Some(65.0));
    assert_eq!(hw.last_rate_call(), Some(2));
}

#[test]
fn start_rejected_while_active_leaves_state_unchanged() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .unwrap();
    let before = app.process().clone();
    let saves = store.save_count;

    let err = start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::EggHolding, 3, 5)
        .unwrap_err();

    assert_eq!(err, CommandError::AlreadyActive);
    assert_eq!(app.process(), &before, "rejection must not mutate");
    assert_eq!(store.save_count, saves, "rejection must not persist");
}

#[test]
fn start_rejected_for_unknown_profile() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();

    let err = start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 99, 1)
        .unwrap_err();

    assert_eq!(err, CommandError::UnknownProfile(99));
    assert_eq!(app.process(), &ProcessState::default());
    assert!(hw.calls.is_empty(), "no actuator touched on rejection");
}

#[test]
fn start_rejected_for_none_process_type() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();

    let err = start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::None, 0, 1)
        .unwrap_err();
    assert_eq!(err, CommandError::InvalidProcessType);
}

#[test]
fn start_with_unset_clock_falls_back_to_uptime() {
    let (mut app, mut hw, _, mut store, mut sink) = make_rig();
    let clock = MockClock {
        epoch: None,
        uptime: 777,
    };

    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .unwrap();

    assert_eq!(app.process().start_epoch, 777);
}

// ── Lifecycle: cancel / reset ─────────────────────────────────

#[test]
fn cancel_returns_exactly_to_defaults() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 4, 2)
        .unwrap();

    app.cancel_process(&mut hw, &mut store, &mut sink);

    assert_eq!(app.process(), &ProcessState::default());
    assert_eq!(store.last.as_ref(), Some(&ProcessState::default()));
    assert_eq!(hw.last_rate_call(), Some(0), "turn rate cleared");
    assert!(!hw.lamp, "lamp forced off on cancel");
    assert!(sink.contains("ProcessCancelled"));
}

#[test]
fn reset_clears_custom_overrides() {
    let (mut app, mut hw, _clock, mut store, mut sink) = make_rig();
    let custom = CustomProfile {
        temp_min_f: 96.0,
        temp_max_f: 98.0,
        hum_min: 40.0,
        hum_max: 60.0,
        total_days: 30,
        turns_per_day: 6,
    };
    app.set_custom_profile(custom, &mut store, &mut sink).unwrap();
    assert_eq!(app.process().custom_turns_per_day, 6);

    app.reset_state(&mut hw, &mut store, &mut sink);

    assert_eq!(app.process(), &ProcessState::default());
    assert!(sink.contains("StateReset"));
}

// ── Lifecycle: transition ─────────────────────────────────────

#[test]
fn transition_requires_active_holding() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();

    // From idle.
    assert_eq!(
        app.transition_process(&mut hw, &mut store, &mut sink),
        Err(CommandError::NotHolding)
    );

    // From incubation.
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .unwrap();
    assert_eq!(
        app.transition_process(&mut hw, &mut store, &mut sink),
        Err(CommandError::NotHolding)
    );
}

#[test]
fn transition_moves_holding_to_incubation() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::EggHolding, 0, 1)
        .unwrap();
    assert_eq!(hw.last_rate_call(), Some(2));

    app.transition_process(&mut hw, &mut store, &mut sink)
        .expect("transition from holding must succeed");

    assert_eq!(app.process().process_type, ProcessType::Incubation);
    assert_eq!(app.targets().temp_min_f, Some(98.0), "targets now incubation");
    assert_eq!(hw.last_rate_call(), Some(4), "rate now incubation");
    assert!(sink.contains("ProcessTransitioned"));
}

// ── Tick: day counter & auto-completion ───────────────────────

#[test]
fn current_day_follows_elapsed_wall_clock() {
    let (mut app, mut hw, mut clock, mut store, mut sink) = make_rig();
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::EggHolding, 0, 1)
        .unwrap();

    clock.epoch = Some(T0 + 2 * 86_400 + 1);
    app.tick(&mut hw, &clock, &mut store, &mut sink);

    assert_eq!(app.process().current_day, 3, "startDay + 2 full days");
}

#[test]
fn current_day_frozen_while_clock_unset() {
    let (mut app, mut hw, _, mut store, mut sink) = make_rig();
    let clock = MockClock {
        epoch: None,
        uptime: 500,
    };
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::EggHolding, 0, 2)
        .unwrap();

    app.tick(&mut hw, &clock, &mut store, &mut sink);

    assert_eq!(app.process().current_day, 2, "stays at startDay");
}

#[test]
fn incubation_auto_completes_at_total_days() {
    let (mut app, mut hw, mut clock, mut store, mut sink) = make_rig();
    // Chicken: 21 incubation days.
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 0)
        .unwrap();

    clock.epoch = Some(T0 + 21 * 86_400);
    app.tick(&mut hw, &clock, &mut store, &mut sink);

    let p = app.process();
    assert!(!p.active);
    assert_eq!(p.process_type, ProcessType::None);
    assert!(!hw.lamp, "lamp off after completion");
    assert_eq!(hw.turn_count, 0, "completion stops the tick before turning");
    assert!(sink.contains("ProcessCompleted"));
    assert_eq!(store.last.as_ref().map(|s| s.active), Some(false));
}

#[test]
fn holding_never_auto_completes() {
    let (mut app, mut hw, mut clock, mut store, mut sink) = make_rig();
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::EggHolding, 0, 0)
        .unwrap();

    clock.epoch = Some(T0 + 100 * 86_400);
    app.tick(&mut hw, &clock, &mut store, &mut sink);

    assert!(app.process().active, "holding has no day limit");
}

// ── Tick: egg turning ─────────────────────────────────────────

#[test]
fn first_turn_is_due_immediately() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .unwrap();

    app.tick(&mut hw, &clock, &mut store, &mut sink);

    assert_eq!(hw.turn_count, 1);
    assert_eq!(app.process().last_turn_epoch, T0);
    assert!(sink.contains("EggsTurned"));
}

#[test]
fn turn_interval_boundary_is_exact() {
    let (mut app, mut hw, mut clock, mut store, mut sink) = make_rig();
    // Chicken incubation: 4 turns/day = every 21600 s.
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .unwrap();
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert_eq!(hw.turn_count, 1);

    clock.epoch = Some(T0 + 21_599);
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert_eq!(hw.turn_count, 1, "21599s elapsed: not yet due");

    clock.epoch = Some(T0 + 21_601);
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert_eq!(hw.turn_count, 2, "21601s elapsed: due");
    assert_eq!(app.process().last_turn_epoch, T0 + 21_601);
}

#[test]
fn no_turn_while_clock_unset() {
    let (mut app, mut hw, _, mut store, mut sink) = make_rig();
    let clock = MockClock {
        epoch: None,
        uptime: 100,
    };
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .unwrap();

    app.tick(&mut hw, &clock, &mut store, &mut sink);

    assert_eq!(hw.turn_count, 0, "turning needs a trustworthy clock");
}

#[test]
fn no_tick_work_when_inactive() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();

    app.tick(&mut hw, &clock, &mut store, &mut sink);

    assert_eq!(hw.turn_count, 0);
    assert!(hw.calls.iter().all(|c| !matches!(c, ActuatorCall::SetLamp(true))));
    assert_eq!(store.save_count, 0);
}

#[test]
fn custom_rate_reasserted_after_turn() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();
    let custom = CustomProfile {
        temp_min_f: 96.0,
        temp_max_f: 98.0,
        hum_min: 40.0,
        hum_max: 60.0,
        total_days: 0,
        turns_per_day: 6,
    };
    app.set_custom_profile(custom, &mut store, &mut sink).unwrap();
    start(
        &mut app, &mut hw, &clock, &mut store, &mut sink,
        ProcessType::Incubation, CUSTOM_PROFILE_ID, 1,
    )
    .unwrap();

    // Simulate something external clobbering the rate.
    hw.turns_per_day = 1;
    app.tick(&mut hw, &clock, &mut store, &mut sink);

    assert_eq!(hw.turn_count, 1);
    assert_eq!(hw.turns_per_day, 6, "custom rate re-asserted after turning");
}

// ── Tick: lamp hysteresis ─────────────────────────────────────

#[test]
fn lamp_hysteresis_dead_band() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();
    // Chicken incubation band: 98.0–100.5 °F.
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .unwrap();

    hw.reading = Some(reading_f(97.9));
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert!(app.lamp_on(), "below tmin: lamp on");

    hw.reading = Some(reading_f(99.0));
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert!(app.lamp_on(), "inside band: unchanged (stays on)");

    hw.reading = Some(reading_f(100.5));
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert!(!app.lamp_on(), "at tmax: lamp off");

    hw.reading = Some(reading_f(99.0));
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert!(!app.lamp_on(), "inside band: unchanged (stays off)");

    hw.reading = Some(reading_f(97.9));
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert!(app.lamp_on(), "below tmin again: back on");
}

#[test]
fn lamp_forced_off_on_invalid_reading() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .unwrap();

    hw.reading = Some(reading_f(90.0));
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert!(app.lamp_on());

    hw.reading = None;
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert!(!app.lamp_on(), "no reading: no lamp decision, forced off");
}

#[test]
fn lamp_forced_off_when_unmanaged() {
    let restored = ProcessState {
        active: true,
        control_mode: ControlMode::Unmanaged,
        process_type: ProcessType::Incubation,
        start_epoch: T0,
        ..ProcessState::default()
    };
    let mut app = AppService::new(Some(restored));
    let mut hw = MockHardware::new();
    let clock = MockClock::at(T0);
    let mut store = MockStore::new();
    let mut sink = RecordingSink::new();

    hw.reading = Some(reading_f(50.0)); // Freezing — but unmanaged.
    app.tick(&mut hw, &clock, &mut store, &mut sink);

    assert!(!app.lamp_on(), "unmanaged mode never drives the lamp");
}

#[test]
fn lamp_forced_off_when_custom_targets_unset() {
    let restored = ProcessState {
        active: true,
        control_mode: ControlMode::Managed,
        process_type: ProcessType::Incubation,
        profile_id: CUSTOM_PROFILE_ID,
        start_epoch: T0,
        custom_turns_per_day: 0,
        ..ProcessState::default()
    };
    let mut app = AppService::new(Some(restored));
    let mut hw = MockHardware::new();
    let clock = MockClock::at(T0);
    let mut store = MockStore::new();
    let mut sink = RecordingSink::new();

    hw.reading = Some(reading_f(50.0));
    app.tick(&mut hw, &clock, &mut store, &mut sink);

    assert!(!app.lamp_on(), "unset custom targets: no lamp decision");
}

// ── Custom profile end-to-end ─────────────────────────────────

#[test]
fn custom_profile_drives_targets_rate_and_completion() {
    let (mut app, mut hw, mut clock, mut store, mut sink) = make_rig();
    let custom = CustomProfile {
        temp_min_f: 96.0,
        temp_max_f: 98.0,
        hum_min: 40.0,
        hum_max: 60.0,
        total_days: 3,
        turns_per_day: 6,
    };
    app.set_custom_profile(custom, &mut store, &mut sink).unwrap();
    start(
        &mut app, &mut hw, &clock, &mut store, &mut sink,
        ProcessType::Incubation, CUSTOM_PROFILE_ID, 0,
    )
    .unwrap();

    assert_eq!(app.targets().temp_min_f, Some(96.0));
    assert_eq!(app.targets().hum_max, Some(60.0));
    assert_eq!(hw.last_rate_call(), Some(6));

    clock.epoch = Some(T0 + 3 * 86_400);
    app.tick(&mut hw, &clock, &mut store, &mut sink);
    assert!(!app.process().active, "custom total-days limit completes the run");
}

// ── Persistence semantics ─────────────────────────────────────

#[test]
fn save_failure_never_fails_the_operation() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();
    store.fail_writes = true;

    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .expect("start succeeds even when persistence is down");
    assert!(app.process().active);
}

#[test]
fn restored_state_resumes_and_startup_sync_reasserts_rate() {
    let restored = ProcessState {
        active: true,
        control_mode: ControlMode::Managed,
        process_type: ProcessType::Incubation,
        profile_id: 0,
        start_epoch: T0,
        start_day: 1,
        current_day: 5,
        last_turn_epoch: T0 + 4 * 86_400,
        ..ProcessState::default()
    };
    let mut app = AppService::new(Some(restored));
    let mut hw = MockHardware::new();

    app.startup_sync(&mut hw);

    assert_eq!(hw.last_rate_call(), Some(4), "chicken incubation rate restored");
    assert!(!hw.lamp);
    assert!(app.process().active);
}

// ── Status / command dispatch ─────────────────────────────────

#[test]
fn status_report_reflects_process_and_motor() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();
    start(&mut app, &mut hw, &clock, &mut store, &mut sink, ProcessType::Incubation, 0, 1)
        .unwrap();
    hw.reading = Some(reading_f(99.0));
    app.tick(&mut hw, &clock, &mut store, &mut sink);

    let report = app.status(hw.motor_status());

    assert!(report.active);
    assert_eq!(report.process_type, 2);
    assert_eq!(report.day, 1);
    assert_eq!(report.temp_f, Some(99.0));
    assert_eq!(report.tmin, Some(98.0));
    assert_eq!(report.tmax, Some(100.5));
    assert_eq!(report.motor_turns_per_day, 4);
}

#[test]
fn handle_command_dispatches_full_lifecycle() {
    let (mut app, mut hw, clock, mut store, mut sink) = make_rig();

    app.handle_command(
        AppCommand::StartProcess {
            process_type: ProcessType::EggHolding,
            profile_id: 0,
            start_day: 1,
        },
        &mut hw, &clock, &mut store, &mut sink,
    )
    .unwrap();
    assert_eq!(app.process().process_type, ProcessType::EggHolding);

    app.handle_command(AppCommand::TransitionProcess, &mut hw, &clock, &mut store, &mut sink)
        .unwrap();
    assert_eq!(app.process().process_type, ProcessType::Incubation);

    app.handle_command(AppCommand::CancelProcess, &mut hw, &clock, &mut store, &mut sink)
        .unwrap();
    assert_eq!(app.process(), &ProcessState::default());
}
