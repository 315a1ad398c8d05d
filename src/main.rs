//! BroodBox Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    LogEventSink    NvsStateStore   Esp32Clock │
//! │  (DHT+Turner+Lamp)  (EventSink)     (StatePort)     (ClockPort)│
//! │  WifiAdapter        WebServer (HTTP + WS push)                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  lifecycle · day counter · turn schedule · lamp        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod events;
mod pins;
pub mod process;
pub mod profiles;

pub mod app;
mod adapters;
mod drivers;
mod sensors;
pub mod web;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::nvs::NvsStateStore;
use adapters::time::Esp32Clock;
use adapters::wifi::WifiAdapter;
use app::events::AppEvent;
use app::ports::{EventSink, StatePort, TurnerPort};
use app::service::AppService;
use config::SystemConfig;
use drivers::relay::LampRelay;
use drivers::stepper::{StepperConfig, StepperDriver};
use events::{drain_events, push_event, Event};
use sensors::dht::DhtSensor;
use web::server::WebServer;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BroodBox v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();

    // ── 2. Restore process state from NVS ─────────────────────
    let mut store =
        NvsStateStore::new().map_err(|e| anyhow::anyhow!("NVS init failed: {e}"))?;
    let restored = match store.load() {
        Ok(state) => state,
        Err(e) => {
            warn!("stored process state unreadable ({e}), using defaults");
            None
        }
    };

    // ── 3. Clock + network ────────────────────────────────────
    let mut clock = Esp32Clock::new();

    match WifiAdapter::new() {
        Ok(mut wifi) => match wifi.connect() {
            Ok(()) => clock.start_sntp(),
            Err(e) => warn!("WiFi: {e} — running offline, wall clock stays unset"),
        },
        Err(e) => warn!("WiFi init failed: {e}"),
    }

    // ── 4. Hardware adapter ───────────────────────────────────
    let mut hw = HardwareAdapter::new(
        DhtSensor::new(pins::DHT_GPIO, config.sensor_min_interval_ms),
        StepperDriver::new(StepperConfig {
            pin_step: pins::STEPPER_STEP_GPIO,
            pin_dir: pins::STEPPER_DIR_GPIO,
            pin_enable: pins::STEPPER_ENABLE_GPIO,
            steps_per_turn: config.steps_per_turn,
            step_pulse_us: config.step_pulse_us,
            invert_dir: config.invert_turn_direction,
        }),
        LampRelay::new(pins::RELAY_GPIO),
        Esp32Clock::new(),
    );

    // ── 5. Application service ────────────────────────────────
    let mut app = AppService::new(restored);
    let mut log_sink = LogEventSink::new();
    app.startup_sync(&mut hw);

    // ── 6. Web server ─────────────────────────────────────────
    let mut web_server = match WebServer::start(config.http_port) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("web server failed to start: {e} — control loop continues headless");
            None
        }
    };

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    let mut status_counter: u64 = 0;
    let push_every =
        u64::from(config.status_push_interval_secs) * 1000 / u64::from(config.control_loop_interval_ms);

    loop {
        esp_idf_svc::hal::delay::FreeRtos::delay_ms(config.control_loop_interval_ms);
        push_event(Event::ControlTick);

        status_counter += 1;
        if status_counter >= push_every.max(1) {
            push_event(Event::StatusPush);
            status_counter = 0;
        }

        if web::has_pending_command() {
            push_event(Event::CommandReceived);
        }

        drain_events(|event| match event {
            Event::ControlTick => {
                app.tick(&mut hw, &clock, &mut store, &mut log_sink);
            }

            Event::CommandReceived => {
                while let Some(cmd) = web::next_command() {
                    if let Err(e) = app.handle_command(cmd, &mut hw, &clock, &mut store, &mut log_sink)
                    {
                        warn!("command rejected: {e}");
                    }
                }
            }

            Event::StatusPush => {
                let report = app.status(hw.motor_status());
                log_sink.emit(&AppEvent::Status(report.clone()));
                web::publish_status(report.clone());
                if let Some(server) = web_server.as_mut() {
                    server.broadcast_status(&web::payload::status_json(&report));
                }
            }
        });
    }
}
