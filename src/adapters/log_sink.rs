//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production). The WebSocket feed
//! is a second sink on the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::ProcessStarted {
                process_type,
                profile_id,
                start_day,
            } => {
                info!(
                    "PROC  | started {:?} profile={} day={}",
                    process_type, profile_id, start_day
                );
            }
            AppEvent::ProcessCancelled => info!("PROC  | cancelled"),
            AppEvent::ProcessTransitioned => info!("PROC  | holding -> incubation"),
            AppEvent::ProcessCompleted { day } => info!("PROC  | completed at day {day}"),
            AppEvent::EggsTurned { epoch } => info!("TURN  | eggs turned at {epoch}"),
            AppEvent::LampChanged { on } => {
                info!("LAMP  | {}", if *on { "ON" } else { "OFF" });
            }
            AppEvent::CustomProfileUpdated => info!("PROF  | custom overrides updated"),
            AppEvent::StateReset => info!("PROC  | state reset to defaults"),
            AppEvent::Status(s) => {
                info!(
                    "STAT  | active={} type={} day={} | T={} tgt=[{}..{}] | lamp={} | next_turn={}s",
                    s.active,
                    s.process_type,
                    s.day,
                    s.temp_f.map_or("--".into(), |t| format!("{t:.1}F")),
                    s.tmin.map_or("--".into(), |t| format!("{t:.1}")),
                    s.tmax.map_or("--".into(), |t| format!("{t:.1}")),
                    s.lamp,
                    s.motor_seconds_until_next,
                );
            }
        }
    }
}
