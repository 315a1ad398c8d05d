//! Application core — the hexagonal inner ring.
//!
//! [`service::AppService`] holds the process state machine; everything it
//! touches in the outside world (sensor, egg turner, lamp relay, clock,
//! persistent storage, event sinks) goes through the traits in [`ports`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
