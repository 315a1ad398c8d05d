//! Concrete adapters binding the port traits to the ESP32 platform.
//!
//! Every module here is dual-target: real ESP-IDF calls under
//! `target_os = "espidf"`, in-memory simulation backends everywhere else
//! so the domain core and the integration tests run on the host.

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
pub mod wifi;
