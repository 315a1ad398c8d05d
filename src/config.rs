//! System configuration parameters.
//!
//! Timing and mechanics knobs for the BroodBox controller. These are
//! compile-time defaults; the persisted runtime record is the process
//! state (see [`crate::process`]), not this struct.

/// Core system configuration.
#[derive(Debug, Clone)]
pub struct SystemConfig {
    // --- Timing ---
    /// Control loop interval (milliseconds).
    pub control_loop_interval_ms: u32,
    /// Status push interval over the WebSocket feed (seconds).
    pub status_push_interval_secs: u32,
    /// Minimum spacing between DHT22 conversions (milliseconds).
    /// The sensor needs ≥ 2 s between reads; faster polls serve a cached value.
    pub sensor_min_interval_ms: u32,

    // --- Egg turner mechanics ---
    /// Full steps for one egg-turn rotation.
    pub steps_per_turn: u32,
    /// Half-period of the step pulse (microseconds).
    pub step_pulse_us: u32,
    /// Reverse the turn direction (wiring-dependent).
    pub invert_turn_direction: bool,

    // --- Web ---
    /// HTTP listen port for the local UI / API.
    pub http_port: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            control_loop_interval_ms: 1000, // 1 Hz
            status_push_interval_secs: 2,
            sensor_min_interval_ms: 2000,

            steps_per_turn: 200,
            step_pulse_us: 800,
            invert_turn_direction: false,

            http_port: 80,
        }
    }
}
