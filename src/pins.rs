//! GPIO pin assignments for the BroodBox controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// DHT22 temperature / humidity sensor
// ---------------------------------------------------------------------------

/// Single-wire data line of the DHT22 (external 10 kΩ pull-up).
pub const DHT_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Heat-lamp relay
// ---------------------------------------------------------------------------

/// Relay module input. Active LOW: driving the pin low energises the lamp.
pub const RELAY_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Egg-turning stepper driver (A4988 / DRV8825 style step-dir interface)
// ---------------------------------------------------------------------------

/// Step pulse output.
pub const STEPPER_STEP_GPIO: i32 = 18;
/// Direction output.
pub const STEPPER_DIR_GPIO: i32 = 19;
/// Driver enable, active LOW (HIGH = coils de-energised between turns).
pub const STEPPER_ENABLE_GPIO: i32 = 21;
