//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (DHT sensor, stepper, relay, NVS, clock, event sinks)
//! implement these traits. The [`AppService`](super::service::AppService)
//! consumes them via generics injected at call sites, so the domain core
//! never touches hardware directly and runs unmodified on the host.

use crate::process::ProcessState;
use crate::sensors::SensorReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the climate sensor.
pub trait SensorPort {
    /// Latest reading, or `None` when no valid measurement is available.
    /// The domain treats `None` as "cannot decide this tick" — never zero.
    fn read(&mut self) -> Option<SensorReading>;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Egg-turning motor.
pub trait TurnerPort {
    /// Configure the target turn rate (0 = turning disabled).
    fn set_turns_per_day(&mut self, turns: u32);

    /// Execute one full rotation. Blocks for the (bounded, sub-second)
    /// step burst.
    fn turn_once(&mut self);

    /// Mechanical status snapshot.
    fn motor_status(&self) -> MotorStatus;
}

/// Heat-lamp relay, driven by the single lamp-desired flag.
pub trait LampPort {
    fn set_lamp(&mut self, on: bool);
    fn lamp_is_on(&self) -> bool;
}

/// Motor status reported to the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorStatus {
    /// Total steps since init.
    pub absolute_position: u32,
    /// Phase within one rotation, degrees 0.0–360.0.
    pub rotation_phase: f32,
    /// Epoch seconds of the last completed turn (0 = never).
    pub last_turn_epoch: u64,
    pub turns_per_day: u32,
    /// 0 when overdue, disabled, or never turned.
    pub seconds_until_next_turn: u32,
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Time source. The `Option` return of [`now_epoch`](ClockPort::now_epoch)
/// is the formalized clock status: `None` until the wall clock has been
/// set (NTP sync), so day and turn computations never mistake an unset
/// epoch for a valid timestamp.
pub trait ClockPort {
    /// Wall-clock seconds since the Unix epoch, or `None` while unset.
    fn now_epoch(&self) -> Option<u64>;

    /// Monotonic seconds since boot.
    fn uptime_secs(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// State persistence port (driven adapter: domain ↔ NVS)
// ───────────────────────────────────────────────────────────────

/// Durable storage for the [`ProcessState`] record.
///
/// Writes are best-effort from the domain's perspective: a failed save is
/// logged, the in-memory state stays authoritative, and the next
/// successful write restores consistency.
pub trait StatePort {
    /// Load the persisted state. `Ok(None)` when no valid record exists
    /// (first boot) — the caller falls back to compiled-in defaults.
    fn load(&self) -> Result<Option<ProcessState>, StorageError>;

    /// Persist the state atomically.
    fn save(&mut self, state: &ProcessState) -> Result<(), StorageError>;
}

/// Errors from [`StatePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Stored record failed integrity / deserialization checks.
    Corrupted,
    /// Storage partition is full.
    Full,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "stored record corrupted"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / push feed)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log,
/// WebSocket feed, …).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
