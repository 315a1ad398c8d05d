//! Local web presentation layer.
//!
//! The HTTP/WebSocket server runs on ESP-IDF server tasks, while every
//! `ProcessState` mutation must stay on the single control thread. Two
//! small shared structures bridge the gap:
//!
//! - a bounded command **mailbox**: request handlers enqueue parsed
//!   [`AppCommand`]s, the main loop drains them — a command arriving
//!   mid-tick is simply the next unit of work;
//! - a **status cache**: the main loop publishes the snapshot built on
//!   each status tick, `GET /api/state` and the WebSocket push serve it
//!   without touching the service.

pub mod payload;
#[cfg(target_os = "espidf")]
pub mod server;

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;

use crate::app::commands::AppCommand;
use crate::app::events::StatusReport;

/// Commands that can be pending before the control loop drains them.
pub const COMMAND_QUEUE_DEPTH: usize = 8;

static COMMANDS: Channel<CriticalSectionRawMutex, AppCommand, COMMAND_QUEUE_DEPTH> = Channel::new();
static STATUS_CACHE: BlockingMutex<CriticalSectionRawMutex, RefCell<Option<StatusReport>>> =
    BlockingMutex::new(RefCell::new(None));

/// Enqueue a command from a transport thread.
/// Returns `false` when the mailbox is full (command rejected).
pub fn submit_command(cmd: AppCommand) -> bool {
    COMMANDS.try_send(cmd).is_ok()
}

/// Drain one pending command (control loop side).
pub fn next_command() -> Option<AppCommand> {
    COMMANDS.try_receive().ok()
}

/// Whether any command is waiting.
pub fn has_pending_command() -> bool {
    !COMMANDS.is_empty()
}

/// Publish the latest snapshot (control loop side).
pub fn publish_status(report: StatusReport) {
    STATUS_CACHE.lock(|cell| *cell.borrow_mut() = Some(report));
}

/// Last published snapshot, if any tick has run yet.
pub fn cached_status() -> Option<StatusReport> {
    STATUS_CACHE.lock(|cell| cell.borrow().clone())
}
