//! ESP32 time adapter.
//!
//! Implements [`ClockPort`]: monotonic uptime plus the wall clock.
//!
//! - **`target_os = "espidf"`** — uptime from `esp_timer_get_time()`,
//!   wall clock from `gettimeofday()` once SNTP has synced it.
//! - **everything else** — `std::time::Instant` uptime and an injectable
//!   simulated epoch for host-side tests.
//!
//! The wall clock reads as *unset* (`None`) until it passes
//! [`CLOCK_EPOCH_FLOOR`]; a freshly booted RTC sits at the start of the
//! Unix epoch and must never be mistaken for a real timestamp.

use crate::app::ports::ClockPort;

/// Wall-clock readings below this many seconds count as "clock not set".
pub const CLOCK_EPOCH_FLOOR: u64 = 100_000;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU64, Ordering};

#[cfg(not(target_os = "espidf"))]
static SIM_EPOCH: AtomicU64 = AtomicU64::new(0);

/// Set the simulated wall clock (host/test builds). 0 = unset.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_epoch(epoch_secs: u64) {
    SIM_EPOCH.store(epoch_secs, Ordering::Relaxed);
}

/// Time adapter for the ESP32 platform.
pub struct Esp32Clock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
    #[cfg(target_os = "espidf")]
    _sntp: Option<esp_idf_svc::sntp::EspSntp<'static>>,
}

impl Esp32Clock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
            #[cfg(target_os = "espidf")]
            _sntp: None,
        }
    }

    /// Kick off SNTP so the wall clock eventually becomes set. Safe to
    /// call before the network is up; sync happens in the background.
    #[cfg(target_os = "espidf")]
    pub fn start_sntp(&mut self) {
        match esp_idf_svc::sntp::EspSntp::new_default() {
            Ok(sntp) => {
                log::info!("SNTP started");
                self._sntp = Some(sntp);
            }
            Err(e) => log::warn!("SNTP start failed: {e}"),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn start_sntp(&mut self) {}
}

impl ClockPort for Esp32Clock {
    #[cfg(target_os = "espidf")]
    fn now_epoch(&self) -> Option<u64> {
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut()) } != 0 {
            return None;
        }
        let secs = tv.tv_sec as u64;
        (secs >= CLOCK_EPOCH_FLOOR).then_some(secs)
    }

    #[cfg(not(target_os = "espidf"))]
    fn now_epoch(&self) -> Option<u64> {
        let secs = SIM_EPOCH.load(Ordering::Relaxed);
        (secs >= CLOCK_EPOCH_FLOOR).then_some(secs)
    }

    #[cfg(target_os = "espidf")]
    fn uptime_secs(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}
