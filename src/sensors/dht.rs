//! DHT22 (AM2302) temperature / humidity sensor driver.
//!
//! Single-wire protocol bit-banged over a GPIO: host pulls the line low
//! for ≥ 1 ms to request a conversion, the sensor answers with an 80 µs
//! low/high preamble followed by 40 bits encoded in high-pulse widths.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: raw GPIO + busy-wait timing via `esp_idf_svc::sys`.
//! On host/test: readings are injected through atomics ([`sim_set_reading`]).
//!
//! The sensor needs ≥ 2 s between conversions, so the driver caches the
//! last good reading and serves it to faster callers; a reading older
//! than the staleness limit with no successful refresh reads as invalid.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use log::warn;

use super::SensorReading;

/// Reject readings outside the DHT22 measurable range.
const TEMP_MIN_C: f32 = -40.0;
const TEMP_MAX_C: f32 = 80.0;

/// Serve cached values this long after a failed refresh before reporting
/// the reading as invalid.
#[cfg(target_os = "espidf")]
const STALE_LIMIT_MS: u64 = 10_000;

// ── Host simulation backend ───────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_VALID: AtomicBool = AtomicBool::new(false);
#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_C: AtomicU32 = AtomicU32::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_RH: AtomicU32 = AtomicU32::new(0);

/// Inject a simulated reading (host/test builds).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_reading(temp_c: f32, humidity: f32) {
    SIM_TEMP_C.store(temp_c.to_bits(), Ordering::Relaxed);
    SIM_RH.store(humidity.to_bits(), Ordering::Relaxed);
    SIM_VALID.store(true, Ordering::Release);
}

/// Mark the simulated sensor as failed (host/test builds).
#[cfg(not(target_os = "espidf"))]
pub fn sim_clear_reading() {
    SIM_VALID.store(false, Ordering::Release);
}

// ── Driver ────────────────────────────────────────────────────

pub struct DhtSensor {
    gpio: i32,
    min_interval_ms: u32,
    #[cfg(target_os = "espidf")]
    last_good: Option<(SensorReading, u64)>,
    #[cfg(target_os = "espidf")]
    last_attempt_ms: u64,
}

impl DhtSensor {
    pub fn new(gpio: i32, min_interval_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        unsafe {
            use esp_idf_svc::sys::*;
            gpio_set_direction(gpio, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD);
            gpio_set_pull_mode(gpio, gpio_pull_mode_t_GPIO_PULLUP_ONLY);
            gpio_set_level(gpio, 1);
        }
        Self {
            gpio,
            min_interval_ms,
            #[cfg(target_os = "espidf")]
            last_good: None,
            #[cfg(target_os = "espidf")]
            last_attempt_ms: 0,
        }
    }

    /// Read the sensor. `None` when no valid measurement is available —
    /// callers must treat that as "cannot decide", never as zero.
    #[cfg(not(target_os = "espidf"))]
    pub fn read(&mut self) -> Option<SensorReading> {
        let _ = (self.gpio, self.min_interval_ms);
        if !SIM_VALID.load(Ordering::Acquire) {
            return None;
        }
        let temp_c = f32::from_bits(SIM_TEMP_C.load(Ordering::Relaxed));
        let humidity = f32::from_bits(SIM_RH.load(Ordering::Relaxed));
        validate(temp_c, humidity).then(|| SensorReading::from_raw(temp_c, humidity))
    }

    /// Read the sensor, rate-limited to the DHT22 conversion interval.
    #[cfg(target_os = "espidf")]
    pub fn read(&mut self) -> Option<SensorReading> {
        let now_ms = uptime_ms();

        // Serve the cache while inside the conversion interval.
        if let Some((cached, at)) = self.last_good {
            if now_ms.saturating_sub(at) < u64::from(self.min_interval_ms) {
                return Some(cached);
            }
        }
        if now_ms.saturating_sub(self.last_attempt_ms) < u64::from(self.min_interval_ms) {
            return self.fresh_enough(now_ms);
        }
        self.last_attempt_ms = now_ms;

        match self.read_raw() {
            Some((temp_c, humidity)) if validate(temp_c, humidity) => {
                let reading = SensorReading::from_raw(temp_c, humidity);
                self.last_good = Some((reading, now_ms));
                Some(reading)
            }
            Some((temp_c, humidity)) => {
                warn!("DHT22: out-of-range reading {temp_c}°C / {humidity}%RH");
                self.fresh_enough(now_ms)
            }
            None => {
                warn!("DHT22: read failed");
                self.fresh_enough(now_ms)
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn fresh_enough(&self, now_ms: u64) -> Option<SensorReading> {
        self.last_good
            .filter(|(_, at)| now_ms.saturating_sub(*at) < STALE_LIMIT_MS)
            .map(|(r, _)| r)
    }

    /// One raw 40-bit transaction. Returns (temp_c, humidity).
    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> Option<(f32, f32)> {
        use esp_idf_svc::sys::*;

        let pin = self.gpio;
        let mut data = [0u8; 5];

        unsafe {
            // Start signal: ≥ 1 ms low, then release.
            gpio_set_level(pin, 0);
            ets_delay_us(1100);
            gpio_set_level(pin, 1);
            ets_delay_us(40);

            // Sensor preamble: 80 µs low, 80 µs high.
            wait_level(pin, 0, 100)?;
            wait_level(pin, 1, 100)?;
            wait_level(pin, 0, 100)?;

            // 40 data bits: 50 µs low separator, then 26–28 µs high = 0,
            // ~70 µs high = 1.
            for bit in 0..40 {
                wait_level(pin, 1, 70)?;
                let high_us = pulse_width(pin, 1, 100)?;
                if high_us > 40 {
                    data[bit / 8] |= 1 << (7 - (bit % 8));
                }
            }
        }

        let checksum = data[0]
            .wrapping_add(data[1])
            .wrapping_add(data[2])
            .wrapping_add(data[3]);
        if checksum != data[4] {
            return None;
        }

        let humidity = f32::from(u16::from_be_bytes([data[0], data[1]])) * 0.1;
        let raw_t = u16::from_be_bytes([data[2], data[3]]);
        // Sign-magnitude: bit 15 flags negative temperatures.
        let temp_c = if raw_t & 0x8000 != 0 {
            -f32::from(raw_t & 0x7FFF) * 0.1
        } else {
            f32::from(raw_t) * 0.1
        };

        Some((temp_c, humidity))
    }
}

fn validate(temp_c: f32, humidity: f32) -> bool {
    temp_c.is_finite()
        && humidity.is_finite()
        && (TEMP_MIN_C..=TEMP_MAX_C).contains(&temp_c)
        && (0.0..=100.0).contains(&humidity)
}

// ── ESP-IDF timing helpers ────────────────────────────────────

#[cfg(target_os = "espidf")]
fn uptime_ms() -> u64 {
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1000
}

/// Busy-wait until the line reaches `level`; `None` on timeout (µs).
#[cfg(target_os = "espidf")]
unsafe fn wait_level(pin: i32, level: i32, timeout_us: u32) -> Option<()> {
    use esp_idf_svc::sys::*;
    for _ in 0..timeout_us {
        if unsafe { gpio_get_level(pin) } == level {
            return Some(());
        }
        unsafe { ets_delay_us(1) };
    }
    None
}

/// Measure how long the line stays at `level`; `None` on timeout.
#[cfg(target_os = "espidf")]
unsafe fn pulse_width(pin: i32, level: i32, timeout_us: u32) -> Option<u32> {
    use esp_idf_svc::sys::*;
    for us in 0..timeout_us {
        if unsafe { gpio_get_level(pin) } != level {
            return Some(us);
        }
        unsafe { ets_delay_us(1) };
    }
    None
}
