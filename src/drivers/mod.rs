//! Actuator drivers — egg-turning stepper and heat-lamp relay.
//!
//! Drivers are dumb: they move pins and track mechanical state. All
//! decisions (when to turn, when to heat) belong to the application core.
//!
//! The raw GPIO helpers below are the only place actuator code touches
//! `esp_idf_svc::sys`; on non-espidf targets they are no-ops so the same
//! driver structs serve as in-memory simulations.

pub mod relay;
pub mod stepper;

#[cfg(target_os = "espidf")]
pub(crate) fn gpio_init_output(pin: i32, initial_high: bool) {
    use esp_idf_svc::sys::*;
    unsafe {
        gpio_reset_pin(pin);
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
        gpio_set_level(pin, u32::from(initial_high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub(crate) fn gpio_init_output(_pin: i32, _initial_high: bool) {}

#[cfg(target_os = "espidf")]
pub(crate) fn gpio_write(pin: i32, high: bool) {
    unsafe {
        esp_idf_svc::sys::gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub(crate) fn gpio_write(_pin: i32, _high: bool) {}

#[cfg(target_os = "espidf")]
pub(crate) fn delay_us(us: u32) {
    unsafe {
        esp_idf_svc::sys::ets_delay_us(us);
    }
}

#[cfg(not(target_os = "espidf"))]
pub(crate) fn delay_us(_us: u32) {}
