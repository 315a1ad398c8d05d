//! Heat-lamp relay driver.
//!
//! The relay input is active LOW: driving the pin low closes the contact
//! and energises the lamp. The driver applies the single lamp-desired
//! flag computed by the application core; it makes no decisions itself.

use log::info;

use crate::drivers::{gpio_init_output, gpio_write};

pub struct LampRelay {
    pin: i32,
    on: bool,
}

impl LampRelay {
    /// Initialise with the relay released (lamp off).
    pub fn new(pin: i32) -> Self {
        gpio_init_output(pin, true); // HIGH = relay open
        Self { pin, on: false }
    }

    /// Apply the desired lamp state.
    pub fn set(&mut self, on: bool) {
        if on != self.on {
            info!("lamp relay: {}", if on { "ON" } else { "OFF" });
        }
        self.on = on;
        gpio_write(self.pin, !on); // Lamp on = LOW.
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_off_and_tracks_state() {
        let mut relay = LampRelay::new(26);
        assert!(!relay.is_on());
        relay.set(true);
        assert!(relay.is_on());
        relay.set(false);
        assert!(!relay.is_on());
    }
}
