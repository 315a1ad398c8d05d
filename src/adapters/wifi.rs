//! WiFi station-mode adapter.
//!
//! Associates with a configured access point so the local web UI and the
//! SNTP wall-clock sync are reachable. Credentials are compiled in
//! (`BROODBOX_WIFI_SSID` / `BROODBOX_WIFI_PASS` at build time);
//! provisioning flows are out of scope.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls.
//! - **all other targets**: a disconnected stub for host-side tests.

use core::fmt;

use log::info;

/// Compiled-in station credentials.
pub const WIFI_SSID: &str = match option_env!("BROODBOX_WIFI_SSID") {
    Some(s) => s,
    None => "broodbox",
};
pub const WIFI_PASS: &str = match option_env!("BROODBOX_WIFI_PASS") {
    Some(s) => s,
    None => "",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiError {
    InvalidSsid,
    DriverInit,
    ConnectFailed,
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 bytes)"),
            Self::DriverInit => write!(f, "WiFi driver init failed"),
            Self::ConnectFailed => write!(f, "WiFi connection failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF implementation
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct WifiAdapter {
    wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
}

#[cfg(target_os = "espidf")]
impl WifiAdapter {
    pub fn new() -> Result<Self, WifiError> {
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::hal::modem::Modem;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

        if WIFI_SSID.is_empty() || WIFI_SSID.len() > 32 {
            return Err(WifiError::InvalidSsid);
        }

        let sys_loop = EspSystemEventLoop::take().map_err(|_| WifiError::DriverInit)?;
        let nvs = EspDefaultNvsPartition::take().map_err(|_| WifiError::DriverInit)?;
        // SAFETY: the modem peripheral is taken exactly once, here.
        let modem = unsafe { Modem::new() };

        let esp_wifi =
            EspWifi::new(modem, sys_loop.clone(), Some(nvs)).map_err(|_| WifiError::DriverInit)?;
        let wifi = BlockingWifi::wrap(esp_wifi, sys_loop).map_err(|_| WifiError::DriverInit)?;

        Ok(Self { wifi })
    }

    /// Associate with the configured AP, blocking until an IP is bound.
    pub fn connect(&mut self) -> Result<(), WifiError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if WIFI_PASS.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        let config = Configuration::Client(ClientConfiguration {
            ssid: WIFI_SSID.try_into().map_err(|_| WifiError::InvalidSsid)?,
            password: WIFI_PASS.try_into().map_err(|_| WifiError::ConnectFailed)?,
            auth_method,
            ..Default::default()
        });

        self.wifi
            .set_configuration(&config)
            .map_err(|_| WifiError::DriverInit)?;
        self.wifi.start().map_err(|_| WifiError::DriverInit)?;
        self.wifi.connect().map_err(|_| WifiError::ConnectFailed)?;
        self.wifi
            .wait_netif_up()
            .map_err(|_| WifiError::ConnectFailed)?;

        info!("WiFi connected to '{}'", WIFI_SSID);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }
}

// ───────────────────────────────────────────────────────────────
// Host stub
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct WifiAdapter;

#[cfg(not(target_os = "espidf"))]
impl WifiAdapter {
    pub fn new() -> Result<Self, WifiError> {
        info!("WifiAdapter: simulation backend (no network)");
        Ok(Self)
    }

    pub fn connect(&mut self) -> Result<(), WifiError> {
        Err(WifiError::ConnectFailed)
    }

    pub fn is_connected(&self) -> bool {
        false
    }
}
