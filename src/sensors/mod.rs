//! Sensor subsystem — the [`SensorReading`] value object and the
//! psychrometric math shared by the DHT driver and the web payloads.

pub mod dht;

/// A point-in-time climate reading.
///
/// A `SensorReading` only exists when the underlying measurement was
/// valid; "no reading" is expressed as `Option::None` at the port
/// boundary, never as zeroed or NaN primary fields. Derived quantities
/// (dew point, heat index) may still be NaN at extreme inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub temp_c: f32,
    pub temp_f: f32,
    /// Relative humidity (%).
    pub humidity: f32,
    /// Absolute humidity (g/m³).
    pub abs_humidity: f32,
    pub dew_point_c: f32,
    pub dew_point_f: f32,
    pub heat_index_c: f32,
    pub heat_index_f: f32,
}

impl SensorReading {
    /// Build a full reading from the two raw DHT quantities.
    pub fn from_raw(temp_c: f32, humidity: f32) -> Self {
        let temp_f = c_to_f(temp_c);
        let dew_c = dew_point_c(temp_c, humidity);
        let hi_f = heat_index_f(temp_f, humidity);
        Self {
            temp_c,
            temp_f,
            humidity,
            abs_humidity: absolute_humidity_g_m3(temp_c, humidity),
            dew_point_c: dew_c,
            dew_point_f: if dew_c.is_nan() { f32::NAN } else { c_to_f(dew_c) },
            heat_index_c: if hi_f.is_nan() { f32::NAN } else { f_to_c(hi_f) },
            heat_index_f: hi_f,
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions & derived quantities
// ---------------------------------------------------------------------------

pub fn c_to_f(c: f32) -> f32 {
    c * 9.0 / 5.0 + 32.0
}

pub fn f_to_c(f: f32) -> f32 {
    (f - 32.0) * 5.0 / 9.0
}

/// Absolute humidity in g/m³ from temperature (°C) and %RH.
/// Saturation vapour pressure per the Bolton (1980) approximation.
pub fn absolute_humidity_g_m3(temp_c: f32, rh: f32) -> f32 {
    let es = 6.112 * ((17.67 * temp_c) / (temp_c + 243.5)).exp();
    let e = es * rh / 100.0;
    216.7 * (e / (temp_c + 273.15))
}

/// Dew point (°C) via the Magnus formula. NaN when RH is out of range.
pub fn dew_point_c(temp_c: f32, rh: f32) -> f32 {
    if rh <= 0.0 || rh > 100.0 {
        return f32::NAN;
    }
    const A: f32 = 17.62;
    const B: f32 = 243.12;
    let gamma = (rh / 100.0).ln() + (A * temp_c) / (B + temp_c);
    B * gamma / (A - gamma)
}

/// Heat index (°F) — NOAA Rothfusz regression with the low-range
/// Steadman blend, as implemented by the common DHT libraries.
pub fn heat_index_f(temp_f: f32, rh: f32) -> f32 {
    let t = temp_f;
    let mut hi = 0.5 * (t + 61.0 + ((t - 68.0) * 1.2) + (rh * 0.094));

    if hi > 79.0 {
        hi = -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
            - 0.224_755_41 * t * rh
            - 0.006_837_83 * t * t
            - 0.054_817_17 * rh * rh
            + 0.001_228_74 * t * t * rh
            + 0.000_852_82 * t * rh * rh
            - 0.000_001_99 * t * t * rh * rh;

        if rh < 13.0 && (80.0..=112.0).contains(&t) {
            hi -= ((13.0 - rh) * 0.25) * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
        } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
            hi += ((rh - 85.0) * 0.1) * ((87.0 - t) * 0.2);
        }
    }

    hi
}
