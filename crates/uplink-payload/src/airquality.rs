//! Curbside air-quality sensors: fixed big-endian frame with tenths
//! resolution for each constituent.

use chrono::{DateTime, Utc};

use crate::{DecodeError, Result, VendorPayload};

const MIN_LEN: usize = 7;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirQualityPayload {
    /// PM10 concentration, micrograms per cubic meter.
    pub pm10: f64,
    /// PM2.5 concentration, micrograms per cubic meter.
    pub pm25: f64,
    /// NO2 concentration, ppb.
    pub no2: f64,
    /// Battery level, percent.
    pub battery: f64,
}

pub fn decode(
    _f_port: u8,
    data: &[u8],
    _object: Option<&serde_json::Value>,
    _now: DateTime<Utc>,
) -> Result<VendorPayload> {
    if data.len() < MIN_LEN {
        return Err(DecodeError::TooShort {
            expected: MIN_LEN,
            actual: data.len(),
        });
    }

    let pm10 = u16::from_be_bytes([data[0], data[1]]);
    let pm25 = u16::from_be_bytes([data[2], data[3]]);
    let no2 = u16::from_be_bytes([data[4], data[5]]);

    Ok(VendorPayload::AirQuality(AirQualityPayload {
        pm10: pm10 as f64 / 10.0,
        pm25: pm25 as f64 / 10.0,
        no2: no2 as f64 / 10.0,
        battery: data[6] as f64,
    }))
}
