//! Elsys ERS/ELT multi-sensors. The network server ships these uplinks with
//! a pre-decoded JSON object, so decoding is a matter of picking out the
//! fields the frame actually populated.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{DecodeError, Result, VendorPayload};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElsysPayload {
    /// Internal temperature, degrees Celsius.
    pub temperature: Option<f64>,
    /// External probe temperature, degrees Celsius.
    pub external_temperature: Option<f64>,
    /// Relative humidity, percent.
    pub humidity: Option<f64>,
    /// Illuminance, lux.
    pub light: Option<f64>,
    /// Motion count since last report.
    pub motion: Option<f64>,
    /// CO2 concentration, ppm.
    pub co2: Option<f64>,
    /// Supply voltage, millivolts.
    pub vdd: Option<f64>,
    /// Digital input state.
    pub digital: Option<bool>,
    /// Barometric pressure, hPa.
    pub pressure: Option<f64>,
    pub waterleak: Option<bool>,
}

pub fn decode(
    _f_port: u8,
    _data: &[u8],
    object: Option<&serde_json::Value>,
    _now: DateTime<Utc>,
) -> Result<VendorPayload> {
    let object = object.ok_or(DecodeError::TruncatedField("pre-decoded object"))?;
    let payload: ElsysPayload = serde_json::from_value(object.clone())
        .map_err(|e| DecodeError::InvalidPayload(e.to_string()))?;
    Ok(VendorPayload::Elsys(payload))
}
