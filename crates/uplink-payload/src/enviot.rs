//! Enviot snow-depth/environment sensors. Uplinks arrive with a pre-decoded
//! JSON object whose measurements sit under a `payload` key.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{DecodeError, Result, VendorPayload};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnviotPayload {
    /// Battery level, percent.
    pub battery: Option<f64>,
    /// Raw distance to target, meters.
    pub distance: Option<f64>,
    /// Relative humidity, percent.
    pub humidity: Option<f64>,
    /// Barometric pressure, hPa.
    pub pressure: Option<f64>,
    pub sensor_status: Option<i64>,
    /// Computed snow height, meters.
    pub snow_height: Option<f64>,
    /// Air temperature, degrees Celsius.
    pub temperature: Option<f64>,
    /// Supply voltage, millivolts.
    pub vdd: Option<f64>,
}

pub fn decode(
    _f_port: u8,
    _data: &[u8],
    object: Option<&serde_json::Value>,
    _now: DateTime<Utc>,
) -> Result<VendorPayload> {
    let object = object.ok_or(DecodeError::TruncatedField("pre-decoded object"))?;
    let body = object
        .get("payload")
        .ok_or(DecodeError::TruncatedField("payload"))?;
    let payload: EnviotPayload = serde_json::from_value(body.clone())
        .map_err(|e| DecodeError::InvalidPayload(e.to_string()))?;
    Ok(VendorPayload::Enviot(payload))
}
