//! Senlab TEM temperature loggers. Format is gated on fPort 3; the
//! temperature is a big-endian fixed-point value in sixteenths of a degree.

use chrono::{DateTime, Utc};

use crate::{DecodeError, Result, VendorPayload};

const EXPECTED_PORT: u8 = 3;
const MIN_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SenlabPayload {
    pub internal_id: u8,
    /// Battery level, percent.
    pub battery: f64,
    /// Temperature, degrees Celsius.
    pub temperature: f64,
}

pub fn decode(
    f_port: u8,
    data: &[u8],
    _object: Option<&serde_json::Value>,
    _now: DateTime<Utc>,
) -> Result<VendorPayload> {
    if f_port != EXPECTED_PORT {
        return Err(DecodeError::UnsupportedPort(f_port));
    }
    if data.len() < MIN_LEN {
        return Err(DecodeError::TooShort {
            expected: MIN_LEN,
            actual: data.len(),
        });
    }

    let raw = i16::from_be_bytes([data[data.len() - 2], data[data.len() - 1]]);

    Ok(VendorPayload::Senlab(SenlabPayload {
        internal_id: data[0],
        battery: data[1] as f64,
        temperature: raw as f64 / 16.0,
    }))
}
