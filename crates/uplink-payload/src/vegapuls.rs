//! VEGAPULS Air radar level sensors. The first byte selects the packet
//! shape; only the measurement packet (0x01) is decoded here.

use chrono::{DateTime, Utc};

use crate::{DecodeError, Result, VendorPayload};

const MEASUREMENT_PACKET: u8 = 0x01;
const MEASUREMENT_LEN: usize = 9;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VegapulsPayload {
    /// Distance to surface, meters.
    pub distance: f64,
    /// Battery level, percent.
    pub battery: f64,
}

pub fn decode(
    _f_port: u8,
    data: &[u8],
    _object: Option<&serde_json::Value>,
    _now: DateTime<Utc>,
) -> Result<VendorPayload> {
    if data.is_empty() {
        return Err(DecodeError::TooShort {
            expected: 1,
            actual: 0,
        });
    }
    if data[0] != MEASUREMENT_PACKET {
        return Err(DecodeError::UnknownFrameLength(data.len()));
    }
    if data.len() < MEASUREMENT_LEN {
        return Err(DecodeError::TooShort {
            expected: MEASUREMENT_LEN,
            actual: data.len(),
        });
    }

    let distance = f32::from_be_bytes([data[1], data[2], data[3], data[4]]);

    Ok(VendorPayload::Vegapuls(VegapulsPayload {
        distance: distance as f64,
        battery: data[8] as f64,
    }))
}
