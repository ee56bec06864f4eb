//! Niab fill-level sensors: a fixed 4-byte big-endian frame.

use chrono::{DateTime, Utc};

use crate::{DecodeError, Result, VendorPayload};

const MIN_LEN: usize = 4;

/// Distance reading when no echo was received.
const NO_ECHO: u16 = 0xFFFF;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NiabPayload {
    /// Battery voltage, millivolts.
    pub battery: f64,
    /// Distance to surface, millimeters. Absent when the sensor got no echo.
    pub distance: Option<f64>,
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

    let battery = u16::from_be_bytes([data[0], data[1]]);
    let raw_distance = u16::from_be_bytes([data[2], data[3]]);

    let distance = if raw_distance == NO_ECHO {
        None
    } else {
        Some(raw_distance as f64)
    };

    Ok(VendorPayload::Niab(NiabPayload {
        battery: battery as f64,
        distance,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_battery_and_distance() {
        // 3600 mV, 1234 mm
        let data = [0x0E, 0x10, 0x04, 0xD2];
        let payload = decode(1, &data, None, Utc::now()).unwrap();
        assert_eq!(
            payload,
            VendorPayload::Niab(NiabPayload {
                battery: 3600.0,
                distance: Some(1234.0),
            })
        );
    }

    #[test]
    fn no_echo_leaves_distance_absent() {
        let data = [0x0E, 0x10, 0xFF, 0xFF];
        let payload = decode(1, &data, None, Utc::now()).unwrap();
        let VendorPayload::Niab(niab) = payload else {
            panic!("expected niab payload");
        };
        assert_eq!(niab.distance, None);
        assert_eq!(niab.battery, 3600.0);
    }

    #[test]
    fn short_frame_errors() {
        let result = decode(1, &[0x0E, 0x10, 0x04], None, Utc::now());
        assert_eq!(
            result,
            Err(DecodeError::TooShort {
                expected: 4,
                actual: 3
            })
        );
    }
}
