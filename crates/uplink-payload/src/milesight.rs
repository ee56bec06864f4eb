//! Milesight AM/EM series sensors: a channel+type TLV stream with
//! little-endian fields.

use chrono::{DateTime, Utc};

use crate::{DecodeError, Result, VendorPayload};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilesightPayload {
    /// Battery level, percent.
    pub battery: Option<f64>,
    /// Temperature, degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity, percent.
    pub humidity: Option<f64>,
    /// Distance to target, millimeters.
    pub distance: Option<f64>,
    /// Cumulative in-count from people-counter frames.
    pub people_in: Option<f64>,
    /// Cumulative out-count from people-counter frames.
    pub people_out: Option<f64>,
}

fn read_u16_le(data: &[u8], offset: usize, field: &'static str) -> Result<u16> {
    let bytes = data
        .get(offset..offset + 2)
        .ok_or(DecodeError::TruncatedField(field))?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_i16_le(data: &[u8], offset: usize, field: &'static str) -> Result<i16> {
    Ok(read_u16_le(data, offset, field)? as i16)
}

pub fn decode(
    _f_port: u8,
    data: &[u8],
    _object: Option<&serde_json::Value>,
    _now: DateTime<Utc>,
) -> Result<VendorPayload> {
    if data.len() < 3 {
        return Err(DecodeError::TooShort {
            expected: 3,
            actual: data.len(),
        });
    }

    let mut payload = MilesightPayload::default();
    let mut pos = 0;

    while pos < data.len() {
        if pos + 2 > data.len() {
            return Err(DecodeError::TruncatedField("channel header"));
        }
        let channel = data[pos];
        let type_id = data[pos + 1];
        pos += 2;

        match (channel, type_id) {
            // Battery, percent
            (0x01, 0x75) => {
                let raw = *data.get(pos).ok_or(DecodeError::TruncatedField("battery"))?;
                payload.battery = Some(raw as f64);
                pos += 1;
            }
            // Temperature, raw/10 little-endian
            (0x03, 0x67) => {
                let raw = read_i16_le(data, pos, "temperature")?;
                payload.temperature = Some(raw as f64 / 10.0);
                pos += 2;
            }
            // Humidity, raw/2
            (0x04, 0x68) => {
                let raw = *data.get(pos).ok_or(DecodeError::TruncatedField("humidity"))?;
                payload.humidity = Some(raw as f64 / 2.0);
                pos += 1;
            }
            // Distance, millimeters
            (0x03, 0x82) => {
                let raw = read_u16_le(data, pos, "distance")?;
                payload.distance = Some(raw as f64);
                pos += 2;
            }
            // People counter, in/out totals
            (0x05, 0x00) => {
                let in_count = read_u16_le(data, pos, "people in-count")?;
                let out_count = read_u16_le(data, pos + 2, "people out-count")?;
                payload.people_in = Some(in_count as f64);
                payload.people_out = Some(out_count as f64);
                pos += 4;
            }
            _ => {
                return Err(DecodeError::InvalidPayload(format!(
                    "unknown channel {channel:#04x} type {type_id:#04x}"
                )));
            }
        }
    }

    Ok(VendorPayload::Milesight(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_ok(data: &[u8]) -> MilesightPayload {
        match decode(85, data, None, Utc::now()).unwrap() {
            VendorPayload::Milesight(p) => p,
            other => panic!("expected milesight payload, got {other:?}"),
        }
    }

    #[test]
    fn decodes_am100_environment_frame() {
        // Battery 98% + temperature 26.3 + humidity 49.5
        let data = [
            0x01, 0x75, 0x62, // battery
            0x03, 0x67, 0x07, 0x01, // temperature 0x0107 = 263
            0x04, 0x68, 0x63, // humidity 99/2
        ];
        let payload = decode_ok(&data);
        assert_eq!(payload.battery, Some(98.0));
        assert_eq!(payload.temperature, Some(26.3));
        assert_eq!(payload.humidity, Some(49.5));
        assert_eq!(payload.distance, None);
    }

    #[test]
    fn decodes_negative_temperature() {
        // -0.1 C = raw -1 = 0xFFFF little-endian
        let data = [0x03, 0x67, 0xFF, 0xFF];
        let payload = decode_ok(&data);
        assert_eq!(payload.temperature, Some(-0.1));
    }

    #[test]
    fn decodes_distance_frame() {
        // 1500 mm = 0x05DC little-endian
        let data = [0x03, 0x82, 0xDC, 0x05];
        let payload = decode_ok(&data);
        assert_eq!(payload.distance, Some(1500.0));
    }

    #[test]
    fn decodes_people_counter_frame() {
        let data = [0x05, 0x00, 0x10, 0x00, 0x0C, 0x00];
        let payload = decode_ok(&data);
        assert_eq!(payload.people_in, Some(16.0));
        assert_eq!(payload.people_out, Some(12.0));
    }

    #[test]
    fn too_short_frame_errors() {
        let result = decode(85, &[0x01, 0x75], None, Utc::now());
        assert_eq!(
            result,
            Err(DecodeError::TooShort {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn truncated_field_errors_without_panic() {
        // Temperature header but only one data byte
        let result = decode(85, &[0x03, 0x67, 0x07], None, Utc::now());
        assert_eq!(result, Err(DecodeError::TruncatedField("temperature")));
    }

    #[test]
    fn unknown_channel_type_errors() {
        let result = decode(85, &[0x09, 0x99, 0x00, 0x00], None, Utc::now());
        assert!(matches!(result, Err(DecodeError::InvalidPayload(_))));
    }
}
