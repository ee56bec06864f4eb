//! Sensative Strips (guard/comfort). Port-1 frames carry a 2-byte history
//! header followed by typed records, big-endian throughout.

use chrono::{DateTime, Utc};

use crate::{DecodeError, Result, VendorPayload};

const EXPECTED_PORT: u8 = 1;
const HEADER_LEN: usize = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensativePayload {
    pub history_seq_nr: u16,
    /// Battery level, percent.
    pub battery: Option<f64>,
    /// Ambient temperature, degrees Celsius.
    pub temperature: Option<f64>,
    /// Averaged temperature, degrees Celsius.
    pub avg_temperature: Option<f64>,
    /// Relative humidity, percent.
    pub humidity: Option<f64>,
    /// Ambient light, lux.
    pub lux: Option<f64>,
    /// Second light channel, lux.
    pub lux2: Option<f64>,
    pub door_report: Option<bool>,
    pub door_count: Option<f64>,
    pub presence: Option<bool>,
    pub check_in: Option<bool>,
    pub tamper_report: Option<bool>,
}

fn read_u16_be(data: &[u8], offset: usize, field: &'static str) -> Result<u16> {
    let bytes = data
        .get(offset..offset + 2)
        .ok_or(DecodeError::TruncatedField(field))?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
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
    if data.len() < HEADER_LEN {
        return Err(DecodeError::TooShort {
            expected: HEADER_LEN,
            actual: data.len(),
        });
    }

    let mut payload = SensativePayload {
        history_seq_nr: u16::from_be_bytes([data[0], data[1]]),
        ..Default::default()
    };
    let mut pos = HEADER_LEN;

    while pos < data.len() {
        let record_type = data[pos];
        pos += 1;

        match record_type {
            0x01 => {
                let raw = *data.get(pos).ok_or(DecodeError::TruncatedField("battery"))?;
                payload.battery = Some(raw as f64);
                pos += 1;
            }
            0x02 => {
                let raw = read_u16_be(data, pos, "temperature")? as i16;
                payload.temperature = Some(raw as f64 / 10.0);
                pos += 2;
            }
            0x04 => {
                let raw = read_u16_be(data, pos, "average temperature")? as i16;
                payload.avg_temperature = Some(raw as f64 / 10.0);
                pos += 2;
            }
            0x06 => {
                let raw = *data.get(pos).ok_or(DecodeError::TruncatedField("humidity"))?;
                payload.humidity = Some(raw as f64 / 2.0);
                pos += 1;
            }
            0x07 => {
                let raw = read_u16_be(data, pos, "lux")?;
                payload.lux = Some(raw as f64);
                pos += 2;
            }
            0x08 => {
                let raw = read_u16_be(data, pos, "lux2")?;
                payload.lux2 = Some(raw as f64);
                pos += 2;
            }
            0x09 => {
                let raw = *data.get(pos).ok_or(DecodeError::TruncatedField("door report"))?;
                payload.door_report = Some(raw != 0);
                pos += 1;
            }
            0x0A => {
                let raw = read_u16_be(data, pos, "door count")?;
                payload.door_count = Some(raw as f64);
                pos += 2;
            }
            0x0B => {
                let raw = *data.get(pos).ok_or(DecodeError::TruncatedField("presence"))?;
                payload.presence = Some(raw != 0);
                pos += 1;
            }
            0x0D => {
                payload.check_in = Some(true);
            }
            0x15 => {
                let raw = *data
                    .get(pos)
                    .ok_or(DecodeError::TruncatedField("tamper report"))?;
                payload.tamper_report = Some(raw != 0);
                pos += 1;
            }
            _ => return Err(DecodeError::TruncatedField("unknown record type")),
        }
    }

    Ok(VendorPayload::Sensative(payload))
}
