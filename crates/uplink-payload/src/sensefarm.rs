//! Sensefarm soil sensors (Cube02): big-endian records keyed by a channel
//! byte. Unknown channels are skipped as 20-byte blocks, which keeps older
//! firmware compatible with frames that append new record kinds.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{DecodeError, Result, VendorPayload};

/// Block size advanced past a channel byte this decoder does not know.
const UNKNOWN_CHANNEL_SKIP: usize = 20;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensefarmPayload {
    /// Battery voltage, millivolts.
    pub battery: Option<f64>,
    /// Soil resistances, ohm. One per probe record in frame order.
    pub resistances: Vec<f64>,
    /// Soil moisture as pressure, kPa. One per probe record in frame order.
    pub soil_moisture: Vec<f64>,
    /// Soil temperature, degrees Celsius.
    pub temperature: Option<f64>,
}

fn take<const N: usize>(data: &[u8], offset: usize, field: &'static str) -> Result<[u8; N]> {
    let bytes = data
        .get(offset..offset + N)
        .ok_or(DecodeError::TruncatedField(field))?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
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

    let mut payload = SensefarmPayload::default();
    let mut pos = 0;

    while pos < data.len() {
        let channel = data[pos];
        pos += 1;

        match channel {
            0x01 => {
                let raw = u16::from_be_bytes(take::<2>(data, pos, "battery")?);
                payload.battery = Some(raw as f64);
                pos += 2;
            }
            0x02 => {
                let raw = u32::from_be_bytes(take::<4>(data, pos, "resistance")?);
                payload.resistances.push(raw as f64);
                pos += 4;
            }
            0x04 => {
                let raw = u16::from_be_bytes(take::<2>(data, pos, "soil moisture")?);
                payload.soil_moisture.push(raw as f64);
                pos += 2;
            }
            0x05 => {
                let raw = f32::from_be_bytes(take::<4>(data, pos, "temperature")?);
                payload.temperature = Some(raw as f64);
                pos += 4;
            }
            _ => {
                warn!(channel, "skipping unknown sensefarm channel");
                pos += UNKNOWN_CHANNEL_SKIP;
            }
        }
    }

    Ok(VendorPayload::Sensefarm(payload))
}
