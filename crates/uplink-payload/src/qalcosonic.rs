//! Qalcosonic W1 ultrasonic water meters.
//!
//! One dispatcher covers four frame shapes. Selection is by payload length
//! first: 5 bytes is an alarm packet, 51-52 bytes the long frame (w1h) with
//! bit-packed hourly deltas, 43-47 bytes the enhanced frame (w1e). A w1e
//! frame whose timestamps land too far in the future is re-decoded as the
//! temperature frame (w1t), which carries an extra 2-byte temperature field
//! at the same offset where w1e expects its log time. That heuristic is the
//! only way to tell the two apart since their lengths overlap.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{DecodeError, Result, VendorPayload};

const ALARM_LEN: usize = 5;

/// Clock-skew ceiling for the long and enhanced frames. An epoch further
/// ahead of wall-clock than this is not skew; for the enhanced frame it
/// means the bytes are really a temperature frame.
const ACCEPTED_TIME_DELTA_HOURS: i64 = 24;

/// Clock-skew ceiling for the temperature frame. Wider than the enhanced
/// window; kept separate because the two call sites have always differed.
const ACCEPTED_TIME_DELTA_W1T_HOURS: i64 = 72;

/// Frame shape a volume payload was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVersion {
    W1h,
    W1e,
    W1t,
}

impl FrameVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameVersion::W1h => "w1h",
            FrameVersion::W1e => "w1e",
            FrameVersion::W1t => "w1t",
        }
    }
}

/// One reading of the meter's hourly history. The last entry is the most
/// recent logged hour; the frame's current volume is newer still.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeEntry {
    /// Increment since the previous entry, liters.
    pub delta: u32,
    /// Running meter total, liters.
    pub cumulated: u32,
    /// Time of this reading, not of the uplink.
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QalcosonicVolumePayload {
    pub frame: FrameVersion,
    /// Meter clock at transmission, clamped to `now` when slightly ahead.
    pub current_time: DateTime<Utc>,
    pub status_code: u8,
    pub messages: Vec<String>,
    /// Meter total at transmission, liters.
    pub current_volume: u32,
    /// Raw temperature register, temperature frame only.
    pub temperature: Option<u16>,
    /// Hourly history, oldest first.
    pub volumes: Vec<VolumeEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QalcosonicAlarmPayload {
    pub current_time: DateTime<Utc>,
    pub status_code: u8,
    pub messages: Vec<String>,
}

pub fn decode(
    _f_port: u8,
    data: &[u8],
    _object: Option<&serde_json::Value>,
    now: DateTime<Utc>,
) -> Result<VendorPayload> {
    match data.len() {
        ALARM_LEN => decode_alarm(data).map(VendorPayload::QalcosonicAlarm),
        43..=47 => match decode_w1e(data, now) {
            Err(DecodeError::TimeTooFarOff) => {
                decode_w1t(data, now).map(VendorPayload::QalcosonicVolume)
            }
            other => other.map(VendorPayload::QalcosonicVolume),
        },
        51..=52 => decode_w1h(data, now).map(VendorPayload::QalcosonicVolume),
        n => Err(DecodeError::UnknownFrameLength(n)),
    }
}

fn read_u16_le(data: &[u8], offset: usize, field: &'static str) -> Result<u16> {
    let bytes = data
        .get(offset..offset + 2)
        .ok_or(DecodeError::TruncatedField(field))?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32_le(data: &[u8], offset: usize, field: &'static str) -> Result<u32> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or(DecodeError::TruncatedField(field))?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_epoch(data: &[u8], offset: usize, field: &'static str) -> Result<DateTime<Utc>> {
    let secs = read_u32_le(data, offset, field)?;
    DateTime::from_timestamp(secs as i64, 0)
        .ok_or_else(|| DecodeError::InvalidPayload(format!("{field}: epoch out of range")))
}

fn decode_alarm(data: &[u8]) -> Result<QalcosonicAlarmPayload> {
    let current_time = read_epoch(data, 0, "alarm epoch")?;
    let status_code = data[4];
    Ok(QalcosonicAlarmPayload {
        current_time,
        status_code,
        messages: alarm_messages(status_code),
    })
}

fn decode_w1e(data: &[u8], now: DateTime<Utc>) -> Result<QalcosonicVolumePayload> {
    let mut current_time = read_epoch(data, 0, "epoch")?;
    let status_code = data[4];
    let current_volume = read_u32_le(data, 5, "current volume")?;
    let log_time = read_epoch(data, 9, "log epoch")?;
    let log_volume = read_u32_le(data, 13, "log volume")?;

    if log_time > now {
        return Err(DecodeError::TimeTooFarOff);
    }
    if current_time > now {
        if current_time > now + Duration::hours(ACCEPTED_TIME_DELTA_HOURS) {
            return Err(DecodeError::TimeTooFarOff);
        }
        current_time = now;
    }

    let volumes = unpacked_volumes(data, 17, log_time, log_volume)?;

    Ok(QalcosonicVolumePayload {
        frame: FrameVersion::W1e,
        current_time,
        status_code,
        messages: status_messages(status_code),
        current_volume,
        temperature: None,
        volumes,
    })
}

fn decode_w1t(data: &[u8], now: DateTime<Utc>) -> Result<QalcosonicVolumePayload> {
    let mut current_time = read_epoch(data, 0, "epoch")?;
    let status_code = data[4];
    let current_volume = read_u32_le(data, 5, "current volume")?;
    let temperature = read_u16_le(data, 9, "temperature")?;
    let log_time = read_epoch(data, 11, "log epoch")?;
    let log_volume = read_u32_le(data, 15, "log volume")?;

    if log_time > now {
        return Err(DecodeError::TimeTooFarOff);
    }
    if current_time > now {
        if current_time > now + Duration::hours(ACCEPTED_TIME_DELTA_W1T_HOURS) {
            return Err(DecodeError::TimeTooFarOff);
        }
        current_time = now;
    }

    let volumes = unpacked_volumes(data, 19, log_time, log_volume)?;

    Ok(QalcosonicVolumePayload {
        frame: FrameVersion::W1t,
        current_time,
        status_code,
        messages: status_messages(status_code),
        current_volume,
        temperature: Some(temperature),
        volumes,
    })
}

fn decode_w1h(data: &[u8], now: DateTime<Utc>) -> Result<QalcosonicVolumePayload> {
    let current_time = read_epoch(data, 0, "epoch")?;
    let status_code = data[4];
    let log_volume = read_u32_le(data, 5, "log volume")?;

    if current_time > now + Duration::hours(ACCEPTED_TIME_DELTA_HOURS) {
        return Err(DecodeError::TimeTooFarOff);
    }

    // History starts at 01:00 the calendar day before the frame's epoch.
    let log_date = current_time
        .date_naive()
        .pred_opt()
        .ok_or_else(|| DecodeError::InvalidPayload("epoch date underflow".to_string()))?;
    let log_naive = log_date
        .and_hms_opt(1, 0, 0)
        .ok_or_else(|| DecodeError::InvalidPayload("invalid log time".to_string()))?;
    let log_time = Utc.from_utc_datetime(&log_naive);

    let mut volumes = Vec::with_capacity(25);
    volumes.push(VolumeEntry {
        delta: 0,
        cumulated: log_volume,
        timestamp: log_time,
    });

    let mut cumulated = log_volume;
    let mut timestamp = log_time;
    for quad in 0..6 {
        let offset = 9 + quad * 7;
        let b = data
            .get(offset..offset + 7)
            .ok_or(DecodeError::TruncatedField("delta volumes"))?;

        // Four 14-bit values per 7-byte group. Each value draws its bits
        // from one or two adjacent bytes at its own shift; the layout is
        // not uniform, so the four extractions are spelled out.
        let deltas = [
            ((b[1] as u16 & 0x3F) << 8) | b[0] as u16,
            ((b[3] as u16 & 0x0F) << 10) | ((b[2] as u16) << 2) | (b[1] as u16 >> 6),
            ((b[5] as u16 & 0x03) << 12) | ((b[4] as u16) << 4) | (b[3] as u16 >> 4),
            ((b[6] as u16) << 6) | (b[5] as u16 >> 2),
        ];

        for delta in deltas {
            cumulated = cumulated.saturating_add(delta as u32);
            timestamp += Duration::hours(1);
            volumes.push(VolumeEntry {
                delta: delta as u32,
                cumulated,
                timestamp,
            });
        }
    }

    Ok(QalcosonicVolumePayload {
        frame: FrameVersion::W1h,
        current_time,
        status_code,
        messages: status_messages(status_code),
        current_volume: cumulated,
        temperature: None,
        volumes,
    })
}

/// Plain 16-bit deltas following the log anchor, consumed to end-of-buffer.
fn unpacked_volumes(
    data: &[u8],
    start: usize,
    log_time: DateTime<Utc>,
    log_volume: u32,
) -> Result<Vec<VolumeEntry>> {
    let mut volumes = vec![VolumeEntry {
        delta: 0,
        cumulated: log_volume,
        timestamp: log_time,
    }];

    let mut cumulated = log_volume;
    let mut timestamp = log_time;
    let mut pos = start;
    while pos + 2 <= data.len() {
        let delta = read_u16_le(data, pos, "delta volume")?;
        cumulated = cumulated.saturating_add(delta as u32);
        timestamp += Duration::hours(1);
        volumes.push(VolumeEntry {
            delta: delta as u32,
            cumulated,
            timestamp,
        });
        pos += 2;
    }

    Ok(volumes)
}

/// Status bitmask of the multi-byte frames. Freeze, leak, burst and
/// backflow are mutually exclusive outputs; the mask comparisons below
/// encode their priority and must not be simplified to single-bit tests.
fn status_messages(code: u8) -> Vec<String> {
    const POWER_LOW: u8 = 0x04;
    const PERMANENT_ERROR: u8 = 0x08;
    const TEMPORARY_ERROR: u8 = 0x10;
    const EMPTY_SPOOL: u8 = 0x10;
    const LEAK: u8 = 0x20;
    const BURST: u8 = 0xA0;
    const BACKFLOW: u8 = 0x60;
    const FREEZE: u8 = 0x80;

    let mut messages: Vec<String> = Vec::new();

    if code == 0x00 {
        messages.push("No error".to_string());
    }
    if code & POWER_LOW == POWER_LOW {
        messages.push("Power low".to_string());
    }
    if code & PERMANENT_ERROR == PERMANENT_ERROR {
        messages.push("Permanent error".to_string());
    }
    if code & TEMPORARY_ERROR == TEMPORARY_ERROR {
        messages.push("Temporary error".to_string());
    }

    if code & EMPTY_SPOOL == EMPTY_SPOOL
        && code & LEAK != LEAK
        && code & BURST != BURST
        && code & BACKFLOW != BACKFLOW
        && code & FREEZE != FREEZE
    {
        messages.push("Empty spool".to_string());
    }

    if code & LEAK == LEAK
        && code & BURST != BURST
        && code & BACKFLOW != BACKFLOW
        && code & FREEZE != FREEZE
    {
        messages.push("Leak".to_string());
    }
    if code & BURST == BURST {
        messages.push("Burst".to_string());
    }
    if code & BACKFLOW == BACKFLOW && code & BURST != BURST {
        messages.push("Backflow".to_string());
    }
    if code & FREEZE == FREEZE && code & BURST != BURST && code & BACKFLOW != BACKFLOW {
        messages.push("Freeze".to_string());
    }

    if messages.is_empty() {
        messages.push("Unknown".to_string());
    }

    messages
}

/// Status bits of the 5-byte alarm packet. This is a different language
/// from the frame status byte and the two tables stay separate.
fn alarm_messages(code: u8) -> Vec<String> {
    if code == 0x00 {
        return vec!["No error".to_string()];
    }

    let mut messages: Vec<String> = Vec::new();
    if code & 0x01 != 0 {
        messages.push("Leakage".to_string());
    }
    if code & 0x02 != 0 {
        messages.push("Burst".to_string());
    }
    if code & 0x04 != 0 {
        messages.push("Low temperature".to_string());
    }
    if code & 0x08 != 0 {
        messages.push("Tamper".to_string());
    }
    if code & 0x10 != 0 {
        messages.push("Negative flow".to_string());
    }

    if messages.is_empty() {
        messages.push("Unknown".to_string());
    }

    messages
}
