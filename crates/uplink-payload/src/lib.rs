//! Vendor-specific uplink payload decoders.
//!
//! Each module decodes one vendor family from raw bytes (or the network
//! server's pre-decoded JSON object) into its payload struct. Decoders are
//! pure: current time is always passed in by the caller, never read from a
//! global clock.

pub mod airquality;
pub mod elsys;
pub mod enviot;
mod error;
pub mod milesight;
pub mod niab;
pub mod qalcosonic;
pub mod senlab;
pub mod sensative;
pub mod sensefarm;
pub mod vegapuls;

pub use error::{DecodeError, Result};

use chrono::{DateTime, Utc};

/// Closed set of decoded vendor payloads.
///
/// The registry binds each decoder to the converter that understands its
/// variant, so converters match on the variant they expect instead of
/// downcasting.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorPayload {
    Elsys(elsys::ElsysPayload),
    Enviot(enviot::EnviotPayload),
    Milesight(milesight::MilesightPayload),
    Niab(niab::NiabPayload),
    QalcosonicVolume(qalcosonic::QalcosonicVolumePayload),
    QalcosonicAlarm(qalcosonic::QalcosonicAlarmPayload),
    Senlab(senlab::SenlabPayload),
    Sensative(sensative::SensativePayload),
    Sensefarm(sensefarm::SensefarmPayload),
    Vegapuls(vegapuls::VegapulsPayload),
    AirQuality(airquality::AirQualityPayload),
    /// Produced by the fallback decoder for unrecognized sensor types.
    Empty,
}

/// Common decoder signature: fPort, raw payload bytes, optional pre-decoded
/// JSON object, and the injected current time.
pub type Decoder = fn(u8, &[u8], Option<&serde_json::Value>, DateTime<Utc>) -> Result<VendorPayload>;

/// Fallback decoder: always succeeds with an empty payload so an unknown
/// sensor type never hard-fails the pipeline.
pub fn decode_empty(
    _f_port: u8,
    _data: &[u8],
    _object: Option<&serde_json::Value>,
    _now: DateTime<Utc>,
) -> Result<VendorPayload> {
    Ok(VendorPayload::Empty)
}
