//! Sensor-type registry: sensor type string to (decoder, converter) pair.
//!
//! The table is static and exact; aliases are listed explicitly rather than
//! inferred from prefixes. Lookup is case-insensitive, misses fall back to
//! the default pair so an unknown sensor type still produces a minimal
//! device object instead of failing the uplink.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use uplink_payload::{decode_empty, Decoder};

use crate::convert::{self, Converter};

pub struct Registry {
    entries: HashMap<&'static str, (Decoder, Converter)>,
    default: (Decoder, Converter),
}

impl Registry {
    fn new() -> Self {
        let mut entries: HashMap<&'static str, (Decoder, Converter)> = HashMap::new();

        entries.insert("elsys", (uplink_payload::elsys::decode, convert::elsys));
        entries.insert(
            "elsys_codec",
            (uplink_payload::elsys::decode, convert::elsys),
        );
        entries.insert("enviot", (uplink_payload::enviot::decode, convert::enviot));
        entries.insert(
            "milesight",
            (uplink_payload::milesight::decode, convert::milesight),
        );
        entries.insert(
            "milesight_am100",
            (uplink_payload::milesight::decode, convert::milesight),
        );
        entries.insert("niab-fls", (uplink_payload::niab::decode, convert::niab));
        entries.insert(
            "qalcosonic",
            (uplink_payload::qalcosonic::decode, convert::watermeter),
        );
        entries.insert(
            "tem_lab_14ns",
            (uplink_payload::senlab::decode, convert::senlab),
        );
        entries.insert(
            "strips_lora_ms_h",
            (uplink_payload::sensative::decode, convert::sensative),
        );
        entries.insert(
            "presence",
            (uplink_payload::sensative::decode, convert::sensative),
        );
        entries.insert(
            "cube02",
            (uplink_payload::sensefarm::decode, convert::sensefarm),
        );
        entries.insert(
            "sensefarm",
            (uplink_payload::sensefarm::decode, convert::sensefarm),
        );
        entries.insert(
            "vegapuls_air_41",
            (uplink_payload::vegapuls::decode, convert::vegapuls),
        );
        entries.insert(
            "airquality",
            (uplink_payload::airquality::decode, convert::airquality),
        );

        Self {
            entries,
            default: (decode_empty, convert::device),
        }
    }

    /// Resolves a sensor type to its (decoder, converter) pair. The third
    /// element reports whether the type was known; misses return the
    /// default pair.
    pub fn lookup(&self, sensor_type: &str) -> (Decoder, Converter, bool) {
        let key = sensor_type.to_ascii_lowercase();
        match self.entries.get(key.as_str()) {
            Some(&(decoder, converter)) => (decoder, converter, true),
            None => {
                debug!(sensor_type = %sensor_type, "unknown sensor type, using default pair");
                let (decoder, converter) = self.default;
                (decoder, converter, false)
            }
        }
    }
}

/// Shared immutable registry, built on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uplink_lwm2m::CanonicalObject;
    use uplink_payload::VendorPayload;

    #[test]
    fn lookup_is_case_insensitive() {
        let reg = registry();
        assert!(reg.lookup("Elsys").2);
        assert!(reg.lookup("QALCOSONIC").2);
        assert!(reg.lookup("Strips_Lora_MS_H").2);
    }

    #[test]
    fn aliases_resolve_to_the_same_decoder() {
        let reg = registry();
        let now = Utc.with_ymd_and_hms(2023, 2, 1, 12, 0, 0).unwrap();

        // niab frame: battery 3600 mV, distance 1000 mm
        let data = [0x0e, 0x10, 0x03, 0xe8];
        let (primary, _, _) = reg.lookup("sensefarm");
        let (alias, _, _) = reg.lookup("cube02");

        // sensefarm TLV: channel 0x01 battery 3600 mV
        let frame = [0x01, 0x0e, 0x10];
        assert_eq!(primary(1, &frame, None, now), alias(1, &frame, None, now));

        let (niab_decoder, _, found) = reg.lookup("niab-fls");
        assert!(found);
        assert!(matches!(
            niab_decoder(1, &data, None, now),
            Ok(VendorPayload::Niab(_))
        ));
    }

    #[test]
    fn unknown_type_yields_default_pair() {
        let reg = registry();
        let now = Utc.with_ymd_and_hms(2023, 2, 1, 12, 0, 0).unwrap();
        let (decoder, converter, found) = reg.lookup("mystery-sensor-9000");
        assert!(!found);

        let payload = decoder(1, &[0xff; 8], None, now).unwrap();
        assert_eq!(payload, VendorPayload::Empty);

        let objects = converter(&payload, "dev-1", now, now).unwrap();
        assert_eq!(objects.len(), 1);
        assert!(matches!(objects[0], CanonicalObject::Device(_)));
    }
}
