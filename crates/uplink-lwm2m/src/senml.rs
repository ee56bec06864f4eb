use serde::{Deserialize, Serialize};

use crate::{CanonicalObject, SenMlSerialize};

/// One SenML wire record. A serialized object is a run of records sharing
/// the base name/time carried by the first record of the run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SenMlRecord {
    #[serde(rename = "bn", skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,
    #[serde(rename = "bt", skip_serializing_if = "Option::is_none")]
    pub base_time: Option<i64>,
    #[serde(rename = "bu", skip_serializing_if = "Option::is_none")]
    pub base_unit: Option<String>,
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "u", skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(rename = "v", skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(rename = "vs", skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(rename = "vb", skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
    #[serde(rename = "s", skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
}

/// Serialize a batch of canonical objects into one flat record sequence.
///
/// Each object contributes a self-contained run opened by its own base-name
/// record, so runs are never interleaved regardless of batch composition.
pub fn to_senml_pack(objects: &[CanonicalObject]) -> Vec<SenMlRecord> {
    objects.iter().flat_map(|o| o.to_records()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Temperature, WaterMeter};
    use chrono::{TimeZone, Utc};

    #[test]
    fn base_record_carries_name_time_and_urn() {
        let ts = Utc.with_ymd_and_hms(2020, 9, 9, 12, 32, 21).unwrap();
        let temp = Temperature {
            device_id: "intern-a81758fffe051d02".to_string(),
            timestamp: ts,
            value: 22.5,
        };

        let records = CanonicalObject::Temperature(temp).to_records();
        assert_eq!(records.len(), 2);

        let base = &records[0];
        assert_eq!(
            base.base_name.as_deref(),
            Some("intern-a81758fffe051d02/3303/")
        );
        assert_eq!(base.base_time, Some(ts.timestamp()));
        assert_eq!(base.name.as_deref(), Some("0"));
        assert_eq!(base.string_value.as_deref(), Some("urn:oma:lwm2m:ext:3303"));

        let value = &records[1];
        assert_eq!(value.name.as_deref(), Some("5700"));
        assert_eq!(value.unit.as_deref(), Some("Cel"));
        assert_eq!(value.value, Some(22.5));
    }

    #[test]
    fn json_omits_absent_slots() {
        let ts = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
        let temp = Temperature {
            device_id: "dev".to_string(),
            timestamp: ts,
            value: -0.1,
        };

        let json = serde_json::to_string(&CanonicalObject::Temperature(temp).to_records()).unwrap();
        assert!(json.contains(r#""bn":"dev/3303/""#));
        assert!(!json.contains(r#""vb""#));
        assert!(!json.contains(r#""s""#));
    }

    #[test]
    fn round_trip_preserves_identity_and_values() {
        let ts = Utc.with_ymd_and_hms(2020, 9, 8, 22, 0, 0).unwrap();
        let meter = WaterMeter {
            device_id: "watermeter-01".to_string(),
            timestamp: ts,
            cumulated_volume: 284.554,
            type_of_meter: Some("w1e".to_string()),
            leak_detected: Some(true),
            backflow_detected: Some(false),
        };

        let records = CanonicalObject::WaterMeter(meter).to_records();
        let json = serde_json::to_string(&records).unwrap();
        let parsed: Vec<SenMlRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);

        let base = &parsed[0];
        assert_eq!(base.base_name.as_deref(), Some("watermeter-01/3424/"));
        assert_eq!(base.base_time, Some(ts.timestamp()));

        assert_eq!(parsed[1].name.as_deref(), Some("1"));
        assert_eq!(parsed[1].unit.as_deref(), Some("m3"));
        assert_eq!(parsed[1].value, Some(284.554));
        assert_eq!(parsed[2].name.as_deref(), Some("3"));
        assert_eq!(parsed[2].string_value.as_deref(), Some("w1e"));
        assert_eq!(parsed[3].name.as_deref(), Some("10"));
        assert_eq!(parsed[3].bool_value, Some(true));
        assert_eq!(parsed[4].name.as_deref(), Some("11"));
        assert_eq!(parsed[4].bool_value, Some(false));
    }

    #[test]
    fn pack_keeps_one_base_name_run_per_object() {
        let ts = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
        let objects = vec![
            CanonicalObject::Temperature(Temperature {
                device_id: "dev".to_string(),
                timestamp: ts,
                value: 1.0,
            }),
            CanonicalObject::Temperature(Temperature {
                device_id: "dev".to_string(),
                timestamp: ts,
                value: 2.0,
            }),
        ];

        let pack = to_senml_pack(&objects);
        assert_eq!(pack.len(), 4);
        assert!(pack[0].base_name.is_some());
        assert!(pack[1].base_name.is_none());
        assert!(pack[2].base_name.is_some());
        assert!(pack[3].base_name.is_none());
    }
}
