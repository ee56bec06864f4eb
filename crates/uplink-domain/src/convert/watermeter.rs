//! Water meter conversion: one LWM2M 3424 instance per reading.
//!
//! A volume frame expands into its full log history, oldest reading first,
//! with the live reading last. Alarm frames carry no volume and map to a
//! minimal device object stamped with the meter clock.

use chrono::{DateTime, Utc};

use uplink_lwm2m::{CanonicalObject, Device, WaterMeter};
use uplink_payload::qalcosonic::QalcosonicVolumePayload;
use uplink_payload::VendorPayload;

use crate::convert::push_unless_future;
use crate::error::{ConvertError, ConvertResult};

const LITERS_PER_CUBIC_METER: f64 = 1000.0;

pub fn watermeter(
    payload: &VendorPayload,
    device_id: &str,
    _timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    match payload {
        VendorPayload::QalcosonicVolume(p) => Ok(expand_volumes(p, device_id, now)),
        VendorPayload::QalcosonicAlarm(p) => Ok(vec![CanonicalObject::Device(Device::new(
            device_id,
            p.current_time,
        ))]),
        _ => Err(ConvertError::PayloadMismatch {
            expected: "qalcosonic",
        }),
    }
}

fn expand_volumes(
    payload: &QalcosonicVolumePayload,
    device_id: &str,
    now: DateTime<Utc>,
) -> Vec<CanonicalObject> {
    let leak = contains_message(&payload.messages, "leak");
    let backflow = contains_message(&payload.messages, "backflow");
    let meter_type = payload.frame.as_str();

    let mut objects = Vec::with_capacity(payload.volumes.len() + 1);
    for entry in &payload.volumes {
        push_unless_future(
            &mut objects,
            reading(
                device_id,
                entry.timestamp,
                entry.cumulated,
                meter_type,
                leak,
                backflow,
            ),
            now,
        );
    }
    push_unless_future(
        &mut objects,
        reading(
            device_id,
            payload.current_time,
            payload.current_volume,
            meter_type,
            leak,
            backflow,
        ),
        now,
    );
    objects
}

fn reading(
    device_id: &str,
    timestamp: DateTime<Utc>,
    liters: u32,
    meter_type: &str,
    leak: bool,
    backflow: bool,
) -> CanonicalObject {
    CanonicalObject::WaterMeter(WaterMeter {
        device_id: device_id.to_string(),
        timestamp,
        cumulated_volume: liters as f64 / LITERS_PER_CUBIC_METER,
        type_of_meter: Some(meter_type.to_string()),
        leak_detected: Some(leak),
        backflow_detected: Some(backflow),
    })
}

fn contains_message(messages: &[String], needle: &str) -> bool {
    messages.iter().any(|m| m.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uplink_payload::qalcosonic::{FrameVersion, QalcosonicAlarmPayload, VolumeEntry};
    use uplink_payload::VendorPayload;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap()
    }

    fn volume_payload(messages: Vec<String>) -> QalcosonicVolumePayload {
        let base = Utc.with_ymd_and_hms(2023, 6, 1, 1, 0, 0).unwrap();
        QalcosonicVolumePayload {
            frame: FrameVersion::W1e,
            current_time: Utc.with_ymd_and_hms(2023, 6, 1, 11, 30, 0).unwrap(),
            status_code: 0x00,
            messages,
            current_volume: 123_500,
            temperature: None,
            volumes: vec![
                VolumeEntry {
                    delta: 0,
                    cumulated: 123_000,
                    timestamp: base,
                },
                VolumeEntry {
                    delta: 250,
                    cumulated: 123_250,
                    timestamp: base + chrono::Duration::hours(1),
                },
            ],
        }
    }

    #[test]
    fn history_expands_oldest_first_with_current_reading_last() {
        let payload = VendorPayload::QalcosonicVolume(volume_payload(vec!["No error".into()]));

        let objects = watermeter(&payload, "meter-1", now(), now()).unwrap();
        assert_eq!(objects.len(), 3);

        let volumes: Vec<f64> = objects
            .iter()
            .map(|o| {
                let CanonicalObject::WaterMeter(m) = o else {
                    panic!("expected water meter");
                };
                m.cumulated_volume
            })
            .collect();
        assert_eq!(volumes, vec![123.0, 123.25, 123.5]);

        let CanonicalObject::WaterMeter(last) = &objects[2] else {
            panic!("expected water meter");
        };
        assert_eq!(
            last.timestamp,
            Utc.with_ymd_and_hms(2023, 6, 1, 11, 30, 0).unwrap()
        );
        assert_eq!(last.type_of_meter.as_deref(), Some("w1e"));
        assert_eq!(last.leak_detected, Some(false));
        assert_eq!(last.backflow_detected, Some(false));
    }

    #[test]
    fn leak_and_backflow_flags_follow_status_messages() {
        let payload = VendorPayload::QalcosonicVolume(volume_payload(vec![
            "LEAK".into(),
            "Backflow".into(),
        ]));

        let objects = watermeter(&payload, "meter-1", now(), now()).unwrap();
        for object in &objects {
            let CanonicalObject::WaterMeter(m) = object else {
                panic!("expected water meter");
            };
            assert_eq!(m.leak_detected, Some(true));
            assert_eq!(m.backflow_detected, Some(true));
        }
    }

    #[test]
    fn future_readings_are_dropped() {
        let mut p = volume_payload(vec![]);
        p.volumes[1].timestamp = now() + chrono::Duration::hours(2);
        let payload = VendorPayload::QalcosonicVolume(p);

        let objects = watermeter(&payload, "meter-1", now(), now()).unwrap();
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn alarm_maps_to_device_at_meter_time() {
        let alarm_time = Utc.with_ymd_and_hms(2023, 6, 1, 9, 15, 0).unwrap();
        let payload = VendorPayload::QalcosonicAlarm(QalcosonicAlarmPayload {
            current_time: alarm_time,
            status_code: 0x02,
            messages: vec!["Burst".into()],
        });

        let objects = watermeter(&payload, "meter-1", now(), now()).unwrap();
        assert_eq!(objects.len(), 1);
        let CanonicalObject::Device(d) = &objects[0] else {
            panic!("expected device");
        };
        assert_eq!(d.timestamp, alarm_time);
    }

    #[test]
    fn non_qalcosonic_payload_is_rejected() {
        assert_eq!(
            watermeter(&VendorPayload::Empty, "meter-1", now(), now()),
            Err(ConvertError::PayloadMismatch {
                expected: "qalcosonic"
            })
        );
    }
}
