//! Converters from decoded vendor payloads to canonical objects.
//!
//! Converters are pure: device id, uplink timestamp and current time come
//! from the caller. A candidate measurement stamped after `now` is dropped
//! with a warning rather than propagated, so a sensor with a broken clock
//! degrades to fewer measurements instead of poisoning downstream
//! consumers.

pub mod watermeter;

pub use watermeter::watermeter;

use chrono::{DateTime, Utc};
use tracing::warn;

use uplink_lwm2m::{
    AirQuality, Battery, CanonicalObject, Conductivity, Device, DigitalInput, Distance, Humidity,
    Illuminance, PeopleCounter, Presence, Pressure, SenMlSerialize, Temperature,
};
use uplink_payload::VendorPayload;

use crate::error::{ConvertError, ConvertResult};

/// Common converter signature: payload, owning device id, uplink timestamp,
/// injected current time.
pub type Converter = fn(
    &VendorPayload,
    &str,
    DateTime<Utc>,
    DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>>;

fn push_unless_future(
    objects: &mut Vec<CanonicalObject>,
    object: CanonicalObject,
    now: DateTime<Utc>,
) {
    if object.timestamp() > now {
        warn!(
            device_id = %object.device_id(),
            object_id = object.object_id(),
            timestamp = %object.timestamp(),
            "dropping measurement with future timestamp"
        );
        return;
    }
    objects.push(object);
}

/// Fallback converter: one minimal device object, nothing else.
pub fn device(
    payload: &VendorPayload,
    device_id: &str,
    timestamp: DateTime<Utc>,
    _now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    let VendorPayload::Empty = payload else {
        return Err(ConvertError::PayloadMismatch { expected: "empty" });
    };
    Ok(vec![CanonicalObject::Device(Device::new(
        device_id, timestamp,
    ))])
}

pub fn elsys(
    payload: &VendorPayload,
    device_id: &str,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    let VendorPayload::Elsys(p) = payload else {
        return Err(ConvertError::PayloadMismatch { expected: "elsys" });
    };

    let mut objects = Vec::new();

    // An external probe reports the medium of interest; the internal
    // reading is die temperature on those devices.
    if let Some(value) = p.external_temperature.or(p.temperature) {
        push_unless_future(
            &mut objects,
            CanonicalObject::Temperature(Temperature {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(value) = p.humidity {
        push_unless_future(
            &mut objects,
            CanonicalObject::Humidity(Humidity {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(value) = p.light {
        push_unless_future(
            &mut objects,
            CanonicalObject::Illuminance(Illuminance {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(co2) = p.co2 {
        push_unless_future(
            &mut objects,
            CanonicalObject::AirQuality(AirQuality {
                device_id: device_id.to_string(),
                timestamp,
                co2: Some(co2),
                pm1: None,
                pm25: None,
                pm10: None,
                no2: None,
            }),
            now,
        );
    }
    if let Some(state) = p.digital {
        push_unless_future(
            &mut objects,
            CanonicalObject::DigitalInput(DigitalInput {
                device_id: device_id.to_string(),
                timestamp,
                state,
                counter: None,
            }),
            now,
        );
    }
    if let Some(state) = p.waterleak {
        push_unless_future(
            &mut objects,
            CanonicalObject::Presence(Presence {
                device_id: device_id.to_string(),
                timestamp,
                state,
            }),
            now,
        );
    }
    if let Some(hpa) = p.pressure {
        push_unless_future(
            &mut objects,
            CanonicalObject::Pressure(Pressure {
                device_id: device_id.to_string(),
                timestamp,
                value: hpa * 100.0,
            }),
            now,
        );
    }
    if let Some(vdd) = p.vdd {
        push_unless_future(
            &mut objects,
            CanonicalObject::Battery(Battery {
                device_id: device_id.to_string(),
                timestamp,
                level: None,
                voltage: Some(vdd),
            }),
            now,
        );
    }

    Ok(objects)
}

pub fn enviot(
    payload: &VendorPayload,
    device_id: &str,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    let VendorPayload::Enviot(p) = payload else {
        return Err(ConvertError::PayloadMismatch { expected: "enviot" });
    };

    let mut objects = Vec::new();

    if let Some(value) = p.temperature {
        push_unless_future(
            &mut objects,
            CanonicalObject::Temperature(Temperature {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(value) = p.humidity {
        push_unless_future(
            &mut objects,
            CanonicalObject::Humidity(Humidity {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(level) = p.battery {
        push_unless_future(
            &mut objects,
            CanonicalObject::Battery(Battery {
                device_id: device_id.to_string(),
                timestamp,
                level: Some(level),
                voltage: p.vdd,
            }),
            now,
        );
    }
    if let Some(value) = p.snow_height {
        push_unless_future(
            &mut objects,
            CanonicalObject::Distance(Distance {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(hpa) = p.pressure {
        push_unless_future(
            &mut objects,
            CanonicalObject::Pressure(Pressure {
                device_id: device_id.to_string(),
                timestamp,
                value: hpa * 100.0,
            }),
            now,
        );
    }

    Ok(objects)
}

pub fn milesight(
    payload: &VendorPayload,
    device_id: &str,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    let VendorPayload::Milesight(p) = payload else {
        return Err(ConvertError::PayloadMismatch { expected: "milesight" });
    };

    let mut objects = Vec::new();

    if let Some(level) = p.battery {
        push_unless_future(
            &mut objects,
            CanonicalObject::Battery(Battery {
                device_id: device_id.to_string(),
                timestamp,
                level: Some(level),
                voltage: None,
            }),
            now,
        );
    }
    if let Some(value) = p.temperature {
        push_unless_future(
            &mut objects,
            CanonicalObject::Temperature(Temperature {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(value) = p.humidity {
        push_unless_future(
            &mut objects,
            CanonicalObject::Humidity(Humidity {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(mm) = p.distance {
        push_unless_future(
            &mut objects,
            CanonicalObject::Distance(Distance {
                device_id: device_id.to_string(),
                timestamp,
                value: mm / 1000.0,
            }),
            now,
        );
    }
    if let Some(people_in) = p.people_in {
        push_unless_future(
            &mut objects,
            CanonicalObject::PeopleCounter(PeopleCounter {
                device_id: device_id.to_string(),
                timestamp,
                actual_number_of_persons: people_in,
                daily_number_of_persons: None,
            }),
            now,
        );
    }

    Ok(objects)
}

pub fn niab(
    payload: &VendorPayload,
    device_id: &str,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    let VendorPayload::Niab(p) = payload else {
        return Err(ConvertError::PayloadMismatch { expected: "niab" });
    };

    let mut objects = Vec::new();

    push_unless_future(
        &mut objects,
        CanonicalObject::Battery(Battery {
            device_id: device_id.to_string(),
            timestamp,
            level: None,
            voltage: Some(p.battery),
        }),
        now,
    );
    if let Some(mm) = p.distance {
        push_unless_future(
            &mut objects,
            CanonicalObject::Distance(Distance {
                device_id: device_id.to_string(),
                timestamp,
                value: mm / 1000.0,
            }),
            now,
        );
    }

    Ok(objects)
}

pub fn senlab(
    payload: &VendorPayload,
    device_id: &str,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    let VendorPayload::Senlab(p) = payload else {
        return Err(ConvertError::PayloadMismatch { expected: "senlab" });
    };

    let mut objects = Vec::new();

    push_unless_future(
        &mut objects,
        CanonicalObject::Battery(Battery {
            device_id: device_id.to_string(),
            timestamp,
            level: Some(p.battery),
            voltage: None,
        }),
        now,
    );
    push_unless_future(
        &mut objects,
        CanonicalObject::Temperature(Temperature {
            device_id: device_id.to_string(),
            timestamp,
            value: p.temperature,
        }),
        now,
    );

    Ok(objects)
}

pub fn sensative(
    payload: &VendorPayload,
    device_id: &str,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    let VendorPayload::Sensative(p) = payload else {
        return Err(ConvertError::PayloadMismatch { expected: "sensative" });
    };

    let mut objects = Vec::new();

    if let Some(level) = p.battery {
        push_unless_future(
            &mut objects,
            CanonicalObject::Battery(Battery {
                device_id: device_id.to_string(),
                timestamp,
                level: Some(level),
                voltage: None,
            }),
            now,
        );
    }
    if let Some(value) = p.temperature {
        push_unless_future(
            &mut objects,
            CanonicalObject::Temperature(Temperature {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(value) = p.humidity {
        push_unless_future(
            &mut objects,
            CanonicalObject::Humidity(Humidity {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(value) = p.lux {
        push_unless_future(
            &mut objects,
            CanonicalObject::Illuminance(Illuminance {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }
    if let Some(state) = p.door_report {
        push_unless_future(
            &mut objects,
            CanonicalObject::DigitalInput(DigitalInput {
                device_id: device_id.to_string(),
                timestamp,
                state,
                counter: p.door_count,
            }),
            now,
        );
    }
    if let Some(state) = p.presence {
        push_unless_future(
            &mut objects,
            CanonicalObject::Presence(Presence {
                device_id: device_id.to_string(),
                timestamp,
                state,
            }),
            now,
        );
    }

    Ok(objects)
}

pub fn sensefarm(
    payload: &VendorPayload,
    device_id: &str,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    let VendorPayload::Sensefarm(p) = payload else {
        return Err(ConvertError::PayloadMismatch { expected: "sensefarm" });
    };

    let mut objects = Vec::new();

    if let Some(voltage) = p.battery {
        push_unless_future(
            &mut objects,
            CanonicalObject::Battery(Battery {
                device_id: device_id.to_string(),
                timestamp,
                level: None,
                voltage: Some(voltage),
            }),
            now,
        );
    }
    if let Some(kpa) = p.soil_moisture.first() {
        push_unless_future(
            &mut objects,
            CanonicalObject::Pressure(Pressure {
                device_id: device_id.to_string(),
                timestamp,
                value: kpa * 1000.0,
            }),
            now,
        );
    }
    if let Some(&ohm) = p.resistances.first() {
        if ohm > 0.0 {
            push_unless_future(
                &mut objects,
                CanonicalObject::Conductivity(Conductivity {
                    device_id: device_id.to_string(),
                    timestamp,
                    value: 1.0 / ohm,
                }),
                now,
            );
        }
    }
    if let Some(value) = p.temperature {
        push_unless_future(
            &mut objects,
            CanonicalObject::Temperature(Temperature {
                device_id: device_id.to_string(),
                timestamp,
                value,
            }),
            now,
        );
    }

    Ok(objects)
}

pub fn vegapuls(
    payload: &VendorPayload,
    device_id: &str,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    let VendorPayload::Vegapuls(p) = payload else {
        return Err(ConvertError::PayloadMismatch { expected: "vegapuls" });
    };

    let mut objects = Vec::new();

    push_unless_future(
        &mut objects,
        CanonicalObject::Distance(Distance {
            device_id: device_id.to_string(),
            timestamp,
            value: p.distance,
        }),
        now,
    );
    push_unless_future(
        &mut objects,
        CanonicalObject::Battery(Battery {
            device_id: device_id.to_string(),
            timestamp,
            level: Some(p.battery),
            voltage: None,
        }),
        now,
    );

    Ok(objects)
}

pub fn airquality(
    payload: &VendorPayload,
    device_id: &str,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ConvertResult<Vec<CanonicalObject>> {
    let VendorPayload::AirQuality(p) = payload else {
        return Err(ConvertError::PayloadMismatch { expected: "airquality" });
    };

    let mut objects = Vec::new();

    push_unless_future(
        &mut objects,
        CanonicalObject::AirQuality(AirQuality {
            device_id: device_id.to_string(),
            timestamp,
            co2: None,
            pm1: None,
            pm25: Some(p.pm25),
            pm10: Some(p.pm10),
            no2: Some(p.no2),
        }),
        now,
    );
    push_unless_future(
        &mut objects,
        CanonicalObject::Battery(Battery {
            device_id: device_id.to_string(),
            timestamp,
            level: Some(p.battery),
            voltage: None,
        }),
        now,
    );

    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uplink_payload::elsys::ElsysPayload;
    use uplink_payload::niab::NiabPayload;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 2, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn elsys_external_temperature_wins() {
        let payload = VendorPayload::Elsys(ElsysPayload {
            temperature: Some(21.5),
            external_temperature: Some(4.0),
            ..Default::default()
        });

        let objects = elsys(&payload, "dev", ts(), ts()).unwrap();
        assert_eq!(objects.len(), 1);
        let CanonicalObject::Temperature(temp) = &objects[0] else {
            panic!("expected temperature");
        };
        assert_eq!(temp.value, 4.0);
    }

    #[test]
    fn elsys_pressure_is_converted_to_pascal() {
        let payload = VendorPayload::Elsys(ElsysPayload {
            pressure: Some(1013.6),
            ..Default::default()
        });

        let objects = elsys(&payload, "dev", ts(), ts()).unwrap();
        let CanonicalObject::Pressure(pressure) = &objects[0] else {
            panic!("expected pressure");
        };
        assert_eq!(pressure.value, 101360.0);
    }

    #[test]
    fn future_timestamp_is_dropped_not_an_error() {
        let payload = VendorPayload::Elsys(ElsysPayload {
            temperature: Some(21.5),
            ..Default::default()
        });

        let now = ts();
        let future = now + Duration::hours(3);
        let objects = elsys(&payload, "dev", future, now).unwrap();
        assert!(objects.is_empty());
    }

    #[test]
    fn default_converter_emits_one_minimal_device() {
        let objects = device(&VendorPayload::Empty, "unknown-dev", ts(), ts()).unwrap();
        assert_eq!(objects.len(), 1);
        let CanonicalObject::Device(d) = &objects[0] else {
            panic!("expected device");
        };
        assert_eq!(d.device_id, "unknown-dev");
        assert_eq!(d.timestamp, ts());
        assert_eq!(d.battery_level, None);
    }

    #[test]
    fn variant_mismatch_is_an_error() {
        let payload = VendorPayload::Empty;
        assert_eq!(
            elsys(&payload, "dev", ts(), ts()),
            Err(ConvertError::PayloadMismatch { expected: "elsys" })
        );
        assert_eq!(
            device(
                &VendorPayload::Niab(NiabPayload::default()),
                "dev",
                ts(),
                ts()
            ),
            Err(ConvertError::PayloadMismatch { expected: "empty" })
        );
    }

    #[test]
    fn niab_distance_is_converted_to_meters() {
        let payload = VendorPayload::Niab(NiabPayload {
            battery: 3600.0,
            distance: Some(1234.0),
        });

        let objects = niab(&payload, "dev", ts(), ts()).unwrap();
        assert_eq!(objects.len(), 2);
        let CanonicalObject::Distance(distance) = &objects[1] else {
            panic!("expected distance");
        };
        assert_eq!(distance.value, 1.234);
    }

    #[test]
    fn niab_without_echo_emits_battery_only() {
        let payload = VendorPayload::Niab(NiabPayload {
            battery: 3600.0,
            distance: None,
        });

        let objects = niab(&payload, "dev", ts(), ts()).unwrap();
        assert_eq!(objects.len(), 1);
        assert!(matches!(objects[0], CanonicalObject::Battery(_)));
    }

    #[test]
    fn sensefarm_resistance_becomes_conductivity() {
        let payload = VendorPayload::Sensefarm(uplink_payload::sensefarm::SensefarmPayload {
            battery: Some(3579.0),
            resistances: vec![100000.0],
            soil_moisture: vec![100.0],
            temperature: Some(12.5),
        });

        let objects = sensefarm(&payload, "dev", ts(), ts()).unwrap();
        assert_eq!(objects.len(), 4);
        let CanonicalObject::Conductivity(cond) = &objects[2] else {
            panic!("expected conductivity");
        };
        assert_eq!(cond.value, 0.00001);
        let CanonicalObject::Pressure(pressure) = &objects[1] else {
            panic!("expected pressure");
        };
        assert_eq!(pressure.value, 100000.0);
    }
}
