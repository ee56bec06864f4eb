//! Canonical measurement objects, one struct per LWM2M object.
//!
//! Each struct owns its device id and timestamp and describes its annotated
//! fields through [`SenMlSerialize::resources`]. Object ids are fixed per
//! variant; optional fields model absence, not zero.

use chrono::{DateTime, Utc};

use crate::{Resource, ResourceValue, SenMlSerialize};

/// Minimal device object (LWM2M 3). Emitted on its own for sensor types
/// that carry no measurements, and for water-meter alarm packets.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub battery_level: Option<f64>,
    pub power_source_voltage: Option<f64>,
}

impl Device {
    pub fn new(device_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            device_id: device_id.to_string(),
            timestamp,
            battery_level: None,
            power_source_voltage: None,
        }
    }
}

impl SenMlSerialize for Device {
    fn object_id(&self) -> u16 {
        3
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        let mut r = Vec::new();
        if let Some(level) = self.battery_level {
            r.push(Resource {
                id: "9",
                unit: Some("%"),
                value: ResourceValue::Float(level),
            });
        }
        if let Some(voltage) = self.power_source_voltage {
            r.push(Resource {
                id: "7",
                unit: Some("mV"),
                value: ResourceValue::Float(voltage),
            });
        }
        r
    }
}

/// Temperature (LWM2M 3303), degrees Celsius.
#[derive(Debug, Clone, PartialEq)]
pub struct Temperature {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SenMlSerialize for Temperature {
    fn object_id(&self) -> u16 {
        3303
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        vec![Resource {
            id: "5700",
            unit: Some("Cel"),
            value: ResourceValue::Float(self.value),
        }]
    }
}

/// Relative humidity (LWM2M 3304), percent.
#[derive(Debug, Clone, PartialEq)]
pub struct Humidity {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SenMlSerialize for Humidity {
    fn object_id(&self) -> u16 {
        3304
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        vec![Resource {
            id: "5700",
            unit: Some("%RH"),
            value: ResourceValue::Float(self.value),
        }]
    }
}

/// Illuminance (LWM2M 3301), lux.
#[derive(Debug, Clone, PartialEq)]
pub struct Illuminance {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SenMlSerialize for Illuminance {
    fn object_id(&self) -> u16 {
        3301
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        vec![Resource {
            id: "5700",
            unit: Some("lux"),
            value: ResourceValue::Float(self.value),
        }]
    }
}

/// Air quality (LWM2M 3428). All constituents optional; a vendor frame
/// usually populates only a subset.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQuality {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub co2: Option<f64>,
    pub pm1: Option<f64>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
}

impl SenMlSerialize for AirQuality {
    fn object_id(&self) -> u16 {
        3428
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        let mut r = Vec::new();
        if let Some(co2) = self.co2 {
            r.push(Resource {
                id: "17",
                unit: Some("ppm"),
                value: ResourceValue::Float(co2),
            });
        }
        if let Some(pm1) = self.pm1 {
            r.push(Resource {
                id: "19",
                unit: Some("ug/m3"),
                value: ResourceValue::Float(pm1),
            });
        }
        if let Some(pm25) = self.pm25 {
            r.push(Resource {
                id: "15",
                unit: Some("ug/m3"),
                value: ResourceValue::Float(pm25),
            });
        }
        if let Some(pm10) = self.pm10 {
            r.push(Resource {
                id: "13",
                unit: Some("ug/m3"),
                value: ResourceValue::Float(pm10),
            });
        }
        if let Some(no2) = self.no2 {
            r.push(Resource {
                id: "21",
                unit: Some("ppb"),
                value: ResourceValue::Float(no2),
            });
        }
        r
    }
}

/// Water meter (LWM2M 3424). One instance per reading; history expansion
/// produces many instances with distinct timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterMeter {
    pub device_id: String,
    /// Time of this reading, not of the uplink that carried it.
    pub timestamp: DateTime<Utc>,
    pub cumulated_volume: f64,
    pub type_of_meter: Option<String>,
    pub leak_detected: Option<bool>,
    pub backflow_detected: Option<bool>,
}

impl SenMlSerialize for WaterMeter {
    fn object_id(&self) -> u16 {
        3424
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        let mut r = vec![Resource {
            id: "1",
            unit: Some("m3"),
            value: ResourceValue::Float(self.cumulated_volume),
        }];
        if let Some(ref meter_type) = self.type_of_meter {
            r.push(Resource {
                id: "3",
                unit: None,
                value: ResourceValue::Str(meter_type.clone()),
            });
        }
        if let Some(leak) = self.leak_detected {
            r.push(Resource {
                id: "10",
                unit: None,
                value: ResourceValue::Bool(leak),
            });
        }
        if let Some(backflow) = self.backflow_detected {
            r.push(Resource {
                id: "11",
                unit: None,
                value: ResourceValue::Bool(backflow),
            });
        }
        r
    }
}

/// Battery (LWM2M 3411).
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub level: Option<f64>,
    pub voltage: Option<f64>,
}

impl SenMlSerialize for Battery {
    fn object_id(&self) -> u16 {
        3411
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        let mut r = Vec::new();
        if let Some(level) = self.level {
            r.push(Resource {
                id: "1",
                unit: Some("%"),
                value: ResourceValue::Float(level),
            });
        }
        if let Some(voltage) = self.voltage {
            r.push(Resource {
                id: "2",
                unit: Some("mV"),
                value: ResourceValue::Float(voltage),
            });
        }
        r
    }
}

/// Digital input (LWM2M 3200), e.g. door contacts.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitalInput {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub state: bool,
    pub counter: Option<f64>,
}

impl SenMlSerialize for DigitalInput {
    fn object_id(&self) -> u16 {
        3200
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        let mut r = vec![Resource {
            id: "5500",
            unit: None,
            value: ResourceValue::Bool(self.state),
        }];
        if let Some(counter) = self.counter {
            r.push(Resource {
                id: "5501",
                unit: None,
                value: ResourceValue::Float(counter),
            });
        }
        r
    }
}

/// People counter (LWM2M 3434).
#[derive(Debug, Clone, PartialEq)]
pub struct PeopleCounter {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub actual_number_of_persons: f64,
    pub daily_number_of_persons: Option<f64>,
}

impl SenMlSerialize for PeopleCounter {
    fn object_id(&self) -> u16 {
        3434
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        let mut r = vec![Resource {
            id: "1",
            unit: None,
            value: ResourceValue::Float(self.actual_number_of_persons),
        }];
        if let Some(daily) = self.daily_number_of_persons {
            r.push(Resource {
                id: "5",
                unit: None,
                value: ResourceValue::Float(daily),
            });
        }
        r
    }
}

/// Presence (LWM2M 3302).
#[derive(Debug, Clone, PartialEq)]
pub struct Presence {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub state: bool,
}

impl SenMlSerialize for Presence {
    fn object_id(&self) -> u16 {
        3302
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        vec![Resource {
            id: "5500",
            unit: None,
            value: ResourceValue::Bool(self.state),
        }]
    }
}

/// Distance (LWM2M 3330), meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Distance {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SenMlSerialize for Distance {
    fn object_id(&self) -> u16 {
        3330
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        vec![Resource {
            id: "5700",
            unit: Some("m"),
            value: ResourceValue::Float(self.value),
        }]
    }
}

/// Conductivity (LWM2M 3327), siemens per meter.
#[derive(Debug, Clone, PartialEq)]
pub struct Conductivity {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SenMlSerialize for Conductivity {
    fn object_id(&self) -> u16 {
        3327
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        vec![Resource {
            id: "5700",
            unit: Some("S/m"),
            value: ResourceValue::Float(self.value),
        }]
    }
}

/// Pressure (LWM2M 3323), pascal.
#[derive(Debug, Clone, PartialEq)]
pub struct Pressure {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SenMlSerialize for Pressure {
    fn object_id(&self) -> u16 {
        3323
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        vec![Resource {
            id: "5700",
            unit: Some("Pa"),
            value: ResourceValue::Float(self.value),
        }]
    }
}

/// Power (LWM2M 3328), watts.
#[derive(Debug, Clone, PartialEq)]
pub struct Power {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SenMlSerialize for Power {
    fn object_id(&self) -> u16 {
        3328
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        vec![Resource {
            id: "5700",
            unit: Some("W"),
            value: ResourceValue::Float(self.value),
        }]
    }
}

/// Energy (LWM2M 3331), watt hours.
#[derive(Debug, Clone, PartialEq)]
pub struct Energy {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SenMlSerialize for Energy {
    fn object_id(&self) -> u16 {
        3331
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn resources(&self) -> Vec<Resource> {
        vec![Resource {
            id: "5700",
            unit: Some("Wh"),
            value: ResourceValue::Float(self.value),
        }]
    }
}

/// Closed set of canonical objects a converter may emit.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalObject {
    Device(Device),
    Temperature(Temperature),
    Humidity(Humidity),
    Illuminance(Illuminance),
    AirQuality(AirQuality),
    WaterMeter(WaterMeter),
    Battery(Battery),
    DigitalInput(DigitalInput),
    PeopleCounter(PeopleCounter),
    Presence(Presence),
    Distance(Distance),
    Conductivity(Conductivity),
    Pressure(Pressure),
    Power(Power),
    Energy(Energy),
}

impl CanonicalObject {
    fn inner(&self) -> &dyn SenMlSerialize {
        match self {
            CanonicalObject::Device(o) => o,
            CanonicalObject::Temperature(o) => o,
            CanonicalObject::Humidity(o) => o,
            CanonicalObject::Illuminance(o) => o,
            CanonicalObject::AirQuality(o) => o,
            CanonicalObject::WaterMeter(o) => o,
            CanonicalObject::Battery(o) => o,
            CanonicalObject::DigitalInput(o) => o,
            CanonicalObject::PeopleCounter(o) => o,
            CanonicalObject::Presence(o) => o,
            CanonicalObject::Distance(o) => o,
            CanonicalObject::Conductivity(o) => o,
            CanonicalObject::Pressure(o) => o,
            CanonicalObject::Power(o) => o,
            CanonicalObject::Energy(o) => o,
        }
    }
}

impl SenMlSerialize for CanonicalObject {
    fn object_id(&self) -> u16 {
        self.inner().object_id()
    }

    fn device_id(&self) -> &str {
        self.inner().device_id()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.inner().timestamp()
    }

    fn resources(&self) -> Vec<Resource> {
        self.inner().resources()
    }
}
