pub mod objects;
pub mod senml;

pub use objects::{
    AirQuality, Battery, CanonicalObject, Conductivity, Device, DigitalInput, Distance, Energy,
    Humidity, Illuminance, PeopleCounter, Power, Presence, Pressure, Temperature, WaterMeter,
};
pub use senml::{to_senml_pack, SenMlRecord};

use chrono::{DateTime, Utc};

/// One annotated field of a canonical object: LWM2M resource id, optional
/// unit, and the value dispatched into its SenML slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: &'static str,
    pub unit: Option<&'static str>,
    pub value: ResourceValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceValue {
    Float(f64),
    Bool(bool),
    Str(String),
    Sum(f64),
}

/// Compile-time schema description of a canonical object.
///
/// Every variant states its fixed LWM2M object id and returns its present
/// fields as an ordered resource list. Serialization walks that list, so the
/// wire layout is fixed by each `resources` implementation rather than by
/// runtime reflection.
pub trait SenMlSerialize {
    fn object_id(&self) -> u16;

    fn device_id(&self) -> &str;

    fn timestamp(&self) -> DateTime<Utc>;

    /// Present fields in fixed declaration order. Absent optional fields are
    /// omitted here and therefore never serialized.
    fn resources(&self) -> Vec<Resource>;

    fn object_urn(&self) -> String {
        format!("urn:oma:lwm2m:ext:{}", self.object_id())
    }

    /// Serialize to one base record followed by one record per resource.
    fn to_records(&self) -> Vec<SenMlRecord> {
        let mut records = Vec::with_capacity(1 + self.resources().len());

        records.push(SenMlRecord {
            base_name: Some(format!("{}/{}/", self.device_id(), self.object_id())),
            base_time: Some(self.timestamp().timestamp()),
            name: Some("0".to_string()),
            string_value: Some(self.object_urn()),
            ..Default::default()
        });

        for resource in self.resources() {
            let mut record = SenMlRecord {
                name: Some(resource.id.to_string()),
                unit: resource.unit.map(str::to_string),
                ..Default::default()
            };
            match resource.value {
                ResourceValue::Float(v) => record.value = Some(v),
                ResourceValue::Bool(v) => record.bool_value = Some(v),
                ResourceValue::Str(v) => record.string_value = Some(v),
                ResourceValue::Sum(v) => record.sum = Some(v),
            }
            records.push(record);
        }

        records
    }
}
