//! Sensor-type registry and converters: the seam between vendor payloads
//! and canonical LWM2M objects.

pub mod convert;
pub mod error;
pub mod event;
pub mod registry;

pub use convert::Converter;
pub use error::{ConvertError, ConvertResult};
pub use event::UplinkEvent;
pub use registry::{registry, Registry};
