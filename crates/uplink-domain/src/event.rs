use chrono::{DateTime, Utc};

/// One normalized uplink as delivered by a facade adapter. Immutable; no
/// entity produced from it outlives its processing.
#[derive(Debug, Clone, PartialEq)]
pub struct UplinkEvent {
    pub dev_eui: String,
    pub sensor_type: String,
    pub f_port: u8,
    /// Raw application payload bytes.
    pub data: Vec<u8>,
    /// Pre-decoded payload object, when the network server provides one.
    pub object: Option<serde_json::Value>,
    /// Uplink arrival time at the network server.
    pub timestamp: DateTime<Utc>,
    /// Uplink frame counter, when the network server reports one.
    pub f_cnt: Option<u32>,
}
