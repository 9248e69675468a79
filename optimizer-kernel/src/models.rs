use serde::{Deserialize, Serialize};

/// One observation of a server behind a hostname, as stored in the inventory blob.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerRecord {
    pub ip: String,
    pub hostname: String,
    pub active: bool,
}

impl ServerRecord {
    pub fn new(ip: impl Into<String>, hostname: impl Into<String>, active: bool) -> Self {
        Self { ip: ip.into(), hostname: hostname.into(), active }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct HostnameResponse {
    pub hostnames: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn success() -> Self {
        Self { message: "Success".into() }
    }
}

pub type ServerRecords = Vec<ServerRecord>;
