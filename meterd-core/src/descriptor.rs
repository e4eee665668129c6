//! Device identification

use serde::{Deserialize, Serialize};

/// Describes a physical device
///
/// For SunSpec devices all fields come from the common information block;
/// other device families fill in what their producer knows statically.
/// Text fields are trimmed of padding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub manufacturer: String,
    pub model: String,
    pub options: String,
    pub version: String,
    pub serial: String,
}
