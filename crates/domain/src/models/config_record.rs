//! Product config record domain model.
//!
//! A `ConfigRecord` is identified by its caller-supplied `number`. The same
//! JSON shape is used on the wire and as the stored document body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Document path of the record identity.
pub const NUMBER_PATH: &[&str] = &["number"];

/// Document path of the product identifier nested in `configBody`.
pub const PRODUCT_ID_PATH: &[&str] = &["configBody", "productId"];

/// A product configuration record.
///
/// Missing fields decode to their defaults and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigRecord {
    pub number: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_body: Option<ConfigBody>,
}

/// Error descriptor attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorDetail {
    pub code: i64,
    pub message: String,
}

/// Product-specific configuration payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigBody {
    pub name: String,
    pub product_id: String,
}

impl ConfigRecord {
    pub fn new(number: i64, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Product identifier, if the record carries a `configBody`.
    pub fn product_id(&self) -> Option<&str> {
        self.config_body.as_ref().map(|b| b.product_id.as_str())
    }

    /// Encodes the record as a stored document body.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Decodes a stored document body.
    pub fn from_document(document: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(document)
    }
}
