use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of an analyzed document. `Pending` is written before any
/// processing starts; `Completed` and `Failed` are terminal. The enum is
/// closed: an unknown status string in the store fails deserialization
/// instead of being passed through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Only ever present on `Completed` records.
    pub summary: Option<String>,
    pub status: DocumentStatus,
    /// Server-assigned on every write, never caller-supplied.
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
    pub owner_id: String,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        summary: Option<String>,
        status: DocumentStatus,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            summary,
            status,
            timestamp: Utc::now(),
            owner_id: owner_id.into(),
        }
    }
}
