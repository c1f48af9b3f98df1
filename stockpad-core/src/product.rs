use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A catalog entry with a unique id, descriptive fields, and a unit of measure.
///
/// Identity is `id` (creation timestamp in milliseconds, immutable once
/// assigned); every other field is user-editable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub unit: String,
    // Stored as "show" for compatibility with existing data.
    #[serde(rename = "show")]
    pub visible: bool,
}

impl Product {
    /// Create an empty product row. The id is the creation time in millis,
    /// which doubles as a unique key for rows added one at a time.
    pub fn draft() -> Self {
        Self {
            id: Utc::now().timestamp_millis(),
            name: String::new(),
            company: String::new(),
            unit: String::new(),
            visible: true,
        }
    }
}
