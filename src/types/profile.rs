//! Profile records reconstructed from the users/lookup cache.

use serde::{Deserialize, Deserializer, Serialize};

/// The two fields of a cached Twitter user object this crate cares about.
///
/// Every other field of the user JSON is ignored when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: i64,
    /// The user's bio. Missing and `null` both read as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

impl ProfileRecord {
    #[must_use]
    pub fn new(id: i64, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
