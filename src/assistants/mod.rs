//! Threads, the messages posted to them, and the runs that execute an
//! assistant over them.

pub mod messages;
pub mod runs;
pub mod threads;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Free-form metadata attached to assistants objects. Values are passed
/// through untouched.
pub type Metadata = HashMap<String, Value>;

/// Decodes `null` as an empty map. The API sends `"metadata": null` on
/// objects that never had metadata set.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Metadata>::deserialize(deserializer)?.unwrap_or_default())
}
