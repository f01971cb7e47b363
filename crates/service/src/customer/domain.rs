use serde::{Deserialize, Deserializer, Serialize};

/// Stored customer as returned by every read and write.
pub type Customer = models::customer::Model;

/// Request body for create, batch-create and update. Any `id` sent by the
/// client is ignored; a missing or `null` field reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl CustomerInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into() }
    }
}

/// A customer about to be written. Without an id the store assigns one;
/// with an id the existing row is overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

impl CustomerDraft {
    pub fn new(input: CustomerInput) -> Self {
        Self { id: None, name: input.name, email: input.email }
    }

    pub fn with_id(id: i64, input: CustomerInput) -> Self {
        Self { id: Some(id), name: input.name, email: input.email }
    }
}
