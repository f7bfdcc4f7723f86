use serde::{Deserialize, Deserializer};

/// Remote record identifiers are opaque strings on the wire.
///
/// The service may hand out integer keys or UUIDs; both are normalised to a
/// string when decoded (see [`deserialize_id`]).
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Wire shape of an id: either a JSON string or a JSON integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for EntityId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Deserialize an id that may be encoded as a string or an integer.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<EntityId, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(EntityId::from)
}

/// Nullable variant of [`deserialize_id`].
pub fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(EntityId::from))
}

/// List variant of [`deserialize_id`].
pub fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Vec::<RawId>::deserialize(deserializer)?
        .into_iter()
        .map(EntityId::from)
        .collect())
}

/// Default for free-form `metadata` fields: an empty JSON object.
pub fn empty_metadata() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
