use serde::{Deserialize, Serialize};

pub use rankguess_core::{Catalog, GameConfig, Item, ItemId};

/// One entry as the list API reports it. Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelRecord {
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    pub level_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub position: Option<i64>,
    #[serde(default)]
    pub video: Option<String>,
}

impl LevelRecord {
    pub fn new(level_id: u64, name: &str, position: i64) -> Self {
        Self {
            level_id: Some(level_id),
            name: Some(name.to_string()),
            position: Some(position),
            video: None,
        }
    }
}

/// Numbers sometimes arrive quoted; accept both forms and treat anything else as absent.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn u64_opt<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u64>, D::Error> {
        Ok(match Option::<Value>::deserialize(de)? {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn i64_opt<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
        Ok(match Option::<Value>::deserialize(de)? {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }
}
