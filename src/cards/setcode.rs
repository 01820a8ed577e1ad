use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::scryfallcard::CardError;

/// Short expansion code as Scryfall reports it, e.g. `shm` for Shadowmoor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetCode {
    pub raw: String,
}

impl SetCode {
    pub fn new(raw: String) -> Result<Self, CardError> {
        let raw = raw.trim().to_string();
        if raw.is_empty() {
            return Err(CardError::InvalidRecord(
                "set code cannot be empty".to_string(),
            ));
        }
        Ok(SetCode { raw })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SetCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SetCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SetCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SetCode::new(s).map_err(de::Error::custom)
    }
}
