use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::scryfallcard::CardError;

/// Printed name of a card. Compared byte-wise, so "Opt" and "opt" are two names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardName {
    pub raw: String,
}

impl CardName {
    pub fn new(raw: String) -> Result<Self, CardError> {
        if raw.trim().is_empty() {
            return Err(CardError::InvalidRecord(
                "card name cannot be empty".to_string(),
            ));
        }
        Ok(CardName { raw })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CardName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CardName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CardName::new(s).map_err(de::Error::custom)
    }
}
