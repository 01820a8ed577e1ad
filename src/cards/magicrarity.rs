use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagicRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Mythic,
    Special,
    Bonus,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for MagicRarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MagicRarity::Common => write!(f, "Common"),
            MagicRarity::Uncommon => write!(f, "Uncommon"),
            MagicRarity::Rare => write!(f, "Rare"),
            MagicRarity::Mythic => write!(f, "Mythic"),
            MagicRarity::Special => write!(f, "Special"),
            MagicRarity::Bonus => write!(f, "Bonus"),
            MagicRarity::Other(raw) => write!(f, "{}", raw),
        }
    }
}
