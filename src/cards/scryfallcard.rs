use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{cardname::CardName, magicrarity::MagicRarity, setcode::SetCode};

#[derive(Debug, Error)]
pub enum CardError {
    #[error("invalid card record: {0}")]
    InvalidRecord(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    Normal,
    Large,
    Png,
    ArtCrop,
    BorderCrop,
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(ImageSize::Small),
            "normal" => Ok(ImageSize::Normal),
            "large" => Ok(ImageSize::Large),
            "png" => Ok(ImageSize::Png),
            "art_crop" => Ok(ImageSize::ArtCrop),
            "border_crop" => Ok(ImageSize::BorderCrop),
            other => Err(format!("unknown image size '{}'", other)),
        }
    }
}

impl ImageSize {
    fn key(&self) -> &'static str {
        match self {
            ImageSize::Small => "small",
            ImageSize::Normal => "normal",
            ImageSize::Large => "large",
            ImageSize::Png => "png",
            ImageSize::ArtCrop => "art_crop",
            ImageSize::BorderCrop => "border_crop",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct ImageUris {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_crop: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageUris {
    pub fn get(&self, size: ImageSize) -> Option<&str> {
        let uri = match size {
            ImageSize::Small => &self.small,
            ImageSize::Normal => &self.normal,
            ImageSize::Large => &self.large,
            ImageSize::Png => &self.png,
            ImageSize::ArtCrop => &self.art_crop,
            ImageSize::BorderCrop => &self.border_crop,
        };
        uri.as_deref()
    }
}

/// One printing of a card as returned by the Scryfall search endpoint.
///
/// Only the fields the collection needs are typed. Everything else Scryfall
/// sends is kept in `extra` so a saved collection holds the full record.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ScryfallCard {
    pub name: CardName,
    pub set: SetCode,
    #[serde(default)]
    pub set_name: String,
    #[serde(default)]
    pub rarity: MagicRarity,
    #[serde(default)]
    pub type_line: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScryfallCard {
    pub fn from_value(value: Value) -> Result<Self, CardError> {
        serde_json::from_value(value).map_err(|e| CardError::InvalidRecord(e.to_string()))
    }

    /// Image url of the requested size. Double faced cards have no top level
    /// `image_uris`, so the front face is used for those.
    pub fn image_url(&self, size: ImageSize) -> Option<&str> {
        if let Some(uri) = self.image_uris.as_ref().and_then(|uris| uris.get(size)) {
            return Some(uri);
        }
        self.extra
            .get("card_faces")?
            .get(0)?
            .get("image_uris")?
            .get(size.key())?
            .as_str()
    }
}

impl fmt::Display for ScryfallCard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.set)
    }
}
