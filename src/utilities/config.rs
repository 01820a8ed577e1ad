use std::env;

use log::error;

use crate::cards::scryfallcard::ImageSize;

use super::constants::{
    CARD_BACK_URL, COLLECTION_FILE, PREVIEW_DIR, PREVIEW_HEIGHT, PREVIEW_WIDTH, REQUEST_DELAY_MS,
    SCRYFALL_API_URL,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub scryfall_api_url: String,
    pub collection_path: String,
    pub preview_dir: String,
    pub preview_width: u32,
    pub preview_height: u32,
    pub image_size: ImageSize,
    pub request_delay_ms: u64,
    pub load_on_start: bool,
    pub card_back_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scryfall_api_url: SCRYFALL_API_URL.to_string(),
            collection_path: COLLECTION_FILE.to_string(),
            preview_dir: PREVIEW_DIR.to_string(),
            preview_width: PREVIEW_WIDTH,
            preview_height: PREVIEW_HEIGHT,
            image_size: ImageSize::Small,
            request_delay_ms: REQUEST_DELAY_MS,
            load_on_start: false,
            card_back_url: CARD_BACK_URL.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.update_from_env();
        config
    }

    fn update_from_env(&mut self) {
        if let Ok(url) = env::var("SCRYFALL_API_URL") {
            if !url.is_empty() {
                self.scryfall_api_url = url.trim_end_matches('/').to_string();
            }
        }
        if let Ok(path) = env::var("COLLECTION_PATH") {
            if !path.is_empty() {
                self.collection_path = path;
            }
        }
        if let Ok(dir) = env::var("PREVIEW_DIR") {
            if !dir.is_empty() {
                self.preview_dir = dir;
            }
        }
        if let Ok(width) = env::var("PREVIEW_WIDTH") {
            self.preview_width = Self::parse_dimension("PREVIEW_WIDTH", &width, PREVIEW_WIDTH);
        }
        if let Ok(height) = env::var("PREVIEW_HEIGHT") {
            self.preview_height = Self::parse_dimension("PREVIEW_HEIGHT", &height, PREVIEW_HEIGHT);
        }
        if let Ok(size) = env::var("IMAGE_SIZE") {
            match size.parse() {
                Ok(size) => self.image_size = size,
                Err(e) => error!("Supplied incorrect IMAGE_SIZE: {}", e),
            }
        }
        if let Ok(delay) = env::var("REQUEST_DELAY_MS") {
            self.request_delay_ms = Self::parse_delay(&delay);
        }
        if let Ok(url) = env::var("CARD_BACK_URL") {
            if !url.is_empty() {
                self.card_back_url = url;
            }
        }
        if let Ok(load_on_start) = env::var("LOAD_ON_START") {
            self.load_on_start = load_on_start == "1";
        }
    }

    fn parse_delay(value: &str) -> u64 {
        match value.trim().parse::<u64>() {
            Ok(v) => v,
            Err(_) => {
                error!("Supplied incorrect value for REQUEST_DELAY_MS: '{}'", value);
                REQUEST_DELAY_MS
            }
        }
    }

    fn parse_dimension(key: &str, value: &str, fallback: u32) -> u32 {
        match value.parse::<u32>() {
            Ok(v) if v > 0 => v,
            _ => {
                error!("Supplied incorrect value for {}: '{}'", key, value);
                fallback
            }
        }
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: Config = Config::new();
}
