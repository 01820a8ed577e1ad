pub const SCRYFALL_API_URL: &str = "https://api.scryfall.com";
pub const SCRYFALL_SEARCH_PATH: &str = "cards/search";

pub const COLLECTION_FILE: &str = "mtg_database.json";
pub const PREVIEW_DIR: &str = "card_previews";

pub const PREVIEW_WIDTH: u32 = 200;
pub const PREVIEW_HEIGHT: u32 = 280;

/// Scryfall asks for 50-100 ms between requests.
pub const REQUEST_DELAY_MS: u64 = 100;

pub const CARD_BACK_URL: &str =
    "https://backs.scryfall.io/large/8/0/80e6ae77-74c3-450d-a0a2-01f3168d7712.jpg?1665006204";

pub const USER_AGENT: &str = concat!("mtg_collection/", env!("CARGO_PKG_VERSION"));
