use serde_json::{json, Value};

use crate::cards::scryfallcard::ScryfallCard;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn reaper_king_json() -> Value {
    json!({
        "object": "card",
        "name": "Reaper King",
        "set": "shm",
        "set_name": "Shadowmoor",
        "collector_number": "260",
        "rarity": "rare",
        "type_line": "Legendary Artifact Creature — Scarecrow",
        "image_uris": {
            "small": "https://cards.scryfall.io/small/front/b/7/reaper-king.jpg",
            "normal": "https://cards.scryfall.io/normal/front/b/7/reaper-king.jpg"
        },
        "prices": { "eur": "12.50", "eur_foil": null }
    })
}

pub fn double_faced_card_json() -> Value {
    json!({
        "name": "Delver of Secrets // Insectile Aberration",
        "set": "isd",
        "set_name": "Innistrad",
        "rarity": "common",
        "type_line": "Creature — Human Wizard // Creature — Human Insect",
        "card_faces": [
            {
                "name": "Delver of Secrets",
                "image_uris": {
                    "small": "https://cards.scryfall.io/small/front/d/e/delver-front.jpg"
                }
            },
            {
                "name": "Insectile Aberration",
                "image_uris": {
                    "small": "https://cards.scryfall.io/small/back/d/e/delver-back.jpg"
                }
            }
        ]
    })
}

/// Minimal printing with a small image hosted under `image_base`.
pub fn card_json(name: &str, set: &str, image_base: &str) -> Value {
    json!({
        "object": "card",
        "name": name,
        "set": set,
        "set_name": format!("Set {}", set),
        "rarity": "common",
        "type_line": "Instant",
        "image_uris": {
            "small": format!("{}/small/{}-{}.png", image_base, set, name.replace(' ', "-"))
        }
    })
}

pub fn card(name: &str, set: &str) -> ScryfallCard {
    ScryfallCard::from_value(card_json(name, set, "https://cards.scryfall.io")).unwrap()
}

pub fn reaper_king_card() -> ScryfallCard {
    ScryfallCard::from_value(reaper_king_json()).unwrap()
}

/// Encoded PNG of the given size, for serving as card art.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([120, 40, 200]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}
