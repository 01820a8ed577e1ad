mod cards;
mod collection;
mod image_fetcher;
mod repl;
mod scryfall_client;
mod session;
#[cfg(test)]
mod test;
mod utilities;

use std::io;

use dotenv::dotenv;
use log::{error, info};
use reqwest::Client;

use image_fetcher::ImageFetcher;
use repl::Repl;
use scryfall_client::ScryfallClient;
use session::Session;
use utilities::config::CONFIG;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();
    info!("Starting with {:?}", *CONFIG);

    let client = Client::new();
    let scryfall = ScryfallClient::new(
        Some(&CONFIG.scryfall_api_url),
        client.clone(),
        Some(CONFIG.request_delay_ms),
    );
    let images = ImageFetcher::new(
        client,
        &CONFIG.preview_dir,
        CONFIG.preview_width,
        CONFIG.preview_height,
    );
    info!("Card previews are written to {}", images.preview_dir().display());
    let mut session = Session::new(scryfall, images, &CONFIG.collection_path)
        .with_image_size(CONFIG.image_size)
        .with_card_back_url(&CONFIG.card_back_url);

    if CONFIG.load_on_start {
        match session.load(None) {
            Ok(path) => info!("Loaded collection from {}", path.display()),
            Err(e) => error!("Failed to load collection: {}", e),
        }
    }

    let stdin = io::stdin();
    Repl::new(session, stdin.lock(), io::stdout()).run().await?;

    info!("Done");
    Ok(())
}
