use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;
use thiserror::Error;

use crate::cards::scryfallcard::{ImageSize, ScryfallCard};
use crate::collection::{CollectionError, CollectionEntry, CollectionStore};
use crate::image_fetcher::{ImageFetchError, ImageFetcher};
use crate::scryfall_client::{CardSource, ScryfallError};
use crate::utilities::constants::CARD_BACK_URL;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("search failed: {0}")]
    Search(#[from] ScryfallError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error("could not show card image: {0}")]
    Image(#[from] ImageFetchError),
    #[error("there is no card number {number}, pick one between 1 and {available}")]
    InvalidSelection { number: usize, available: usize },
}

/// What the user works with: the last search result, the collection and
/// where previews and the collection file go. Card numbers shown to the user
/// start at 1.
pub struct Session<S: CardSource> {
    source: S,
    images: ImageFetcher,
    store: CollectionStore,
    last_results: Vec<ScryfallCard>,
    collection_path: PathBuf,
    image_size: ImageSize,
    card_back_url: String,
}

impl<S: CardSource> Session<S> {
    pub fn new(source: S, images: ImageFetcher, collection_path: impl Into<PathBuf>) -> Self {
        Session {
            source,
            images,
            store: CollectionStore::new(),
            last_results: Vec::new(),
            collection_path: collection_path.into(),
            image_size: ImageSize::Small,
            card_back_url: CARD_BACK_URL.to_string(),
        }
    }

    pub fn with_image_size(mut self, image_size: ImageSize) -> Self {
        self.image_size = image_size;
        self
    }

    /// Image shown for cards Scryfall has no image for.
    pub fn with_card_back_url(mut self, url: impl Into<String>) -> Self {
        self.card_back_url = url.into();
        self
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn last_results(&self) -> &[ScryfallCard] {
        &self.last_results
    }

    fn pick<T>(items: &[T], number: usize) -> Result<&T, SessionError> {
        number
            .checked_sub(1)
            .and_then(|index| items.get(index))
            .ok_or(SessionError::InvalidSelection {
                number,
                available: items.len(),
            })
    }

    /// Runs a new search and remembers its result for `select` and `add`.
    pub async fn search(&mut self, query: &str) -> Result<Vec<String>, SessionError> {
        let start_time = Local::now();
        self.last_results.clear();
        self.last_results = self.source.search(query).await?;

        info!(
            "Search for '{}' took {} ms and found {} cards",
            query,
            (Local::now() - start_time).num_milliseconds(),
            self.last_results.len()
        );
        Ok(self
            .last_results
            .iter()
            .enumerate()
            .map(|(i, card)| format!("{}: {}", i + 1, card))
            .collect())
    }

    async fn preview_of(&self, card: &ScryfallCard) -> Result<PathBuf, SessionError> {
        let url = card
            .image_url(self.image_size)
            .unwrap_or(self.card_back_url.as_str());
        Ok(self.images.fetch_preview(url).await?)
    }

    /// Preview image of a card from the last search.
    pub async fn select(&self, number: usize) -> Result<PathBuf, SessionError> {
        let card = Self::pick(&self.last_results, number)?;
        self.preview_of(card).await
    }

    pub fn selected(&self, number: usize) -> Result<&ScryfallCard, SessionError> {
        Self::pick(&self.last_results, number)
    }

    /// Adds a card from the last search to the collection.
    pub fn add(&mut self, number: usize) -> Result<String, SessionError> {
        let card = Self::pick(&self.last_results, number)?.clone();
        Ok(self.store.add_card(card).to_string())
    }

    pub fn list(&self) -> Vec<String> {
        self.store
            .entries()
            .enumerate()
            .map(|(i, entry)| format!("{}: {}", i + 1, entry))
            .collect()
    }

    /// Preview image of a collection entry, numbered as in `list`.
    pub async fn view(&self, number: usize) -> Result<PathBuf, SessionError> {
        let entries = self.store.entries().collect::<Vec<&CollectionEntry>>();
        let entry = Self::pick(&entries, number)?;
        self.preview_of(&entry.card).await
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, SessionError> {
        let path = path.unwrap_or(&self.collection_path).to_path_buf();
        self.store.save(&path)?;
        Ok(path)
    }

    pub fn load(&mut self, path: Option<&Path>) -> Result<PathBuf, SessionError> {
        let path = path.unwrap_or(&self.collection_path).to_path_buf();
        self.store.load(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scryfall_client::MockCardSource;
    use crate::test::helpers::{card_json, init, png_bytes};
    use reqwest::StatusCode;
    use serde_json::json;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    struct TestContext {
        server: mockito::ServerGuard,
        temp_dir: TempDir,
    }

    impl TestContext {
        async fn new() -> Self {
            init();
            TestContext {
                server: mockito::Server::new_async().await,
                temp_dir: tempdir().unwrap(),
            }
        }

        fn cards(&self, names: &[&str]) -> Vec<ScryfallCard> {
            names
                .iter()
                .map(|name| {
                    ScryfallCard::from_value(card_json(name, "m19", &self.server.url())).unwrap()
                })
                .collect()
        }

        fn session(&self, source: MockCardSource) -> Session<MockCardSource> {
            let images = ImageFetcher::new(
                reqwest::Client::new(),
                self.temp_dir.path().join("previews"),
                200,
                280,
            );
            Session::new(source, images, self.temp_dir.path().join("collection.json"))
        }

        fn searching(&self, names: &[&str], times: usize) -> MockCardSource {
            let cards = self.cards(names);
            let mut source = MockCardSource::new();
            source
                .expect_search()
                .times(times)
                .returning(move |_| Ok(cards.clone()));
            source
        }
    }

    #[tokio::test]
    async fn test_search_lists_numbered_results() {
        let ctx = TestContext::new().await;
        let mut session = ctx.session(ctx.searching(&["Shock", "Opt"], 1));

        let lines = session.search("shock or opt").await.unwrap();

        assert_eq!(lines, vec!["1: Shock (m19)", "2: Opt (m19)"]);
        assert_eq!(session.last_results().len(), 2);
    }

    #[tokio::test]
    async fn test_select_and_add_use_cached_results() {
        let mut ctx = TestContext::new().await;
        let art = ctx
            .server
            .mock("GET", "/small/m19-Opt.png")
            .with_status(200)
            .with_body(png_bytes(146, 204))
            .expect(2)
            .create_async()
            .await;
        // One search only, however often the user selects or adds.
        let mut session = ctx.session(ctx.searching(&["Shock", "Opt"], 1));

        session.search("instant").await.unwrap();
        let preview = session.select(2).await.unwrap();
        assert!(preview.exists());
        session.select(2).await.unwrap();
        session.add(2).unwrap();
        let line = session.add(2).unwrap();

        assert_eq!(line, "Opt (m19, Common, Instant, Count: 2)");
        art.assert_async().await;
    }

    #[tokio::test]
    async fn test_card_without_image_shows_card_back() {
        let mut ctx = TestContext::new().await;
        let card_back = ctx
            .server
            .mock("GET", "/backs/card-back.jpg")
            .with_status(200)
            .with_body(png_bytes(146, 204))
            .expect(1)
            .create_async()
            .await;
        let plain = ScryfallCard::from_value(json!({
            "name": "Blank Token",
            "set": "tm19",
            "type_line": "Token"
        }))
        .unwrap();
        let mut source = MockCardSource::new();
        source
            .expect_search()
            .times(1)
            .returning(move |_| Ok(vec![plain.clone()]));
        let mut session = ctx
            .session(source)
            .with_card_back_url(format!("{}/backs/card-back.jpg", ctx.server.url()));

        session.search("blank").await.unwrap();
        let preview = session.select(1).await.unwrap();

        assert!(preview.exists());
        card_back.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_selection() {
        let ctx = TestContext::new().await;
        let mut session = ctx.session(ctx.searching(&["Shock"], 1));

        assert!(matches!(
            session.add(1),
            Err(SessionError::InvalidSelection { number: 1, available: 0 })
        ));

        session.search("shock").await.unwrap();
        for number in [0, 2] {
            assert!(matches!(
                session.add(number),
                Err(SessionError::InvalidSelection { available: 1, .. })
            ));
        }
        assert!(session.store().is_empty());
    }

    #[tokio::test]
    async fn test_failed_search_clears_results() {
        let ctx = TestContext::new().await;
        let cards = ctx.cards(&["Shock"]);
        let mut source = MockCardSource::new();
        let mut calls = 0;
        source.expect_search().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(cards.clone())
            } else {
                Err(ScryfallError::HttpStatus {
                    url: "https://api.scryfall.com/cards/search".to_string(),
                    status: StatusCode::BAD_GATEWAY,
                })
            }
        });
        let mut session = ctx.session(source);

        session.search("shock").await.unwrap();
        let err = session.search("shock").await.unwrap_err();

        assert!(matches!(err, SessionError::Search(_)));
        assert!(session.last_results().is_empty());
    }

    #[tokio::test]
    async fn test_list_and_view_collection() {
        let mut ctx = TestContext::new().await;
        let art = ctx
            .server
            .mock("GET", "/small/m19-Shock.png")
            .with_status(200)
            .with_body(png_bytes(146, 204))
            .create_async()
            .await;
        let mut session = ctx.session(ctx.searching(&["Shock", "Abrade"], 1));

        session.search("red").await.unwrap();
        session.add(1).unwrap();
        session.add(2).unwrap();
        session.add(1).unwrap();

        assert_eq!(
            session.list(),
            vec![
                "1: Abrade (m19, Common, Instant, Count: 1)",
                "2: Shock (m19, Common, Instant, Count: 2)",
            ]
        );
        session.view(2).await.unwrap();
        art.assert_async().await;
        assert!(matches!(
            session.view(3).await,
            Err(SessionError::InvalidSelection { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_and_load_default_path() {
        let ctx = TestContext::new().await;
        let mut session = ctx.session(ctx.searching(&["Shock"], 1));
        session.search("shock").await.unwrap();
        session.add(1).unwrap();

        let saved_to = session.save(None).unwrap();
        assert_eq!(saved_to, ctx.temp_dir.path().join("collection.json"));

        let mut other = ctx.session(MockCardSource::new());
        other.load(None).unwrap();
        assert_eq!(other.store(), session.store());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_collection() {
        let ctx = TestContext::new().await;
        let mut session = ctx.session(ctx.searching(&["Shock"], 1));
        session.search("shock").await.unwrap();
        session.add(1).unwrap();

        let corrupt = ctx.temp_dir.path().join("corrupt.json");
        fs::write(&corrupt, "[1, 2, 3]").unwrap();
        let err = session.load(Some(&corrupt)).unwrap_err();

        assert!(matches!(
            err,
            SessionError::Collection(CollectionError::CorruptData { .. })
        ));
        assert_eq!(session.list().len(), 1);
    }
}
