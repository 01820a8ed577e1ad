use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::ImageFormat;
use log::{debug, info};
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::utilities::file_management::write_atomically;
use crate::utilities::string_manipulators::file_name_safe;

#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned status {status}")]
    HttpStatus { url: String, status: StatusCode },
    #[error("could not decode image from {url}: {source}")]
    Image {
        url: String,
        #[source]
        source: image::ImageError,
    },
    #[error("could not write preview {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Downloads card art and stores a fixed size PNG preview of it.
pub struct ImageFetcher {
    client: reqwest::Client,
    preview_dir: PathBuf,
    width: u32,
    height: u32,
}

impl ImageFetcher {
    pub fn new(client: reqwest::Client, preview_dir: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        ImageFetcher {
            client,
            preview_dir: preview_dir.into(),
            width,
            height,
        }
    }

    fn preview_path(&self, url: &str) -> PathBuf {
        let stem = match Url::parse(url) {
            Ok(parsed) => file_name_safe(&format!(
                "{}{}",
                parsed.host_str().unwrap_or_default(),
                parsed.path()
            )),
            Err(_) => file_name_safe(url),
        };
        self.preview_dir.join(format!("{}.png", stem))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ImageFetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ImageFetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ImageFetchError::Network {
                url: url.to_string(),
                source,
            })?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    fn resize_to_png(&self, url: &str, raw: &[u8]) -> Result<Vec<u8>, ImageFetchError> {
        let to_image_error = |source| ImageFetchError::Image {
            url: url.to_string(),
            source,
        };
        let picture = image::load_from_memory(raw).map_err(to_image_error)?;
        let resized = picture.resize_exact(self.width, self.height, FilterType::Lanczos3);

        let mut png = Cursor::new(Vec::new());
        resized
            .write_to(&mut png, ImageFormat::Png)
            .map_err(to_image_error)?;
        Ok(png.into_inner())
    }

    /// Returns the path of the written preview.
    pub async fn fetch_preview(&self, url: &str) -> Result<PathBuf, ImageFetchError> {
        let raw = self.download(url).await?;
        let png = self.resize_to_png(url, &raw)?;

        let path = self.preview_path(url);
        write_atomically(&path, &png).map_err(|source| ImageFetchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved {}x{} preview of {} to {}", self.width, self.height, url, path.display());
        Ok(path)
    }

    pub fn preview_dir(&self) -> &Path {
        &self.preview_dir
    }
}
