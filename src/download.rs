//! Retrieval of the final media with an ordered fallback cascade.
//!
//! Direct retrieval across origins is not always possible, so a download is
//! an ordered list of strategies where the first success wins: fetch the
//! bytes directly, re-encode the preview the embedder already has on
//! screen, and finally hand the URL back for manual retrieval. Only a
//! failure at one tier moves to the next; no tier is retried, and the last
//! one cannot fail.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWriteExt;

use crate::client::ChromaClient;
use crate::error::ChromaError;
use crate::ident;

/// How a download concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The media (tier 1) or a re-encoded preview of it (tier 2) was saved.
    Saved(PathBuf),
    /// Both saving tiers failed; the embedder should open this URL in a new
    /// browsing context and let the user save it manually.
    OpenExternally(String),
}

/// The currently rendered preview, as the embedder last decoded or fetched
/// it. Feeds the tier-2 fallback; without one, a failed direct fetch goes
/// straight to [`DownloadOutcome::OpenExternally`].
#[derive(Debug, Clone)]
pub struct PreviewImage {
    bytes: Vec<u8>,
}

impl PreviewImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

/// Infers the saved file's extension from the response content type,
/// falling back to the URL's own suffix.
///
/// Priority: video before `png` before `webp` before the `jpg` default.
/// Video always resolves to `mp4` regardless of the container named by the
/// content type or URL; the provider transcodes every video output to an
/// mp4 container.
pub(crate) fn infer_extension(content_type: &str, url: &str) -> &'static str {
    let content_type = content_type.to_ascii_lowercase();
    let url = url.to_ascii_lowercase();
    if content_type.contains("video") || url.contains(".mp4") || url.contains(".webm") {
        "mp4"
    } else if content_type.contains("png") || url.contains(".png") {
        "png"
    } else if content_type.contains("webp") || url.contains(".webp") {
        "webp"
    } else {
        "jpg"
    }
}

impl ChromaClient {
    /// Downloads the media at `url` into `dest_dir`, degrading through the
    /// fallback cascade instead of failing.
    ///
    /// Returns [`DownloadOutcome::Saved`] with the written path when either
    /// saving tier succeeds, or [`DownloadOutcome::OpenExternally`] when
    /// neither could produce a file. Tier failures are logged, not
    /// propagated, and the last tier cannot fail, so the cascade never
    /// leaves the caller without a path to the media.
    pub async fn download<P: AsRef<Path>>(
        &self,
        url: &str,
        dest_dir: P,
        preview: Option<&PreviewImage>,
    ) -> DownloadOutcome {
        let dest_dir = dest_dir.as_ref();

        match self.fetch_direct(url, dest_dir).await {
            Ok(path) => return DownloadOutcome::Saved(path),
            Err(err) => tracing::warn!(%url, %err, "direct download failed"),
        }

        if let Some(preview) = preview {
            match self.save_preview(preview, dest_dir).await {
                Ok(path) => return DownloadOutcome::Saved(path),
                Err(err) => tracing::warn!(%err, "preview fallback failed"),
            }
        }

        tracing::warn!(%url, "all saving tiers failed, handing URL back");
        DownloadOutcome::OpenExternally(url.to_string())
    }

    /// Tier 1: fetch the URL as raw bytes, without credentials, and save
    /// them under a generated filename.
    async fn fetch_direct(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, ChromaError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ChromaError::Download(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ChromaError::Download(format!(
                "status {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ChromaError::Download(e.to_string()))?;

        let extension = infer_extension(&content_type, url);
        let file_name = format!(
            "{}_{}.{}",
            self.config.effect_id,
            ident::generate(ident::DOWNLOAD_NAME_LEN),
            extension
        );
        let path = dest_dir.join(file_name);
        write_file(&path, &bytes).await?;

        tracing::debug!(path = %path.display(), "media saved");
        Ok(path)
    }

    /// Tier 2: re-encode the embedder's preview to PNG at its natural
    /// resolution and save that instead. Only meaningful for image results.
    async fn save_preview(
        &self,
        preview: &PreviewImage,
        dest_dir: &Path,
    ) -> Result<PathBuf, ChromaError> {
        let decoded = image::load_from_memory(&preview.bytes)
            .map_err(|e| ChromaError::PreviewFallback(e.to_string()))?;
        let mut encoded = Cursor::new(Vec::new());
        decoded
            .write_to(&mut encoded, image::ImageFormat::Png)
            .map_err(|e| ChromaError::PreviewFallback(e.to_string()))?;

        let file_name = format!(
            "{}_fallback_{}.png",
            self.config.effect_id,
            ident::generate(ident::DOWNLOAD_NAME_LEN)
        );
        let path = dest_dir.join(file_name);
        write_file(&path, encoded.get_ref()).await?;

        tracing::debug!(path = %path.display(), "preview fallback saved");
        Ok(path)
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ChromaError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}
