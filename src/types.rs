use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ChromaError;

/// Extension used when a file name or URL carries none.
const FALLBACK_EXTENSION: &str = "jpg";

/// The kind of media a generation job produces.
///
/// Fixed per deployment through [`ClientConfig`](crate::ClientConfig); it is
/// not selectable per request. The two kinds use different endpoints and
/// request shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// The API path segment for this kind, used for both submission and
    /// status queries.
    pub(crate) fn endpoint(&self) -> &'static str {
        match self {
            MediaKind::Image => "image-gen",
            MediaKind::Video => "video-gen",
        }
    }

    /// The provider's model identifier for this kind.
    pub(crate) fn model(&self) -> &'static str {
        match self {
            MediaKind::Image => "image-effects",
            MediaKind::Video => "video-effects",
        }
    }

    /// Sniffs the media kind of a result URL from its extension.
    ///
    /// `.mp4` and `.webm` suffixes mean video, anything else is treated as
    /// an image. A trailing query string or fragment is ignored.
    pub fn from_url(url: &str) -> MediaKind {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_ascii_lowercase();
        if path.ends_with(".mp4") || path.ends_with(".webm") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// A local file to be uploaded: a name, a declared MIME type and the raw
/// bytes. Transient; it only exists for the duration of an upload call.
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Original file name, used to derive the storage key extension.
    pub name: String,
    /// Declared MIME type, forwarded as the transfer `Content-Type`.
    pub content_type: String,
    /// The file's contents.
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its MIME type from the path.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ChromaError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ChromaError::FileError(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "could not determine file name",
                ))
            })?
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    /// The extension after the file name's last dot, or `jpg` when the name
    /// has none.
    pub fn extension(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => FALLBACK_EXTENSION,
        }
    }
}

/// A successfully uploaded asset: the storage key it was written under and
/// the public URL it is now readable from.
///
/// The URL is computed locally from the CDN base and the key, so it is only
/// meaningful once the transfer has completed.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    /// Generated storage key, `<token>.<ext>`.
    pub key: String,
    /// Public URL of the uploaded bytes.
    pub url: String,
}

/// A private struct for serializing the image-kind job request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageJobRequest<'a> {
    pub(crate) model: &'static str,
    pub(crate) tool_type: &'static str,
    pub(crate) effect_id: &'a str,
    pub(crate) image_url: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) remove_watermark: bool,
    pub(crate) is_private: bool,
}

/// A private struct for serializing the video-kind job request body.
///
/// Unlike the image shape, the provider expects `imageUrl` as an array here
/// and takes no `toolType`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoJobRequest<'a> {
    pub(crate) image_url: [&'a str; 1],
    pub(crate) effect_id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) remove_watermark: bool,
    pub(crate) model: &'static str,
    pub(crate) is_private: bool,
}

/// The response from a successful job submission.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerationJob {
    /// The provider-assigned job identifier.
    pub job_id: String,
    /// The initial status. Provider-defined; no particular value is assumed.
    #[serde(default)]
    pub status: String,
}

/// One entry of a job result.
///
/// The provider names the media locator differently across image and video
/// transforms and API versions, so all known field names are carried and
/// resolved by priority.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ResultEntry {
    /// The first non-empty locator among `mediaUrl`, `video`, `image`.
    fn locator(&self) -> Option<&str> {
        [&self.media_url, &self.video, &self.image]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|url| !url.is_empty())
    }
}

/// The `result` field of a status response, which the provider returns
/// either as a single entry or as an array of entries.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum ResultPayload {
    Many(Vec<ResultEntry>),
    One(ResultEntry),
}

impl ResultPayload {
    /// The entry the canonical URL is resolved from: the first of an array,
    /// or the lone entry.
    fn first_entry(&self) -> Option<&ResultEntry> {
        match self {
            ResultPayload::Many(entries) => entries.first(),
            ResultPayload::One(entry) => Some(entry),
        }
    }
}

/// A status query response.
#[derive(Debug, Deserialize, Clone)]
pub struct JobStatus {
    /// Provider-defined status. Only `completed`, `failed` and `error` are
    /// ever matched exactly.
    pub status: String,
    /// The result payload, present once the job has completed.
    #[serde(default)]
    pub result: Option<ResultPayload>,
    /// The provider's error message, present when the job failed.
    #[serde(default)]
    pub error: Option<String>,
}

impl JobStatus {
    /// Resolves the canonical media URL from this result.
    ///
    /// Takes the first entry if the result is an array, otherwise the single
    /// entry, and selects the first non-empty field among `mediaUrl`,
    /// `video` and `image`, in that priority order.
    ///
    /// # Errors
    ///
    /// `ChromaError::MissingMediaUrl` when no locator is present.
    pub fn media_url(&self) -> Result<&str, ChromaError> {
        self.result
            .as_ref()
            .and_then(ResultPayload::first_entry)
            .and_then(ResultEntry::locator)
            .ok_or(ChromaError::MissingMediaUrl)
    }
}

/// The resolved output of a completed generation.
#[derive(Debug, Clone)]
pub struct GeneratedMedia {
    /// Canonical URL of the generated media.
    pub url: String,
    /// Media kind hint sniffed from the URL extension.
    pub kind: MediaKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_from(value: serde_json::Value) -> JobStatus {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn resolves_media_url_from_array() {
        let status = status_from(json!({
            "status": "completed",
            "result": [{ "mediaUrl": "a" }]
        }));
        assert_eq!(status.media_url().unwrap(), "a");
    }

    #[test]
    fn resolves_video_field_from_single_entry() {
        let status = status_from(json!({
            "status": "completed",
            "result": { "video": "b" }
        }));
        assert_eq!(status.media_url().unwrap(), "b");
    }

    #[test]
    fn resolves_image_field_from_single_entry() {
        let status = status_from(json!({
            "status": "completed",
            "result": { "image": "c" }
        }));
        assert_eq!(status.media_url().unwrap(), "c");
    }

    #[test]
    fn empty_entry_is_a_hard_failure() {
        let status = status_from(json!({
            "status": "completed",
            "result": {}
        }));
        assert!(matches!(
            status.media_url(),
            Err(ChromaError::MissingMediaUrl)
        ));
    }

    #[test]
    fn missing_result_is_a_hard_failure() {
        let status = status_from(json!({ "status": "completed" }));
        assert!(matches!(
            status.media_url(),
            Err(ChromaError::MissingMediaUrl)
        ));
    }

    #[test]
    fn media_url_wins_over_other_fields() {
        let status = status_from(json!({
            "status": "completed",
            "result": { "mediaUrl": "a", "video": "b", "image": "c" }
        }));
        assert_eq!(status.media_url().unwrap(), "a");
    }

    #[test]
    fn empty_fields_are_skipped() {
        let status = status_from(json!({
            "status": "completed",
            "result": { "mediaUrl": "", "video": "b" }
        }));
        assert_eq!(status.media_url().unwrap(), "b");
    }

    #[test]
    fn empty_array_is_a_hard_failure() {
        let status = status_from(json!({
            "status": "completed",
            "result": []
        }));
        assert!(matches!(
            status.media_url(),
            Err(ChromaError::MissingMediaUrl)
        ));
    }

    #[test]
    fn extension_follows_last_dot_segment() {
        let file = |name: &str| MediaFile::new(name, "application/octet-stream", Vec::new());
        assert_eq!(file("photo.png").extension(), "png");
        assert_eq!(file("archive.tar.gz").extension(), "gz");
        assert_eq!(file("photo").extension(), "jpg");
        assert_eq!(file("photo.").extension(), "jpg");
    }

    #[test]
    fn media_kind_sniffs_video_suffixes() {
        assert_eq!(MediaKind::from_url("https://x/out.mp4"), MediaKind::Video);
        assert_eq!(
            MediaKind::from_url("https://x/out.WEBM?sig=abc"),
            MediaKind::Video
        );
        assert_eq!(MediaKind::from_url("https://x/out.png"), MediaKind::Image);
        assert_eq!(
            MediaKind::from_url("https://x/clip.mp4#t=10"),
            MediaKind::Video
        );
    }
}
