//! Client configuration.
//!
//! Everything here is fixed at configuration time: the SDK exposes no
//! runtime switches. The defaults mirror the hosted production deployment.

use std::time::Duration;

use url::Url;

use crate::error::ChromaError;
use crate::types::MediaKind;

/// Default base URL of the ChromaStudio API.
pub const DEFAULT_API_URL: &str = "https://api.chromastudio.ai/";

/// Default base URL of the CDN that serves uploaded assets.
pub const DEFAULT_CDN_URL: &str = "https://contents.maxstudio.ai/";

/// Default delay between two status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Default maximum number of status queries before a job is considered
/// timed out (a two minute ceiling at the default interval).
pub const DEFAULT_MAX_POLLS: u32 = 60;

/// Configuration for a [`ChromaClient`](crate::ChromaClient).
///
/// The account id and effect id identify the requesting account and the
/// transform to apply; the media kind selects the image or video submission
/// path. The polling cadence is deliberately fixed rather than backed off:
/// the ceiling is bounded, so a constant interval keeps the observable
/// behavior simple.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for all API endpoints.
    pub api_url: Url,
    /// Base URL under which uploaded storage keys become publicly readable.
    pub cdn_url: Url,
    /// The fixed account identifier sent with every job.
    pub user_id: String,
    /// The effect/transform identifier, e.g. `photoToVectorArt`.
    pub effect_id: String,
    /// Whether jobs produce an image or a video.
    pub media_kind: MediaKind,
    /// Delay between two status queries.
    pub poll_interval: Duration,
    /// Maximum number of status queries before giving up.
    pub max_polls: u32,
}

impl ClientConfig {
    /// Creates a configuration with production defaults for the given
    /// account, effect and media kind.
    ///
    /// # Errors
    ///
    /// Returns `ChromaError::UrlError` if the built-in default URLs fail to
    /// parse, which indicates a broken build rather than a runtime problem.
    pub fn new(
        user_id: impl Into<String>,
        effect_id: impl Into<String>,
        media_kind: MediaKind,
    ) -> Result<Self, ChromaError> {
        Ok(Self {
            api_url: Url::parse(DEFAULT_API_URL)?,
            cdn_url: Url::parse(DEFAULT_CDN_URL)?,
            user_id: user_id.into(),
            effect_id: effect_id.into(),
            media_kind,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        })
    }

    /// Overrides both base URLs, typically to point at a mock server.
    pub fn with_urls(mut self, api_url: &str, cdn_url: &str) -> Result<Self, ChromaError> {
        self.api_url = Url::parse(api_url)?;
        self.cdn_url = Url::parse(cdn_url)?;
        Ok(self)
    }

    /// Overrides the polling cadence.
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }
}
