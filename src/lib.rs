//! An unofficial Rust SDK for the ChromaStudio media effects API.
//!
//! This SDK provides a convenient, asynchronous interface for the
//! ChromaStudio platform: upload a local image to CDN-backed storage,
//! submit an asynchronous generation job, poll it to completion and
//! download the resulting media. It handles the signed-URL upload
//! handshake, the provider's variant-shaped result payloads and a
//! multi-tier download fallback, allowing you to focus on your
//! application's core logic.
//!
//! ## Features
//! - Image-effect and video-effect generation from an uploaded image.
//! - Asynchronous API for non-blocking operations.
//! - Bounded job polling with optional cancellation.
//! - Tiered media download that degrades gracefully instead of failing.
//! - Typed error handling for robust applications.
//!
//! ## Example
//!
//! ```no_run
//! use chromastudio::{ChromaClient, ClientConfig, MediaFile, MediaKind};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = ClientConfig::new("account-id", "photoToVectorArt", MediaKind::Image)?;
//! let client = ChromaClient::new(config)?;
//!
//! let file = MediaFile::from_path("photo.png").await?;
//! let run = client.run_pipeline(&file).await?;
//! println!("generated: {}", run.result_url());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod ident;
pub mod pipeline;
pub mod status;
pub mod types;

pub use client::{ChromaClient, PollOutcome};
pub use config::ClientConfig;
pub use download::{DownloadOutcome, PreviewImage};
pub use error::ChromaError;
pub use pipeline::PipelineRun;
pub use status::{Phase, StatusSink, TracingSink};
pub use types::{
    GeneratedMedia, GenerationJob, JobStatus, MediaFile, MediaKind, ResultEntry, ResultPayload,
    UploadedAsset,
};
