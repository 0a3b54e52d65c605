//! This demo downloads an already generated media URL through the tiered
//! fallback cascade and saves it into the current directory.
//!
//! To run it, set the `CHROMA_USER_ID` and `CHROMA_EFFECT_ID` environment
//! variables (a `.env` file works too).
//!
//! Usage:
//! `cargo run --example download <MEDIA_URL>`

use std::env;

use chromastudio::{ChromaClient, ClientConfig, DownloadOutcome, MediaKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file if it exists.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let user_id = env::var("CHROMA_USER_ID")
        .map_err(|_| anyhow::anyhow!("Please set the CHROMA_USER_ID environment variable."))?;
    let effect_id = env::var("CHROMA_EFFECT_ID")
        .map_err(|_| anyhow::anyhow!("Please set the CHROMA_EFFECT_ID environment variable."))?;

    let url = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Please provide a media URL as an argument."))?;

    let config = ClientConfig::new(user_id, effect_id, MediaKind::from_url(&url))?;
    let client = ChromaClient::new(config)?;

    println!("Downloading '{}'...", url);
    match client.download(&url, ".", None).await {
        DownloadOutcome::Saved(path) => {
            println!("Saved to: {}", path.display());
        }
        DownloadOutcome::OpenExternally(url) => {
            println!("Direct download failed. Open manually: {}", url);
        }
    }

    Ok(())
}
