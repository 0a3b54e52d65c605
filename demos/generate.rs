//! This demo runs the whole pipeline for a local image:
//! 1. Uploading the file to CDN-backed storage.
//! 2. Submitting a generation job and polling it to completion.
//! 3. Downloading the generated media into the current directory.
//!
//! To run it, set the `CHROMA_USER_ID` and `CHROMA_EFFECT_ID` environment
//! variables (a `.env` file works too).
//!
//! Usage:
//! `cargo run --example generate <IMAGE_PATH>`

use std::env;

use chromastudio::{ChromaClient, ClientConfig, DownloadOutcome, MediaFile, MediaKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file if it exists.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let user_id = env::var("CHROMA_USER_ID")
        .map_err(|_| anyhow::anyhow!("Please set the CHROMA_USER_ID environment variable."))?;
    let effect_id = env::var("CHROMA_EFFECT_ID")
        .map_err(|_| anyhow::anyhow!("Please set the CHROMA_EFFECT_ID environment variable."))?;

    let image_path = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Please provide an image path as an argument."))?;

    let config = ClientConfig::new(user_id, effect_id, MediaKind::Image)?;
    let client = ChromaClient::new(config)?;

    println!("Running the generation pipeline for '{}'...", image_path);
    let file = MediaFile::from_path(&image_path).await?;
    let run = client.run_pipeline(&file).await?;

    println!("\nSource uploaded as: {}", run.source.url);
    println!("Job {} finished.", run.job.job_id);
    println!("Result: {} ({:?})", run.result_url(), run.output.kind);

    match client.download(run.result_url(), ".", None).await {
        DownloadOutcome::Saved(path) => {
            println!("\nSaved to: {}", path.display());
        }
        DownloadOutcome::OpenExternally(url) => {
            println!("\nDirect download failed. Open manually: {}", url);
        }
    }

    Ok(())
}
