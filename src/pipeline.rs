//! The composed upload → submit → poll → resolve pipeline.
//!
//! Each run owns its state in a [`PipelineRun`] that is handed back to the
//! caller, who keeps whatever "current" notion it needs. The crate holds no
//! shared mutable slot between runs.

use crate::client::ChromaClient;
use crate::error::ChromaError;
use crate::status::Phase;
use crate::types::{GeneratedMedia, GenerationJob, MediaFile, UploadedAsset};

/// The full record of one completed pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// The uploaded source asset.
    pub source: UploadedAsset,
    /// The job that transformed it.
    pub job: GenerationJob,
    /// The resolved output.
    pub output: GeneratedMedia,
}

impl PipelineRun {
    /// The URL a caller would track as "current" after this run: the
    /// generated output, superseding the uploaded source.
    pub fn result_url(&self) -> &str {
        &self.output.url
    }
}

impl ChromaClient {
    /// Runs the whole pipeline for a local file: upload it, submit the
    /// generation job, poll to completion and resolve the result URL.
    ///
    /// Any stage error is terminal for the run: the sink receives
    /// [`Phase::Error`] once and the error propagates unchanged. Nothing is
    /// retried.
    pub async fn run_pipeline(&self, file: &MediaFile) -> Result<PipelineRun, ChromaError> {
        match self.pipeline_inner(file).await {
            Ok(run) => Ok(run),
            Err(err) => {
                tracing::warn!(%err, "pipeline run failed");
                self.sink.phase(Phase::Error);
                Err(err)
            }
        }
    }

    async fn pipeline_inner(&self, file: &MediaFile) -> Result<PipelineRun, ChromaError> {
        let source = self.upload(file).await?;
        let (job, output) = self.generate_with_job(&source.url).await?;
        Ok(PipelineRun {
            source,
            job,
            output,
        })
    }
}
