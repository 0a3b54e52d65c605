use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::ChromaError;
use crate::ident;
use crate::status::{Phase, StatusSink, TracingSink};
use crate::types::{
    GeneratedMedia, GenerationJob, ImageJobRequest, JobStatus, MediaFile, MediaKind,
    UploadedAsset, VideoJobRequest,
};

/// The outcome of a cancellable polling run.
///
/// Cancellation is a terminal state of its own, not an error: an abandoned
/// action is not a failed one.
#[derive(Debug)]
pub enum PollOutcome {
    /// The job reached `completed`; carries the full status response.
    Finished(JobStatus),
    /// The cancellation token fired before the job reached a terminal state.
    Cancelled,
}

/// The main client for interacting with the ChromaStudio API.
///
/// It holds the shared `reqwest::Client`, the configuration and the status
/// sink. It is designed to be cloneable and safe to share across threads;
/// it keeps no per-run state, so overlapping pipeline runs cannot corrupt
/// each other.
#[derive(Clone)]
pub struct ChromaClient {
    pub(crate) client: reqwest::Client,
    pub(crate) config: ClientConfig,
    pub(crate) sink: Arc<dyn StatusSink>,
}

impl ChromaClient {
    /// Creates a new `ChromaClient` from a configuration.
    ///
    /// Notifications go to the default [`TracingSink`] until
    /// [`with_status_sink`](Self::with_status_sink) installs another one.
    ///
    /// # Errors
    ///
    /// `ChromaError::Http` if the internal HTTP client fails to build.
    pub fn new(config: ClientConfig) -> Result<Self, ChromaError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            config,
            sink: Arc::new(TracingSink),
        })
    }

    /// Replaces the status sink, typically with the embedder's UI bridge.
    pub fn with_status_sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Uploads a file to CDN-backed storage and returns its public URL.
    ///
    /// The file is stored under a freshly generated key,
    /// `<21-char-token>.<ext>`, where the extension comes from the file
    /// name's last dot segment (`jpg` when absent). The handshake is two
    /// sequential calls: a GET against the signing endpoint for a
    /// write-capable URL, then a PUT of the raw bytes. The public URL is
    /// computed locally from the CDN base and the key; it only becomes
    /// valid once the PUT has succeeded. Interrupted uploads leave no
    /// cleanup behind.
    ///
    /// # Errors
    ///
    /// - `ChromaError::UploadUrl` if the signing endpoint fails.
    /// - `ChromaError::UploadTransfer` if the byte transfer fails.
    pub async fn upload(&self, file: &MediaFile) -> Result<UploadedAsset, ChromaError> {
        self.sink.phase(Phase::Uploading);

        let key = format!("{}.{}", ident::generate(ident::KEY_LEN), file.extension());
        let mut sign_url = self.config.api_url.join("get-emd-upload-url")?;
        sign_url.query_pairs_mut().append_pair("fileName", &key);

        tracing::debug!(%key, "requesting signed upload URL");
        let response = self
            .client
            .get(sign_url)
            .send()
            .await
            .map_err(|e| ChromaError::UploadUrl(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ChromaError::UploadUrl(response.status().to_string()));
        }
        let signed_url = response
            .text()
            .await
            .map_err(|e| ChromaError::UploadUrl(e.to_string()))?;

        let transfer = self
            .client
            .put(signed_url.trim())
            .header(CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| ChromaError::UploadTransfer(e.to_string()))?;
        if !transfer.status().is_success() {
            return Err(ChromaError::UploadTransfer(transfer.status().to_string()));
        }

        let url = self.config.cdn_url.join(&key)?;
        tracing::debug!(%url, "upload complete");
        self.sink.phase(Phase::Ready);
        Ok(UploadedAsset {
            key,
            url: url.to_string(),
        })
    }

    /// Submits a generation job for an already uploaded source URL.
    ///
    /// The endpoint and request shape follow the configured media kind: the
    /// image path posts `imageUrl` as a scalar and carries a `toolType`
    /// field, the video path posts `imageUrl` as a single-element array.
    /// Both strip the watermark and mark the job private.
    ///
    /// # Errors
    ///
    /// `ChromaError::JobSubmission` on a non-success response or transport
    /// failure.
    pub async fn submit_job(&self, source_url: &str) -> Result<GenerationJob, ChromaError> {
        self.sink.phase(Phase::SubmittingJob);

        let kind = self.config.media_kind;
        let endpoint = self.config.api_url.join(kind.endpoint())?;
        let request = self.client.post(endpoint);
        let request = match kind {
            MediaKind::Image => request.json(&ImageJobRequest {
                model: kind.model(),
                tool_type: kind.model(),
                effect_id: &self.config.effect_id,
                image_url: source_url,
                user_id: &self.config.user_id,
                remove_watermark: true,
                is_private: true,
            }),
            MediaKind::Video => request.json(&VideoJobRequest {
                image_url: [source_url],
                effect_id: &self.config.effect_id,
                user_id: &self.config.user_id,
                remove_watermark: true,
                model: kind.model(),
                is_private: true,
            }),
        };

        let response = request
            .send()
            .await
            .map_err(|e| ChromaError::JobSubmission(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ChromaError::JobSubmission(response.status().to_string()));
        }
        let job: GenerationJob = response
            .json()
            .await
            .map_err(|e| ChromaError::JobSubmission(e.to_string()))?;

        tracing::debug!(job_id = %job.job_id, status = %job.status, "job submitted");
        self.sink.phase(Phase::JobQueued);
        Ok(job)
    }

    /// Queries the status of a job once.
    ///
    /// # Errors
    ///
    /// `ChromaError::StatusQuery` on a non-success response or transport
    /// failure.
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatus, ChromaError> {
        let url = self.config.api_url.join(&format!(
            "{}/{}/{}/status",
            self.config.media_kind.endpoint(),
            self.config.user_id,
            job_id
        ))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ChromaError::StatusQuery(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ChromaError::StatusQuery(response.status().to_string()));
        }
        response
            .json()
            .await
            .map_err(|e| ChromaError::StatusQuery(e.to_string()))
    }

    /// Polls a job on the configured fixed cadence until it reaches a
    /// terminal state.
    ///
    /// Completion on the first query returns without any delay. A query
    /// failure aborts immediately: it is a protocol failure, not a busy
    /// job. No backoff and no jitter are applied; the ceiling is bounded,
    /// so the cadence stays constant.
    ///
    /// # Errors
    ///
    /// - `ChromaError::StatusQuery` if a query fails.
    /// - `ChromaError::JobFailed` if the provider reports `failed`/`error`.
    /// - `ChromaError::JobTimeout` after `max_polls` queries without a
    ///   terminal state.
    pub async fn poll_job(&self, job_id: &str) -> Result<JobStatus, ChromaError> {
        match self
            .poll_job_cancellable(job_id, CancellationToken::new())
            .await?
        {
            PollOutcome::Finished(status) => Ok(status),
            // The freshly created token above has no cancel handle.
            PollOutcome::Cancelled => unreachable!("poll cancelled without a cancel handle"),
        }
    }

    /// Like [`poll_job`](Self::poll_job), but abandonable.
    ///
    /// The token is checked before each query and raced against each wait;
    /// once it fires, the run resolves to [`PollOutcome::Cancelled`] instead
    /// of raising an error.
    pub async fn poll_job_cancellable(
        &self,
        job_id: &str,
        cancel: CancellationToken,
    ) -> Result<PollOutcome, ChromaError> {
        for attempt in 1..=self.config.max_polls {
            if cancel.is_cancelled() {
                return Ok(PollOutcome::Cancelled);
            }

            let status = self.job_status(job_id).await?;
            tracing::debug!(attempt, status = %status.status, "job status");

            let state = status.status.clone();
            match state.as_str() {
                "completed" => return Ok(PollOutcome::Finished(status)),
                "failed" | "error" => {
                    let message = status
                        .error
                        .unwrap_or_else(|| "job processing failed".to_string());
                    return Err(ChromaError::JobFailed(message));
                }
                _ => {
                    self.sink.phase(Phase::Processing(attempt));
                    tokio::select! {
                        _ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
                        _ = sleep(self.config.poll_interval) => {}
                    }
                }
            }
        }
        Err(ChromaError::JobTimeout(self.config.max_polls))
    }

    /// Submits a job for a source URL, waits for it and resolves the
    /// canonical media URL.
    ///
    /// On success the sink receives [`Phase::Complete`] and the
    /// result-ready callback with a kind hint sniffed from the URL.
    pub async fn generate(&self, source_url: &str) -> Result<GeneratedMedia, ChromaError> {
        let (_, media) = self.generate_with_job(source_url).await?;
        Ok(media)
    }

    pub(crate) async fn generate_with_job(
        &self,
        source_url: &str,
    ) -> Result<(GenerationJob, GeneratedMedia), ChromaError> {
        let job = self.submit_job(source_url).await?;
        let status = self.poll_job(&job.job_id).await?;
        let url = status.media_url()?.to_string();
        let kind = MediaKind::from_url(&url);
        self.sink.phase(Phase::Complete);
        self.sink.result_ready(&url, kind);
        Ok((job, GeneratedMedia { url, kind }))
    }
}
