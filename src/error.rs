/// Represents the possible errors that can occur when using the ChromaStudio SDK.
///
/// Each pipeline stage owns its own variant so callers can tell a failed
/// upload handshake apart from a failed transfer or a rejected job.
/// Transport-level failures (DNS, connection reset) surface as the same
/// variant as a non-success HTTP status from that stage.
#[derive(Debug, thiserror::Error)]
pub enum ChromaError {
    /// The signing endpoint refused or failed to issue an upload URL.
    #[error("failed to get signed upload URL: {0}")]
    UploadUrl(String),
    /// The byte transfer to the signed URL failed.
    #[error("failed to upload file: {0}")]
    UploadTransfer(String),
    /// The generation job could not be submitted.
    #[error("failed to submit job: {0}")]
    JobSubmission(String),
    /// A status query returned a non-success response. This is a protocol
    /// failure, distinct from a job that is merely still processing.
    #[error("failed to check job status: {0}")]
    StatusQuery(String),
    /// The provider reported the job as failed.
    #[error("job processing failed: {0}")]
    JobFailed(String),
    /// The job did not reach a terminal state within the polling ceiling.
    #[error("job timed out after {0} polls")]
    JobTimeout(u32),
    /// The job completed but no media URL could be found in its result.
    #[error("no media URL in job result")]
    MissingMediaUrl,
    /// Direct retrieval of the final media failed (download tier 1).
    #[error("download failed: {0}")]
    Download(String),
    /// Re-encoding the on-screen preview failed (download tier 2, non-fatal:
    /// the cascade falls through to handing the URL back).
    #[error("preview fallback failed: {0}")]
    PreviewFallback(String),
    /// The internal HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    /// An error occurred while parsing a URL, typically a base URL.
    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
    /// An error occurred during file I/O operations.
    #[error("file error: {0}")]
    FileError(#[from] std::io::Error),
}
