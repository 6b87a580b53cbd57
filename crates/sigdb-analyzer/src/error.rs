use thiserror::Error;

/// Errors returned by the analysis worker client.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Network or TLS failure from the underlying HTTP client, or a non-2xx
    /// status from the worker.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured webhook URL is not a valid URL.
    #[error("invalid webhook URL '{url}': {reason}")]
    InvalidWebhookUrl { url: String, reason: String },
}
