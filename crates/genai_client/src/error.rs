use thiserror::Error;

/// Errors from the Gemini HTTP adapter.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("generation api error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("generation service returned an empty response")]
    EmptyResponse,

    #[error("generation response could not be decoded: {0}")]
    Decode(String),

    #[error("invalid generation base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
