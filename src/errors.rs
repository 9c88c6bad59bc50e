// src/errors.rs
use thiserror::Error;

/// Why a single attempt against the upstream failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("upstream request timed out after {0}ms")]
    Timeout(u64),

    #[error("upstream transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(error_chain(&e))
    }
}

/// Renders an error and every `source()` below it, joined with `: `.
pub fn error_chain(e: &dyn std::error::Error) -> String {
    let mut rendered = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // Some wrappers repeat their cause in their own message.
        if !rendered.ends_with(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}

/// Why an upstream payload was not trusted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("payload has unexpected shape ({reason}): {payload}")]
    Shape { reason: String, payload: String },

    #[error("payload status marker was {found:?}, expected \"success\"")]
    StatusMarker { found: Option<String> },

    #[error("payload message {value:?} is not an absolute URL: {reason}")]
    UrlFormat { value: String, reason: String },
}

impl Rejection {
    /// Short tag used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::Shape { .. } => "shape",
            Rejection::StatusMarker { .. } => "status-marker",
            Rejection::UrlFormat { .. } => "url-format",
        }
    }
}

/// Everything that can go wrong while producing a dog image.
#[derive(Error, Debug)]
pub enum DogError {
    #[error("upstream unreachable after {attempts} attempt(s): {source}")]
    Fetch {
        attempts: u32,
        #[source]
        source: FetchError,
    },

    #[error("upstream responded with status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("upstream payload rejected: {0}")]
    Rejected(#[from] Rejection),
}

/// Invalid startup configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Invalid or unreadable deployment definition.
#[derive(Error, Debug)]
pub enum StackError {
    #[error("Failed to read stack file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse stack TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to render stack JSON: {0}")]
    JsonRender(#[from] serde_json::Error),

    #[error("Invalid stack definition: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, DogError>;
