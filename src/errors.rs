use thiserror::Error;

/// Errors that can occur while resolving charm icons.
#[derive(Error, Debug)]
pub enum IconError {
    #[error("cannot parse charm {reference:?}: {message}")]
    Parse { reference: String, message: String },

    #[error("HTTP error fetching {url}: {message}")]
    Transport { url: String, message: String },

    #[error("cannot retrieve icon from {url}: {status} {reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("could not read icon data from url {url}: {source}")]
    Read {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `IconError`.
pub type Result<T> = std::result::Result<T, IconError>;
