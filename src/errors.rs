use thiserror::Error;

/// Main crate error type.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Request plumbing failure (connect, timeout, body read)
    #[error("Request error: {0}")]
    Request(String),

    /// Non-success HTTP status without a parseable API envelope
    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    /// The Bot API rejected the call (`ok: false`)
    #[error("Telegram API error (code {code:?}): {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },

    /// JSON parse error
    #[error("Json parse error: {0}")]
    JsonParse(String),

    /// Invalid runtime configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// Convenience constructors for common error patterns
impl Error {
    /// Create a request plumbing error
    pub fn request(msg: impl Into<String>) -> Self {
        Error::Request(msg.into())
    }

    /// Create an HTTP status error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Error::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a Bot API rejection error
    pub fn api(code: Option<i64>, description: impl Into<String>) -> Self {
        Error::Api {
            code,
            description: description.into(),
        }
    }

    /// Create a JSON parse error
    pub fn json_parse(msg: impl Into<String>) -> Self {
        Error::JsonParse(msg.into())
    }
}
