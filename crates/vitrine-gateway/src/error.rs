use thiserror::Error;

/// Errors returned by the catalog gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status; the message is the
    /// backend's own error body where one was readable.
    #[error("backend error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// An image body could not be decoded far enough to read its dimensions.
    #[error("image decode error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: image::ImageError,
    },
}
