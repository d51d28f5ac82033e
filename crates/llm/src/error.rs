use thiserror::Error;

/// Errors from the chat-completion client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("llm request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("llm endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    /// A 2xx response that carried no usable completion text.
    #[error("llm response contained no completion")]
    EmptyResponse,
}
