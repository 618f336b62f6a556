use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// The chat gateway answered with a non-success status.
    #[error("Chat gateway error {status}: {body}")]
    Gateway { status: u16, body: String },

    /// Transport-level HTTP failure reaching the chat gateway.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// SMTP transport or message-building failure.
    #[error("Email error: {0}")]
    Email(String),
}

pub type Result<T> = std::result::Result<T, NotifyError>;
