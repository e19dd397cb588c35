// Error taxonomy for the client.
//
// Only fatal conditions live here. An expired token and a rejected item
// operation are ordinary outcomes (see `model::Outcome`) because the session
// controller has to branch on them instead of bailing out.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The admin password could not be resolved, or a config source was malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Token issuance failed: wrong password, or the server is unreachable.
    #[error("authentication failed: {detail}")]
    Authentication { detail: String },

    /// The operator pressed Ctrl-C while a prompt was waiting.
    #[error("interrupted")]
    Interrupted,

    /// The terminal could not be read from or written to.
    #[error("terminal error: {0}")]
    Prompt(#[source] io::Error),
}

impl ClientError {
    pub fn authentication(detail: impl Into<String>) -> Self {
        ClientError::Authentication {
            detail: detail.into(),
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::Interrupted {
            ClientError::Interrupted
        } else {
            ClientError::Prompt(err)
        }
    }
}
