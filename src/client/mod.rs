//! Access to the remote analysis service
//!
//! [`Backend`] is the seam between the UI and the network: the real
//! implementation is [`HttpBackend`], tests substitute their own.

mod http;

pub use http::{HttpBackend, DEFAULT_BACKEND_URL};

use crate::model::{ParseTree, Token};
use thiserror::Error;

/// Why an outbound request did not produce usable data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The request never got a response (connection refused, DNS, I/O)
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("server responded with status {code}{}", detail_suffix(.detail))]
    Status { code: u16, detail: Option<String> },

    /// The response body was not the expected shape
    #[error("malformed response: {0}")]
    Decode(String),

    /// Too many earlier requests are still waiting on the service
    #[error("too many requests outstanding ({0}), try again shortly")]
    Busy(usize),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(text) => format!(": {}", text),
        None => String::new(),
    }
}

/// The two operations the analysis service offers
pub trait Backend: Send + Sync {
    /// Split `code` into tokens, in source order
    fn tokenize(&self, code: &str) -> Result<Vec<Token>, RequestError>;

    /// Build a parse tree for `code`
    fn parse(&self, code: &str) -> Result<ParseTree, RequestError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_includes_detail() {
        let err = RequestError::Status {
            code: 400,
            detail: Some("No C++ code provided".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "server responded with status 400: No C++ code provided"
        );

        let bare = RequestError::Status {
            code: 502,
            detail: None,
        };
        assert_eq!(bare.to_string(), "server responded with status 502");
    }
}
