//! Blocking HTTP implementation of [`Backend`]

use super::{Backend, RequestError};
use crate::model::{error_detail, CodeRequest, ParseResponse, ParseTree, Token, TokenizeResponse};
use serde::de::DeserializeOwned;
use std::io::{BufReader, Read};
use tracing::debug;

/// Where the analysis service listens unless told otherwise
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Talks to the analysis service over HTTP with JSON bodies
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        HttpBackend {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn post<T: DeserializeOwned>(&self, path: &str, code: &str) -> Result<T, RequestError> {
        let url = self.endpoint(path);
        debug!(%url, bytes = code.len(), "sending source");

        let response = self
            .agent
            .post(&url)
            .send_json(CodeRequest { code })
            .map_err(classify)?;

        debug!(%url, status = response.status(), "response received");
        decode_body(response.into_reader())
    }
}

impl Backend for HttpBackend {
    fn tokenize(&self, code: &str) -> Result<Vec<Token>, RequestError> {
        self.post::<TokenizeResponse>("tokenize", code).map(|body| body.tokens)
    }

    fn parse(&self, code: &str) -> Result<ParseTree, RequestError> {
        self.post::<ParseResponse>("parse", code).map(|body| body.parse_tree)
    }
}

/// Decode a JSON body of any nesting depth.
///
/// Each parse tree level costs two JSON levels, so serde_json's default limit
/// of 128 would reject trees deeper than about 63 nodes. The limit is lifted
/// and the stack grows on the heap instead.
fn decode_body<T: DeserializeOwned, R: Read>(body: R) -> Result<T, RequestError> {
    let mut json = serde_json::Deserializer::from_reader(BufReader::new(body));
    json.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut json))
        .map_err(|e| RequestError::Decode(e.to_string()))?;
    json.end().map_err(|e| RequestError::Decode(e.to_string()))?;
    Ok(value)
}

fn classify(err: ureq::Error) -> RequestError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            RequestError::Status {
                code,
                detail: error_detail(&body),
            }
        }
        ureq::Error::Transport(transport) => RequestError::Transport(transport.to_string()),
    }
}
