use std::time::Duration;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("missing CEP argument")]
    MissingArgument,
    #[error("invalid CEP [{cep}]: expected 8 characters, got {len}")]
    InvalidInput { cep: String, len: usize },
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: StatusCode, url: String },
    #[error("cannot read response body: {0}")]
    Io(#[source] reqwest::Error),
    #[error("cannot decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("CEP not found")]
    NotFound,
    #[error("lookup task ended without an answer")]
    Abandoned,
    #[error("no address found within {0:?}")]
    Timeout(Duration),
}
