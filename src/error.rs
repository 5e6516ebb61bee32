use hyper::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("transport error: {0}")]
    Transport(#[from] hyper::Error),

    #[error("invalid request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },

    #[error("malformed response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("no token issued for {login}")]
    MissingToken { login: String },

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
