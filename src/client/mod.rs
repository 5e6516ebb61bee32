use std::time::{Duration, Instant};

use hyper::client::HttpConnector;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body as HyperBody, Client, Method, Request, Uri};
use hyper_tls::HttpsConnector;
use serde_json::Value;

use crate::error::{BenchError, Result};
use crate::models::job::{HttpMethod, RequestJob};

pub type HttpsClient = Client<HttpsConnector<HttpConnector>>;

pub fn build_client() -> HttpsClient {
    let https = HttpsConnector::new();
    Client::builder().build::<_, HyperBody>(https)
}

/// Outcome of one request/response pair.
#[derive(Debug)]
pub struct Exchange {
    /// Instant taken right before the request was handed to the client.
    pub sent_at: Instant,
    /// Time until the response head arrived.
    pub latency: Duration,
    pub body: Value,
}

pub async fn send_request(client: &HttpsClient, job: &RequestJob) -> Result<Exchange> {
    let uri: Uri = job
        .url
        .as_str()
        .parse::<Uri>()
        .map_err(hyper::http::Error::from)?;

    let method = match job.method {
        HttpMethod::GET => Method::GET,
        HttpMethod::POST => Method::POST,
    };

    let mut req_builder = Request::builder().method(method).uri(uri);

    let body = match &job.body {
        Some(bytes) => {
            req_builder = req_builder.header(CONTENT_TYPE, "application/json");
            HyperBody::from(bytes.clone())
        }
        None => HyperBody::empty(),
    };

    if let Some(value) = job.auth.header_value() {
        req_builder = req_builder.header(AUTHORIZATION, value);
    }

    let request = req_builder.body(body)?;

    let sent_at = Instant::now();
    let response = client.request(request).await?;
    let latency = sent_at.elapsed();

    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await?;

    if !status.is_success() {
        return Err(BenchError::Status {
            url: job.url.to_string(),
            status,
        });
    }

    Ok(Exchange {
        sent_at,
        latency,
        body: decode_body(job, &bytes)?,
    })
}

fn decode_body(job: &RequestJob, bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|source| BenchError::Decode {
        url: job.url.to_string(),
        source,
    })
}
