//! Latency benchmark for the UApoly backend REST API.
//!
//! Each phase fires a batch of requests at one endpoint through a bounded
//! worker pool, collects one latency sample per response and hands the
//! resulting table to the reporter.

#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod report;
pub mod utils;

pub use error::{BenchError, Result};
pub use executor::{run_benchmark, LoadGenerator};
