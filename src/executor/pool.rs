use std::future::Future;
use std::pin::{pin, Pin};
use std::task::{Context, Poll};
use std::time::Instant;

use futures_util::stream::{self, Stream, StreamExt};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::client::{send_request, HttpsClient};
use crate::error::Result;
use crate::models::job::RequestJob;
use crate::models::metrics::{LatencySample, LatencyTable};

/// A finished job, tagged with its position in the submitted batch.
#[derive(Debug)]
pub struct Completed {
    pub index: usize,
    pub sample: LatencySample,
    pub body: Value,
}

/// Runs batches of independent jobs with at most `workers` in flight.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Spawns every job on the runtime, `workers` at a time, and yields results
    /// in completion order. Start offsets are measured from `origin`.
    pub fn dispatch(
        &self,
        client: &HttpsClient,
        origin: Instant,
        jobs: Vec<RequestJob>,
    ) -> impl Stream<Item = Result<Completed>> {
        let client = client.clone();
        stream::iter(jobs.into_iter().enumerate())
            .map(move |(index, job)| {
                let client = client.clone();
                WorkerHandle(tokio::spawn(run_job(client, origin, index, job)))
            })
            .buffer_unordered(self.workers)
    }

    /// Dispatches a batch and folds the results into one table.
    ///
    /// `on_body` sees every response body with the index of its job. The first
    /// failing job ends the batch; jobs still in flight are aborted.
    pub async fn run_batch<F>(
        &self,
        client: &HttpsClient,
        route: &str,
        jobs: Vec<RequestJob>,
        mut on_body: F,
    ) -> Result<LatencyTable>
    where
        F: FnMut(usize, &Value) -> Result<()>,
    {
        let total = jobs.len();
        info!(route, requests = total, workers = self.workers, "phase started");

        let origin = Instant::now();
        let mut table = LatencyTable::with_capacity(route, total);
        let mut results = pin!(self.dispatch(client, origin, jobs));

        while let Some(result) = results.next().await {
            let done = result.map_err(|e| {
                error!(route, completed = table.len(), "request failed: {}", e);
                e
            })?;
            on_body(done.index, &done.body)?;
            table.push(done.sample);
        }

        info!(
            route,
            samples = table.len(),
            elapsed_ms = origin.elapsed().as_millis() as u64,
            "phase finished"
        );
        Ok(table)
    }
}

async fn run_job(
    client: HttpsClient,
    origin: Instant,
    index: usize,
    job: RequestJob,
) -> Result<Completed> {
    debug!(
        url = %job.url,
        method = %job.method,
        queued_ms = job.queued_at.elapsed().as_millis() as u64,
        "dispatching request"
    );

    let exchange = send_request(&client, &job).await?;

    Ok(Completed {
        index,
        sample: LatencySample {
            start: exchange.sent_at.saturating_duration_since(origin).as_secs_f64(),
            latency: exchange.latency.as_secs_f64() * 1000.0,
        },
        body: exchange.body,
    })
}

/// Join handle that aborts its task when dropped before completion.
struct WorkerHandle(JoinHandle<Result<Completed>>);

impl Future for WorkerHandle {
    type Output = Result<Completed>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.0).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) => Poll::Ready(Err(e.into())),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_has_at_least_one_worker() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
        assert_eq!(WorkerPool::new(8).workers(), 8);
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_table() {
        let client = crate::client::build_client();
        let table = WorkerPool::new(4)
            .run_batch(&client, "/nothing", Vec::new(), |_, _| Ok(()))
            .await
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.route, "/nothing");
    }
}
