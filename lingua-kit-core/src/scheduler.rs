//! Bounded-concurrency dispatch for documents and node groups.
//!
//! Three semaphores compose: documents across the process, groups inside
//! one document, and provider calls across all in-flight groups (armed on
//! the [`PipelineExecutor`](crate::pipeline::PipelineExecutor)). Every
//! suspension point races the document's cancellation token, and the
//! first fatal group error cancels the rest.

use crate::error::TranslateError;
use log::error;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Shared scheduling state for one engine instance.
pub struct Scheduler {
    doc_permits: Arc<Semaphore>,
    inner_concurrency: usize,
}

impl Scheduler {
    /// `doc_concurrency` bounds parallel documents; `inner_concurrency`
    /// bounds parallel groups within each document.
    pub fn new(doc_concurrency: usize, inner_concurrency: usize) -> Self {
        Self {
            doc_permits: Arc::new(Semaphore::new(doc_concurrency.max(1))),
            inner_concurrency: inner_concurrency.max(1),
        }
    }

    /// A semaphore sized for this scheduler's provider-call budget, to be
    /// shared with the pipeline executor via
    /// [`PipelineExecutor::with_call_permits`](crate::pipeline::PipelineExecutor::with_call_permits).
    pub fn call_permits(&self) -> Arc<Semaphore> {
        Arc::new(Semaphore::new(self.inner_concurrency))
    }

    /// Claims a document slot, racing cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::Cancelled`] when the token fires first.
    pub async fn acquire_document(
        &self,
        cancel: &CancellationToken,
    ) -> Result<OwnedSemaphorePermit, TranslateError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TranslateError::Cancelled),
            permit = self.doc_permits.clone().acquire_owned() => {
                permit.map_err(|_| TranslateError::Cancelled)
            }
        }
    }

    /// Runs every task under the inner-concurrency bound and returns the
    /// results in task order.
    ///
    /// Group completion order is unspecified; callers merge by stable node
    /// IDs, never by position in time. A task whose error is fatal cancels
    /// the token, which makes the remaining tasks return
    /// [`TranslateError::Cancelled`] instead of starting work.
    pub async fn run_groups<T, F, Fut>(
        &self,
        tasks: Vec<F>,
        cancel: &CancellationToken,
    ) -> Vec<Result<T, TranslateError>>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TranslateError>> + Send + 'static,
    {
        let total = tasks.len();
        let permits = Arc::new(Semaphore::new(self.inner_concurrency));
        let mut join_set = JoinSet::new();

        for (index, task) in tasks.into_iter().enumerate() {
            let permits = Arc::clone(&permits);
            let cancel = cancel.clone();
            join_set.spawn(async move {
                let _permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return (index, Err(TranslateError::Cancelled)),
                    permit = permits.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return (index, Err(TranslateError::Cancelled)),
                    },
                };
                if cancel.is_cancelled() {
                    return (index, Err(TranslateError::Cancelled));
                }
                (index, task().await)
            });
        }

        let mut results: Vec<Option<Result<T, TranslateError>>> =
            (0..total).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if let Err(e) = &result
                        && e.is_fatal()
                    {
                        cancel.cancel();
                    }
                    results[index] = Some(result);
                }
                Err(join_error) => {
                    error!("group task aborted: {join_error}");
                }
            }
        }

        results
            .into_iter()
            .map(|slot| slot.unwrap_or(Err(TranslateError::Cancelled)))
            .collect()
    }
}
