//! Common sibling fan-out shared by the async reader and lister.
//!
//! Every entry of a directory level runs as its own task on the caller's
//! runtime. The level resolves once every task has finished; the first
//! failure is surfaced and later results are dropped.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{Error, Result};

/// Tasks spawned for the entries of one directory level.
pub struct SiblingTasks<T> {
    tasks: JoinSet<Result<T>>,
    handle: Handle,
}

impl<T: Send + 'static> SiblingTasks<T> {
    pub fn new(handle: Handle) -> Self {
        Self {
            tasks: JoinSet::new(),
            handle,
        }
    }

    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.tasks.spawn_on(task, &self.handle);
    }

    /// Wait for every task, feeding successful outputs to `accept` in
    /// completion order until the first failure. Returns that failure, if any.
    pub async fn join_first_error(mut self, mut accept: impl FnMut(T)) -> Result<()> {
        let mut first_error: Option<Error> = None;

        while let Some(joined) = self.tasks.join_next().await {
            let outcome = joined.map_err(Error::from).and_then(|result| result);
            match outcome {
                Ok(value) if first_error.is_none() => accept(value),
                Ok(_) => {}
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(err) => debug!("Discarding sibling error: {}", err),
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
