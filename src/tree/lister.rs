//! PathLister - flat listing of every directory and file path under a root
//!
//! A listing runs as a task on the runtime. Discovery events stream out
//! through a channel while the task builds the final `PathList`; the
//! terminal `End` event is sent exactly once, whether the traversal
//! succeeds, fails or is aborted.

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::{FutureExt, Stream};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::Result;
use crate::fs::{FileSystem, LocalFs};

use super::config::ListOptions;
use super::traversal::SiblingTasks;
use super::utils::{default_base_dir, display_path, with_trailing_separator};

/// Ordered directory and file paths. Directories carry a trailing separator.
pub type PathList = Vec<String>;

/// Notification sent while a listing is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "path", rename_all = "lowercase")]
pub enum ListEvent {
    /// A directory was read; sent after its entries are listed.
    Directory(String),
    /// A regular file was found.
    File(String),
    /// The listing finished. Always the last event.
    End,
}

impl ListEvent {
    pub fn path(&self) -> Option<&str> {
        match self {
            ListEvent::Directory(path) | ListEvent::File(path) => Some(path),
            ListEvent::End => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, ListEvent::End)
    }
}

/// Lists paths under a directory concurrently.
pub struct PathLister {
    options: ListOptions,
    fs: Arc<dyn FileSystem>,
    runtime: Option<Handle>,
}

impl PathLister {
    pub fn new(options: ListOptions) -> Self {
        Self {
            options,
            fs: Arc::new(LocalFs),
            runtime: None,
        }
    }

    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Run the listing on `handle` instead of the ambient runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Start listing `root` and return immediately.
    ///
    /// # Panics
    ///
    /// Panics if no runtime was configured and this is called outside a
    /// Tokio runtime.
    pub fn list(&self, root: impl AsRef<Path>) -> PathListing {
        let root_path = root.as_ref().to_path_buf();
        let root = root_path.to_string_lossy().into_owned();
        let base_dir = match &self.options.base_dir {
            Some(base) => with_trailing_separator(base),
            None => default_base_dir(&root),
        };
        debug!("Listing paths under {} (base {})", root, base_dir);

        let handle = self.runtime.clone().unwrap_or_else(Handle::current);
        let (sender, receiver) = mpsc::unbounded_channel();
        let events = Arc::new(EventSink(Mutex::new(Some(sender))));
        let end = EndGuard(events.clone());

        let ctx = Arc::new(ListContext {
            fs: self.fs.clone(),
            handle: handle.clone(),
            options: self.options.clone(),
            base_dir,
            events,
        });

        let task = handle.spawn(async move {
            let _end = end;
            let result = list_dir(ctx, root_path, with_trailing_separator(&root)).await;
            if let Err(err) = &result {
                debug!("Listing failed: {}", err);
            }
            result
        });

        PathListing {
            events: receiver,
            task,
        }
    }
}

/// A running listing: a stream of `ListEvent`s plus the final result.
///
/// Dropping a `PathListing` does not cancel the traversal; use `abort`.
pub struct PathListing {
    events: UnboundedReceiver<ListEvent>,
    task: JoinHandle<Result<PathList>>,
}

impl PathListing {
    /// Next event, or `None` once the listing has ended and every event
    /// was consumed.
    pub async fn next_event(&mut self) -> Option<ListEvent> {
        self.events.recv().await
    }

    /// Wait for the final path list. Events not yet consumed are discarded,
    /// and events sent from here on are dropped instead of buffered.
    pub async fn finish(self) -> Result<PathList> {
        let PathListing { events, task } = self;
        drop(events);
        task.await?
    }

    /// Drain every event up to and including `End`, then wait for the result.
    pub async fn collect_events(mut self) -> (Vec<ListEvent>, Result<PathList>) {
        let mut seen = Vec::new();
        while let Some(event) = self.events.recv().await {
            let end = event.is_end();
            seen.push(event);
            if end {
                break;
            }
        }
        (seen, self.finish().await)
    }

    /// Cancel the traversal. `End` is still delivered and `finish` returns
    /// a task error. Entries that were mid-flight when the traversal was
    /// cancelled are not reported; nothing is delivered after `End`.
    pub fn abort(&self) {
        self.task.abort();
    }
}

impl Stream for PathListing {
    type Item = ListEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_recv(cx)
    }
}

/// Start listing `root` on the ambient runtime.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn list_paths(root: impl AsRef<Path>, options: ListOptions) -> PathListing {
    PathLister::new(options).list(root)
}

/// Event channel shared by every task of one listing.
///
/// Closing the sink sends `End` and drops the sender, so an event raced
/// in by a sibling task that is still winding down is discarded.
struct EventSink(Mutex<Option<UnboundedSender<ListEvent>>>);

impl EventSink {
    fn emit(&self, event: ListEvent) {
        let sender = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(sender) => {
                if let Err(err) = sender.send(event) {
                    trace!("Dropping event {:?}, receiver closed", err.0);
                }
            }
            None => trace!("Dropping event {:?} after end", event),
        }
    }

    fn close(&self) {
        let sender = self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(sender) = sender {
            if sender.send(ListEvent::End).is_err() {
                trace!("Listing receiver dropped before end");
            }
        }
    }
}

/// Sends `End` when the driving task completes or is dropped.
struct EndGuard(Arc<EventSink>);

impl Drop for EndGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

struct ListContext {
    fs: Arc<dyn FileSystem>,
    handle: Handle,
    options: ListOptions,
    base_dir: String,
    events: Arc<EventSink>,
}

impl ListContext {
    fn display(&self, path: &str) -> String {
        display_path(path, self.options.normalize, &self.base_dir)
    }

    fn emit(&self, event: ListEvent) {
        self.events.emit(event);
    }
}

fn list_dir(
    ctx: Arc<ListContext>,
    dir_path: PathBuf,
    dir: String,
) -> BoxFuture<'static, Result<PathList>> {
    list_dir_level(ctx, dir_path, dir).boxed()
}

/// `dir_path` is the real location; `dir` is its lossy spelling and always
/// ends with a separator.
async fn list_dir_level(
    ctx: Arc<ListContext>,
    dir_path: PathBuf,
    dir: String,
) -> Result<PathList> {
    if let Some(filter) = &ctx.options.filter {
        if !filter.accepts(&dir) {
            debug!("Filter rejected {}", dir);
            return Ok(Vec::new());
        }
    }

    let names = ctx.fs.list_entries(&dir_path).await?;
    let own_path = ctx.display(&dir);
    ctx.emit(ListEvent::Directory(own_path.clone()));
    debug!("Listed {} entries in {}", names.len(), dir);

    let mut siblings = SiblingTasks::new(ctx.handle.clone());
    for name in names {
        let path = dir_path.join(&name);
        let shown = format!("{dir}{}", name.to_string_lossy());
        siblings.spawn(list_entry(ctx.clone(), path, shown));
    }

    let mut paths = vec![own_path];
    siblings
        .join_first_error(|entry_paths| paths.extend(entry_paths))
        .await?;
    Ok(paths)
}

async fn list_entry(ctx: Arc<ListContext>, path: PathBuf, shown: String) -> Result<PathList> {
    let metadata = ctx.fs.metadata(&path).await?;

    if metadata.is_dir {
        let dir = with_trailing_separator(&shown);
        if ctx.options.recursive {
            return list_dir(ctx, path, dir).await;
        }
        trace!("Not descending into {}", dir);
        return Ok(vec![ctx.display(&dir)]);
    }

    let shown = ctx.display(&shown);
    ctx.emit(ListEvent::File(shown.clone()));
    Ok(vec![shown])
}
