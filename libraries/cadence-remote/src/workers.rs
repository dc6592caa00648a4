//! Background workers
//!
//! One tokio task per request. Each task owns a child of a root
//! `CancellationToken` and reports back over an unbounded channel; nothing
//! here touches playlist state.

use crate::downloader::Downloader;
use cadence_core::{
    DownloadDispatcher, LocalTrack, RemoteCandidate, RemoteCompletion, RemoteError, RemoteRequest,
    RequestId, Result,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Settings for worker tasks
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Where downloads land
    pub cache_dir: PathBuf,

    /// Maximum candidates per search
    pub search_limit: usize,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./data/cache"),
            search_limit: 10,
        }
    }
}

/// Outcome of [`RemoteWorkers::shutdown`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Tasks that stopped on their own after cancellation
    pub finished: usize,

    /// Tasks that had to be aborted after the timeout
    pub aborted: usize,
}

#[derive(Default)]
struct Tasks {
    tokens: HashMap<RequestId, CancellationToken>,
    handles: Vec<JoinHandle<()>>,
}

struct Inner {
    downloader: Arc<dyn Downloader>,
    settings: WorkerSettings,
    runtime: Handle,
    completions: mpsc::UnboundedSender<RemoteCompletion>,
    root: CancellationToken,
    closed: AtomicBool,
    tasks: Mutex<Tasks>,
}

impl Inner {
    fn tasks(&self) -> MutexGuard<'_, Tasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn forget(&self, id: RequestId) {
        self.tasks().tokens.remove(&id);
    }
}

/// Spawns and tracks one task per remote request
///
/// Cheap to clone; clones share the same task registry.
#[derive(Clone)]
pub struct RemoteWorkers {
    inner: Arc<Inner>,
}

impl RemoteWorkers {
    /// Create workers on the current tokio runtime
    ///
    /// Returns the receiving end of the completion channel; the control loop
    /// owns it and applies completions in arrival order.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn new(
        downloader: Arc<dyn Downloader>,
        settings: WorkerSettings,
    ) -> (Self, mpsc::UnboundedReceiver<RemoteCompletion>) {
        Self::with_runtime(downloader, settings, Handle::current())
    }

    /// Create workers that spawn onto `runtime`
    pub fn with_runtime(
        downloader: Arc<dyn Downloader>,
        settings: WorkerSettings,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<RemoteCompletion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let inner = Inner {
            downloader,
            settings,
            runtime,
            completions,
            root: CancellationToken::new(),
            closed: AtomicBool::new(false),
            tasks: Mutex::new(Tasks::default()),
        };
        (
            Self {
                inner: Arc::new(inner),
            },
            receiver,
        )
    }

    /// Start a task for `request`
    pub fn spawn(&self, request: RemoteRequest) {
        let id = request.id();
        if self.inner.closed.load(Ordering::Acquire) {
            warn!(request = %id, kind = request.kind(), "Workers shut down; dropping request");
            return;
        }

        let token = self.inner.root.child_token();

        // Registry stays locked until the handle is stored so the task cannot
        // forget its token before it was recorded
        let mut tasks = self.inner.tasks();
        tasks.handles.retain(|handle| !handle.is_finished());
        tasks.tokens.insert(id, token.clone());

        debug!(request = %id, kind = request.kind(), "Spawning worker");
        let handle = self
            .inner
            .runtime
            .spawn(run_request(Arc::clone(&self.inner), request, token));
        tasks.handles.push(handle);
    }

    /// Signal one request to stop
    pub fn cancel_request(&self, id: RequestId) {
        if let Some(token) = self.inner.tasks().tokens.remove(&id) {
            debug!(request = %id, "Cancelling request");
            token.cancel();
        }
    }

    /// Number of requests whose tasks have not finished
    pub fn in_flight(&self) -> usize {
        self.inner.tasks().tokens.len()
    }

    /// Cancel every task and wait for them, aborting any still running after `timeout`
    ///
    /// Requests dispatched afterwards are dropped.
    pub async fn shutdown(&self, timeout: Duration) -> ShutdownReport {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.root.cancel();

        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.inner.tasks();
            tasks.tokens.clear();
            tasks.handles.drain(..).collect()
        };

        let deadline = tokio::time::Instant::now() + timeout;
        let mut report = ShutdownReport {
            finished: 0,
            aborted: 0,
        };

        for handle in handles {
            let abort = handle.abort_handle();
            match tokio::time::timeout_at(deadline, handle).await {
                Ok(_) => report.finished += 1,
                Err(_) => {
                    abort.abort();
                    report.aborted += 1;
                }
            }
        }

        if report.aborted > 0 {
            warn!(aborted = report.aborted, "Aborted workers after shutdown timeout");
        }
        info!(finished = report.finished, "Remote workers stopped");
        report
    }
}

impl DownloadDispatcher for RemoteWorkers {
    fn dispatch(&mut self, request: RemoteRequest) {
        self.spawn(request);
    }

    fn cancel(&mut self, id: RequestId) {
        self.cancel_request(id);
    }
}

async fn run_request(inner: Arc<Inner>, request: RemoteRequest, token: CancellationToken) {
    let id = request.id();
    let kind = request.kind();

    let outcome = tokio::select! {
        biased;
        () = token.cancelled() => Err(RemoteError::Cancelled),
        result = execute(&inner, request) => result,
    };

    inner.forget(id);

    let completion = match outcome {
        Ok(completion) => completion,
        Err(RemoteError::Cancelled) => {
            debug!(request = %id, kind, "Worker cancelled");
            RemoteCompletion::Failed {
                id,
                error: RemoteError::Cancelled,
            }
        }
        Err(error) => {
            warn!(request = %id, kind, error = %error, "Worker failed");
            RemoteCompletion::Failed { id, error }
        }
    };

    if inner.completions.send(completion).is_err() {
        debug!(request = %id, "Completion receiver dropped");
    }
}

async fn execute(inner: &Inner, request: RemoteRequest) -> Result<RemoteCompletion> {
    match request {
        RemoteRequest::Search { id, query } => {
            let results = inner
                .downloader
                .search(&query, inner.settings.search_limit)
                .await?;
            debug!(request = %id, count = results.len(), "Search finished");
            Ok(RemoteCompletion::SearchCompleted { id, results })
        }
        RemoteRequest::Download { id, candidate } => download(inner, id, candidate).await,
        RemoteRequest::FetchFirst { id, query } => {
            let first = inner
                .downloader
                .search(&query, 1)
                .await?
                .into_iter()
                .next()
                .ok_or(RemoteError::NoResults(query))?;
            download(inner, id, first).await
        }
    }
}

async fn download(
    inner: &Inner,
    id: RequestId,
    candidate: RemoteCandidate,
) -> Result<RemoteCompletion> {
    let sender = inner.completions.clone();
    let reported = AtomicU8::new(0);
    let progress = |percent: u8| {
        let percent = percent.min(100);
        // Drop repeated and backwards progress
        if reported.fetch_max(percent, Ordering::Relaxed) < percent {
            let _ = sender.send(RemoteCompletion::DownloadProgress { id, percent });
        }
    };

    info!(request = %id, id = %candidate.id, title = %candidate.title, "Downloading");
    let path = inner
        .downloader
        .download(&candidate, &inner.settings.cache_dir, &progress)
        .await?;

    Ok(RemoteCompletion::DownloadCompleted {
        id,
        candidate,
        track: LocalTrack::new(path),
    })
}
