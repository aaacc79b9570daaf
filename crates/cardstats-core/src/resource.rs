// ── Remote resource binding ──
//
// A RemoteResource fetches one JSON endpoint and publishes
// Idle/Loading/Ready/Failed state through a watch channel. The endpoint
// string is the resource's identity: setting the same endpoint twice is
// a no-op, setting a new one supersedes any fetch still in flight.
//
// Two correctness properties carried by construction:
// - stale-result discard: each fetch captures a generation number and
//   re-checks it before publishing, so a slow superseded response can
//   never overwrite a newer one;
// - unmount safety: the fetch task holds only a Weak reference to the
//   state, so dropping the resource makes any pending completion a no-op.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::debug;

use cardstats_api::{Error, ErrorKind, StatsClient};

/// View-facing description of a failed fetch: one human-readable message
/// plus a machine-checkable kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for FetchFailure {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// State of a remote resource. Exactly one variant holds at a time;
/// within one fetch the transitions are monotonic
/// (`Idle → Loading → Ready | Failed`).
#[derive(Debug, Default)]
pub enum ResourceState<T> {
    #[default]
    Idle,
    Loading,
    Ready(Arc<T>),
    Failed(FetchFailure),
}

// Manual impl: the payload sits behind an Arc, so cloning the state
// never needs `T: Clone`.
impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Ready(data) => Self::Ready(Arc::clone(data)),
            Self::Failed(failure) => Self::Failed(failure.clone()),
        }
    }
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The payload, if ready.
    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// The failure message, if failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(failure) => Some(&failure.message),
            _ => None,
        }
    }
}

struct Inner<T> {
    state: watch::Sender<ResourceState<T>>,
    generation: AtomicU64,
    endpoint: Mutex<Option<String>>,
}

/// Stateful binding of one endpoint to its fetched payload.
///
/// Owned by exactly one view; the resolver-style shared caching lives
/// elsewhere. Cheap accessors read the current state; `subscribe` yields
/// a watch receiver for push-style consumers.
pub struct RemoteResource<T> {
    client: StatsClient,
    inner: Arc<Inner<T>>,
}

impl<T> RemoteResource<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(client: StatsClient) -> Self {
        let (state, _) = watch::channel(ResourceState::Idle);
        Self {
            client,
            inner: Arc::new(Inner {
                state,
                generation: AtomicU64::new(0),
                endpoint: Mutex::new(None),
            }),
        }
    }

    /// Bind to an endpoint, fetching it. A no-op if the endpoint is
    /// unchanged — identity is the endpoint string.
    pub fn set_endpoint(&self, endpoint: &str) {
        {
            let mut current = self
                .inner
                .endpoint
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if current.as_deref() == Some(endpoint) {
                return;
            }
            *current = Some(endpoint.to_owned());
        }
        self.spawn_fetch(endpoint.to_owned());
    }

    /// Refetch the current endpoint, superseding any fetch in flight.
    pub fn reload(&self) {
        let endpoint = self
            .inner
            .endpoint
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(endpoint) = endpoint {
            self.spawn_fetch(endpoint);
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ResourceState<T> {
        self.inner.state.borrow().clone()
    }

    /// Watch receiver for state changes.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.inner.state.subscribe()
    }

    /// The bound endpoint, if any.
    pub fn endpoint(&self) -> Option<String> {
        self.inner
            .endpoint
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn spawn_fetch(&self, endpoint: String) {
        // Claim a generation BEFORE publishing Loading so a concurrent
        // newer fetch can never be overwritten by this one.
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_replace(ResourceState::Loading);

        let client = self.client.clone();
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let result = client.get_json::<T>(&endpoint).await;

            let Some(inner) = weak.upgrade() else {
                debug!(%endpoint, "resource dropped before fetch completed");
                return;
            };
            if inner.generation.load(Ordering::SeqCst) != generation {
                debug!(%endpoint, "discarding stale fetch result");
                return;
            }

            let next = match result {
                Ok(data) => ResourceState::Ready(Arc::new(data)),
                Err(ref e) => {
                    debug!(%endpoint, error = %e, "fetch failed");
                    ResourceState::Failed(FetchFailure::from(e))
                }
            };
            inner.state.send_replace(next);
        });
    }
}
