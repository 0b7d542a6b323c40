//! Thumbnail loading.
//!
//! The renderer asks an [`ImageLoader`] for each row's thumbnail and gets the
//! current [`ThumbState`] back immediately.  [`ThumbnailCache`] is the real
//! implementation: the first request for a URI starts a download + decode on
//! the worker lane, later requests read the stored outcome.
//!
//! A terminal can't show the picture itself, so a decoded thumbnail is
//! reduced to its dimensions for the row's image marker.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use image::GenericImageView;
use tokio::runtime::Handle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbState {
    Loading,
    Ready { width: u32, height: u32 },
    Failed,
}

/// Something the renderer can hand thumbnail URIs to.
pub trait ImageLoader {
    /// Start (or look up) the load for `uri` and report where it stands.
    fn request(&self, uri: &str) -> ThumbState;
}

/// Downloads raw image bytes.  Runs on the worker lane.
pub trait ImageFetch: Send + Sync {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>>;
}

pub struct HttpImageFetch {
    client: reqwest::blocking::Client,
}

impl HttpImageFetch {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

impl ImageFetch for HttpImageFetch {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        let bytes = self.client.get(uri).send()?.error_for_status()?.bytes()?;
        Ok(bytes.to_vec())
    }
}

type States = Arc<Mutex<HashMap<String, ThumbState>>>;

pub struct ThumbnailCache {
    states: States,
    /// Bumped by [`clear`](Self::clear); loads started under an older epoch
    /// drop their result.
    epoch: Arc<AtomicU64>,
    fetcher: Arc<dyn ImageFetch>,
    runtime: Handle,
}

impl ThumbnailCache {
    pub fn new(fetcher: Arc<dyn ImageFetch>, runtime: Handle) -> Self {
        Self {
            states: Arc::new(Mutex::new(HashMap::new())),
            epoch: Arc::new(AtomicU64::new(0)),
            fetcher,
            runtime,
        }
    }

    /// Forget every thumbnail and ignore loads still in flight.
    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        lock(&self.states).clear();
    }

    pub fn state(&self, uri: &str) -> Option<ThumbState> {
        lock(&self.states).get(uri).copied()
    }
}

impl ImageLoader for ThumbnailCache {
    fn request(&self, uri: &str) -> ThumbState {
        {
            let mut states = lock(&self.states);
            if let Some(state) = states.get(uri) {
                return *state;
            }
            states.insert(uri.to_string(), ThumbState::Loading);
        }

        let pending = PendingLoad::new(uri, &self.states, &self.epoch);
        let fetcher = Arc::clone(&self.fetcher);

        self.runtime.spawn_blocking(move || {
            let state = match load_dimensions(fetcher.as_ref(), &pending.uri) {
                Ok((width, height)) => ThumbState::Ready { width, height },
                Err(e) => {
                    warn!(uri = %pending.uri, error = %e, "thumbnail load failed");
                    ThumbState::Failed
                }
            };
            pending.finish(state);
        });

        ThumbState::Loading
    }
}

/// The outcome slot of one spawned load.
///
/// If it is dropped before [`finish`](Self::finish) runs (the load panicked,
/// or the runtime shut down before running it) it records
/// [`ThumbState::Failed`], so the URI never stays `Loading`.  Either way the
/// outcome is discarded once the cache has been cleared since the load began.
struct PendingLoad {
    uri: String,
    states: States,
    epoch: Arc<AtomicU64>,
    started: u64,
    finished: bool,
}

impl PendingLoad {
    fn new(uri: &str, states: &States, epoch: &Arc<AtomicU64>) -> Self {
        Self {
            uri: uri.to_string(),
            states: Arc::clone(states),
            epoch: Arc::clone(epoch),
            started: epoch.load(Ordering::SeqCst),
            finished: false,
        }
    }

    fn finish(mut self, state: ThumbState) {
        self.finished = true;
        self.store(state);
    }

    fn store(&self, state: ThumbState) {
        let mut states = lock(&self.states);
        if self.epoch.load(Ordering::SeqCst) != self.started {
            debug!(uri = %self.uri, "dropping thumbnail for replaced list");
            return;
        }
        states.insert(self.uri.clone(), state);
    }
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        if !self.finished {
            warn!(uri = %self.uri, "thumbnail load abandoned");
            self.store(ThumbState::Failed);
        }
    }
}

fn load_dimensions(fetcher: &dyn ImageFetch, uri: &str) -> Result<(u32, u32)> {
    let bytes = fetcher.fetch(uri)?;
    let decoded = image::load_from_memory(&bytes).context("decoding thumbnail")?;
    Ok(decoded.dimensions())
}

fn lock(states: &States) -> MutexGuard<'_, HashMap<String, ThumbState>> {
    states.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
