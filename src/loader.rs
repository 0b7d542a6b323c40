//! Background content loading.
//!
//! Each [`Loader::request`] runs one fetch on the worker lane (the tokio
//! blocking pool) and sends the outcome to the UI thread over an [`mpsc`]
//! channel.  Requests are numbered; starting a new one cancels the previous
//! request's token, so a slow fetch for a category the user already left
//! never overwrites the list.
//!
//! ## For contributors
//!
//! Cancellation only suppresses delivery.  The HTTP request itself runs to
//! completion on its worker thread.  There is exactly one attempt per
//! request; pressing `r` issues a fresh one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::source::{NewsItem, NewsSource, Query};

/// Messages sent from the worker lane to the UI thread.
#[derive(Debug)]
pub enum LoadMsg {
    /// The request numbered `generation` produced these items.
    Loaded {
        generation: u64,
        items: Vec<NewsItem>,
    },
    /// The request numbered `generation` failed with this description.
    Failed { generation: u64, error: String },
}

impl LoadMsg {
    pub fn generation(&self) -> u64 {
        match self {
            LoadMsg::Loaded { generation, .. } | LoadMsg::Failed { generation, .. } => *generation,
        }
    }
}

/// Shared flag set when a request is superseded.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Loader {
    source: Arc<dyn NewsSource>,
    runtime: Handle,
    tx: mpsc::Sender<LoadMsg>,
    generation: u64,
    in_flight: Option<CancelToken>,
}

impl Loader {
    /// Create a loader.  The receiver should be drained on every UI tick.
    pub fn new(source: Arc<dyn NewsSource>, runtime: Handle) -> (Self, mpsc::Receiver<LoadMsg>) {
        let (tx, rx) = mpsc::channel();
        let loader = Self {
            source,
            runtime,
            tx,
            generation: 0,
            in_flight: None,
        };
        (loader, rx)
    }

    /// Start loading `query`, superseding any request still in flight.
    ///
    /// `None` resolves immediately to an empty list without touching the
    /// source.  Returns the generation the result will carry.
    pub fn request(&mut self, query: Option<Query>) -> u64 {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation += 1;
        let generation = self.generation;

        let Some(query) = query else {
            debug!(generation, "empty query, nothing to fetch");
            let _ = self.tx.send(LoadMsg::Loaded {
                generation,
                items: Vec::new(),
            });
            return generation;
        };

        let token = CancelToken::default();
        self.in_flight = Some(token.clone());

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        info!(generation, source = source.name(), "loading {query}");

        self.runtime.spawn_blocking(move || {
            let msg = match source.fetch(&query) {
                Ok(items) => {
                    info!(generation, count = items.len(), "load finished");
                    LoadMsg::Loaded { generation, items }
                }
                Err(e) => {
                    warn!(generation, error = %e, "load failed");
                    LoadMsg::Failed {
                        generation,
                        error: format!("{}: {e}", source.name()),
                    }
                }
            };
            if token.is_cancelled() {
                debug!(generation, "request superseded, dropping result");
                return;
            }
            // If the receiver is gone the UI has exited; nothing to do.
            let _ = tx.send(msg);
        });

        generation
    }

    /// Cancel the request in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
