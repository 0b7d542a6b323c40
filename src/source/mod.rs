//! Fetch collaborators.
//!
//! This module defines the [`NewsSource`] trait, the [`Query`] descriptor it
//! consumes, and the common [`NewsItem`] type.  Concrete sources live in
//! sub-modules (currently only [`guardian`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `newsapi.rs`).
//! 2. Define a struct and implement [`NewsSource`] for it.
//! 3. Add `mod newsapi;` below and re-export your struct.
//! 4. Construct it in `main.rs` instead of (or beside) `GuardianSource`.
//!
//! The loader, renderer, and shell never look past the trait.

mod guardian;
mod news_item;
mod query;

pub use guardian::GuardianSource;
pub use news_item::NewsItem;
pub use query::Query;

use anyhow::Result;

/// Anything that turns a [`Query`] into an ordered list of articles.
///
/// [`fetch()`](NewsSource::fetch) runs on the worker lane, so
/// implementations must be [`Send`] + [`Sync`] and may block.
pub trait NewsSource: Send + Sync {
    /// Label used in log lines and the status bar.
    fn name(&self) -> &str;

    /// Fetch one page of articles for `query`.
    ///
    /// Errors are reported to the UI as a status message; the list is left
    /// in its empty state.
    fn fetch(&self, query: &Query) -> Result<Vec<NewsItem>>;
}
