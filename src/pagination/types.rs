//! Pagination types
//!
//! Envelope of one feed page and the bookkeeping of a drain.

use crate::error::{Error, Result};
use crate::types::{JsonValue, OptionStringExt};
use serde::Deserialize;

/// An event as the feed returns it; its shape belongs to the caller
pub type Event = JsonValue;

/// One page of the event feed
#[derive(Debug, Clone, Deserialize)]
pub struct EventPage<T = Event> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> EventPage<T> {
    /// Continuation cursor, `None` once the feed is exhausted
    pub fn next_cursor(&self) -> Option<String> {
        self.meta.links.next.clone().none_if_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub links: PageLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
}

/// Tracks one drain while it runs
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// URL of the next page to fetch
    pub cursor: Option<String>,
    /// Pages fetched and decoded so far
    pub pages: u32,
    /// Total events accumulated so far
    pub total_fetched: u64,
}

impl PaginationState {
    /// Start a drain at `url`
    pub fn starting_at(url: impl Into<String>) -> Self {
        Self {
            cursor: Some(url.into()).none_if_empty(),
            ..Default::default()
        }
    }

    /// Record a decoded page and move the cursor
    pub fn advance(&mut self, events: usize, next: Option<String>) {
        self.pages += 1;
        self.total_fetched += events as u64;
        self.cursor = next;
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_none()
    }
}

/// Why a drain stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cursor came back empty
    Exhausted,
    /// A page request ran out of retries
    RequestFailed,
    /// A page body did not decode as a feed page
    Malformed,
    /// The page cap was reached with a cursor still pending
    PageLimit,
}

/// Outcome of a drain: what was collected and why it stopped
#[derive(Debug, Clone)]
pub struct Drain<T = Event> {
    pub events: Vec<T>,
    pub state: PaginationState,
    pub stop: StopReason,
    /// Page cap in force during the drain
    pub max_pages: Option<u32>,
}

impl<T> Drain<T> {
    /// Whether every page up to an empty cursor was collected
    pub fn is_complete(&self) -> bool {
        self.stop == StopReason::Exhausted
    }

    /// Events collected, failing only when the page cap cut the drain short.
    ///
    /// A failed or malformed page truncates the result without an error.
    pub fn into_events(self) -> Result<Vec<T>> {
        match (self.stop, self.max_pages) {
            (StopReason::PageLimit, Some(max_pages)) => Err(Error::PaginationExceeded { max_pages }),
            _ => Ok(self.events),
        }
    }
}
