//! Cursor-following event paginator

use super::types::{Drain, Event, EventPage, PaginationState, StopReason};
use crate::error::Result;
use crate::http::HttpClient;
use crate::types::with_trailing_slash;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// Feed path for the events of one block
pub const BLOCK_EVENTS_PATH: &str = "v1/blocks/{block}/events?limit=200";

/// Feed path for the events of the latest block
pub const LATEST_EVENTS_PATH: &str = "v1/blocks/latest/events?limit=200";

/// Drains the event server's paginated feeds.
///
/// Pages are fetched strictly one after another and events keep the
/// order in which their pages arrived. Deduplication across pages is left
/// to the feed.
#[derive(Debug, Clone)]
pub struct EventPaginator {
    client: HttpClient,
    event_server: Url,
    max_pages: Option<u32>,
}

impl EventPaginator {
    /// Create a paginator for the event server at `event_server`
    pub fn new(client: HttpClient, event_server: &str) -> Result<Self> {
        Ok(Self {
            client,
            event_server: Url::parse(&with_trailing_slash(event_server))?,
            max_pages: None,
        })
    }

    /// Stop a drain after `max_pages` pages
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn max_pages(&self) -> Option<u32> {
        self.max_pages
    }

    /// Feed URL for the events of `block_number`
    pub fn block_events_url(&self, block_number: u64) -> Result<String> {
        let path = BLOCK_EVENTS_PATH.replace("{block}", &block_number.to_string());
        Ok(self.event_server.join(&path)?.to_string())
    }

    /// Feed URL for the events of the latest block
    pub fn latest_events_url(&self) -> Result<String> {
        Ok(self.event_server.join(LATEST_EVENTS_PATH)?.to_string())
    }

    /// All events of `block_number`
    pub async fn fetch_block_events(&self, block_number: u64) -> Result<Vec<Event>> {
        let url = self.block_events_url(block_number)?;
        self.drain::<Event>(&url).await.into_events()
    }

    /// All events of the latest block
    pub async fn fetch_latest_events(&self) -> Result<Vec<Event>> {
        let url = self.latest_events_url()?;
        self.drain::<Event>(&url).await.into_events()
    }

    /// Follow the feed from `start_url` until its cursor runs out.
    ///
    /// Never fails: a page that cannot be fetched or decoded ends the drain
    /// and the events gathered so far are returned with the stop reason.
    pub async fn drain<T: DeserializeOwned>(&self, start_url: &str) -> Drain<T> {
        let mut state = PaginationState::starting_at(start_url);
        let mut events = Vec::new();

        let stop = loop {
            let Some(cursor) = state.cursor.clone() else {
                break StopReason::Exhausted;
            };

            if self.max_pages.is_some_and(|max| state.pages >= max) {
                warn!(pages = state.pages, cursor = %cursor, "event feed page limit reached");
                break StopReason::PageLimit;
            }

            let body = match self.client.get(&cursor).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(pages = state.pages, error = %e, "event page request failed, returning partial result");
                    break StopReason::RequestFailed;
                }
            };

            let page: EventPage<T> = match serde_json::from_slice(&body) {
                Ok(page) => page,
                Err(e) => {
                    warn!(pages = state.pages, error = %e, "event page did not decode");
                    break StopReason::Malformed;
                }
            };

            let next = page.next_cursor();
            let count = page.data.len();
            events.extend(page.data);
            state.advance(count, next);

            debug!(
                page = state.pages,
                events = count,
                total = state.total_fetched,
                "event page fetched"
            );
        };

        Drain {
            events,
            state,
            stop,
            max_pages: self.max_pages,
        }
    }
}
