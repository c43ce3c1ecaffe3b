//! Pagination module
//!
//! Drains an event feed whose pages embed the URL of the next page:
//!
//! ```json
//! { "data": [ ... ], "meta": { "links": { "next": "https://..." } } }
//! ```
//!
//! The paginator follows `meta.links.next` until it is empty, a page
//! request exhausts its retry budget, or the optional page cap is hit.

mod paginator;
mod types;

pub use paginator::{EventPaginator, BLOCK_EVENTS_PATH, LATEST_EVENTS_PATH};
pub use types::{Drain, Event, EventPage, PageLinks, PageMeta, PaginationState, StopReason};
