//! Sample persistence via DuckDB
//!
//! Every tracked sample becomes one row of `fee_records`: the sample time
//! in epoch milliseconds plus a low/high column pair per chain. A chain
//! missing from a sample is stored as `NULL`, so SQL `AVG` skips it.

mod store;

pub use store::{FeeStore, TABLE_NAME};
