//! Book subdomain: the aggregate produced by one generation run.
//!
//! - [`page`]: page number, text and image value objects
//! - [`entities`]: the [`Book`](entities::Book) aggregate
//! - [`manifest`]: the persisted `book_data.json` record
//! - [`run`]: the stage machine a generation run moves through

pub mod entities;
pub mod manifest;
pub mod page;
pub mod run;

/// Every book has exactly this many pages.
pub const PAGE_COUNT: usize = 10;
