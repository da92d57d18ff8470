//! Calendar-event aggregation pipeline.
//!
//! Listing pages (one per date window) are fetched in order; every event card
//! on a page is followed to its detail page concurrently, and card and detail
//! fields are merged into [`EventRecord`]s:
//!
//! - [`time`]: placeholder-time normalization
//! - [`text`]: HTML fragment to plain text
//! - [`jsonld`]: JSON-LD `Event` metadata extraction
//! - [`detail`] / [`listing`]: page parsing and the card/detail merge
//! - [`pipeline`]: [`CalendarScraper`], the fetch-and-merge driver
//! - [`output`]: the single end-of-run JSON document
//!
//! ```no_run
//! use std::sync::Arc;
//! use almanac_calendar::{CalendarScraper, SiteSelectors};
//! use almanac_http::HttpClient;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new("https://www.du.edu")?;
//! let scraper = CalendarScraper::new(Arc::new(client), SiteSelectors::default(), "https://www.du.edu");
//! let events = scraper
//!     .run(&["https://www.du.edu/calendar?search=&start_date=2025-01-01&end_date=2025-02-01".into()])
//!     .await;
//! println!("{} events", events.len());
//! # Ok(()) }
//! ```

pub mod detail;
pub mod fetch;
pub mod jsonld;
pub mod listing;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod selectors;
pub mod text;
pub mod time;

pub use fetch::PageFetcher;
pub use model::{AggregateOutput, DetailResult, EventCard, EventRecord};
pub use pipeline::CalendarScraper;
pub use selectors::SiteSelectors;
