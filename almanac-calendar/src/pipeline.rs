use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, instrument, warn};

use crate::detail::parse_detail;
use crate::fetch::PageFetcher;
use crate::listing::{merge, parse_listing};
use crate::model::{DetailResult, EventRecord};
use crate::selectors::SiteSelectors;

/// Drives listing pages, their detail pages, and the merge for one site.
///
/// Fetch failures are contained per page or per card and only logged;
/// none of the methods here return an error.
pub struct CalendarScraper {
    fetcher: Arc<dyn PageFetcher>,
    selectors: SiteSelectors,
    origin: String,
}

impl CalendarScraper {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        selectors: SiteSelectors,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            selectors,
            origin: origin.into(),
        }
    }

    /// Scrape each listing URL in order and concatenate the results.
    ///
    /// A window is fully fetched and merged before the next one starts.
    /// Events appearing in more than one window are kept every time.
    pub async fn run(&self, listing_urls: &[String]) -> Vec<EventRecord> {
        let mut all = Vec::new();

        for url in listing_urls {
            let events = self.scrape_listing(url).await;
            if events.is_empty() {
                warn!(url = %url, "calendar.window.empty");
            }
            info!(url = %url, count = events.len(), "calendar.window.done");
            all.extend(events);
        }

        info!(
            windows = listing_urls.len(),
            total = all.len(),
            "calendar.run.done"
        );
        all
    }

    /// Fetch one listing page and return its merged records in card order.
    ///
    /// Every card's detail page is requested at once; results are joined
    /// before merging so completion order never affects output order.
    #[instrument(skip(self), fields(cards = tracing::field::Empty))]
    pub async fn scrape_listing(&self, url: &str) -> Vec<EventRecord> {
        info!("calendar.listing.start");

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(err) => {
                error!(url = %url, error = %err, "calendar.listing.fetch_failed");
                return Vec::new();
            }
        };

        let cards = parse_listing(&html, &self.selectors, &self.origin);
        tracing::Span::current().record("cards", cards.len());

        let details = join_all(
            cards
                .iter()
                .map(|card| self.scrape_detail(&card.detail_url)),
        )
        .await;

        cards
            .into_iter()
            .zip(details)
            .map(|(card, detail)| merge(card, detail))
            .collect()
    }

    /// Fetch one detail page; on failure every field comes back empty.
    pub async fn scrape_detail(&self, url: &str) -> DetailResult {
        match self.fetcher.fetch(url).await {
            Ok(html) => parse_detail(&html, &self.selectors),
            Err(err) => {
                error!(url = %url, error = %err, "calendar.detail.fetch_failed");
                DetailResult::default()
            }
        }
    }
}
