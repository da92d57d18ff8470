use almanac_http::{HttpClient, HttpError, RequestOpts};
use async_trait::async_trait;

/// Fetch capability used by the pipeline: URL in, page body out.
///
/// Failures are returned, never panicked, so the caller can degrade the
/// affected page or card and keep going.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, HttpError>;
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, HttpError> {
        self.get_text(
            url,
            RequestOpts {
                allow_absolute: true,
                ..Default::default()
            },
        )
        .await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory fetcher; unknown URLs fail like a refused connection.
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        delays: HashMap<String, Duration>,
        pub requested: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        pub max_in_flight: AtomicUsize,
    }

    impl StaticFetcher {
        pub fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn delayed(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(url.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, HttpError> {
            self.requested.lock().unwrap().push(url.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = self
                .delays
                .get(url)
                .copied()
                .unwrap_or(Duration::from_millis(1));
            tokio::time::sleep(delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| HttpError::Network(format!("connection refused: {url}")))
        }
    }
}
