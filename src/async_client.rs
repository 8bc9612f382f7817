//! Async wrapper around [`DeckPricer`] for use in async runtimes (Tokio, etc.).
//!
//! Runs pricer operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client waits on the network.
//!
//! # Example
//!
//! ```no_run
//! use deck_pricer::{AsyncDeckPricer, FetchConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let pricer = AsyncDeckPricer::builder()
//!         .fetch_config(FetchConfig::new(Some("https://shop.example/catalog.csv"), None))
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let outcome = pricer.fetch_catalog().await.unwrap();
//!     let _quote = pricer
//!         .quote("4 Lightning Bolt".to_string(), outcome.catalog)
//!         .await
//!         .unwrap();
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::error::{PricerError, Result};
use crate::fetch::{FetchConfig, FetchOutcome, HttpFetch};
use crate::models::{Catalog, Preferences, Quote};
use crate::{DeckPricer, DeckPricerBuilder, TypePriceMap};

fn join_error(e: tokio::task::JoinError) -> PricerError {
    PricerError::InvalidArgument(format!("Task join error: {e}"))
}

// ---------------------------------------------------------------------------
// AsyncDeckPricerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncDeckPricer`] instance.
#[derive(Default)]
pub struct AsyncDeckPricerBuilder {
    inner: DeckPricerBuilder,
}

impl AsyncDeckPricerBuilder {
    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.inner = self.inner.preferences(preferences);
        self
    }

    pub fn type_prices(mut self, type_prices: TypePriceMap) -> Self {
        self.inner = self.inner.type_prices(type_prices);
        self
    }

    pub fn fetch_config(mut self, fetch_config: FetchConfig) -> Self {
        self.inner = self.inner.fetch_config(fetch_config);
        self
    }

    pub fn http_client(mut self, http: Arc<dyn HttpFetch>) -> Self {
        self.inner = self.inner.http_client(http);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Build the async pricer.
    ///
    /// Runs on the blocking thread pool, since the default blocking HTTP
    /// client must not be created inside the async runtime.
    pub async fn build(self) -> Result<AsyncDeckPricer> {
        let inner = self.inner;
        tokio::task::spawn_blocking(move || {
            let pricer = inner.build()?;
            Ok(AsyncDeckPricer {
                inner: Arc::new(pricer),
            })
        })
        .await
        .map_err(join_error)?
    }
}

// ---------------------------------------------------------------------------
// AsyncDeckPricer
// ---------------------------------------------------------------------------

/// Async wrapper around [`DeckPricer`].
///
/// The pricer holds only configuration and a `Send + Sync` transport, so it
/// is shared across tasks through an [`Arc`] without locking.
#[derive(Clone)]
pub struct AsyncDeckPricer {
    inner: Arc<DeckPricer>,
}

impl AsyncDeckPricer {
    /// Create a new builder for configuring the async pricer.
    pub fn builder() -> AsyncDeckPricerBuilder {
        AsyncDeckPricerBuilder::default()
    }

    /// Wrap an already-built pricer.
    pub fn new(pricer: DeckPricer) -> Self {
        Self {
            inner: Arc::new(pricer),
        }
    }

    /// Run a sync pricer operation on the blocking thread pool.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use deck_pricer::AsyncDeckPricer;
    /// # async fn example() -> deck_pricer::Result<()> {
    /// let pricer = AsyncDeckPricer::builder().build().await?;
    /// let entries = pricer.run(|p| Ok(p.parse_decklist("4 Lightning Bolt"))).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&DeckPricer) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pricer = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&pricer))
            .await
            .map_err(join_error)?
    }

    /// Fetch the catalog from the configured endpoints asynchronously.
    pub async fn fetch_catalog(&self) -> Result<FetchOutcome> {
        self.run(|p| p.fetch_catalog()).await
    }

    /// Parse, match and price a decklist asynchronously.
    pub async fn quote(&self, deck_text: String, catalog: Catalog) -> Result<Quote> {
        self.run(move |p| Ok(p.quote(&deck_text, &catalog))).await
    }

    /// Release the pricer on the blocking pool.
    ///
    /// Dropping the last handle drops the blocking HTTP client, which must
    /// not happen on an async worker thread.
    pub async fn close(self) -> Result<()> {
        let inner = self.inner;
        tokio::task::spawn_blocking(move || drop(inner))
            .await
            .map_err(join_error)
    }
}
