//! Suggestion fetcher.
//!
//! Issues provider lookups on spawned tasks and reports each outcome as a
//! `Delivery` message on a channel. The fetcher never touches field state:
//! whoever owns the form decides, by token, whether a delivery still counts.

use crate::field::{FieldId, RequestToken};
use crate::provider::{PlacesProvider, ProviderError, Suggestion};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Outcome of one lookup, addressed to the field and token that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub field_id: FieldId,
    pub token: RequestToken,
    pub outcome: Result<Vec<Suggestion>, ProviderError>,
}

/// Sending half of the delivery channel.
pub type DeliverySender = mpsc::UnboundedSender<Delivery>;

/// Receiving half of the delivery channel.
pub type DeliveryReceiver = mpsc::UnboundedReceiver<Delivery>;

/// Create the channel that connects fetchers to their controller.
pub fn delivery_channel() -> (DeliverySender, DeliveryReceiver) {
    mpsc::unbounded_channel()
}

/// Issues suggestion lookups against a shared provider handle.
///
/// Cheap to clone; clones share the provider and the delivery channel.
#[derive(Clone)]
pub struct SuggestionFetcher {
    provider: Arc<dyn PlacesProvider>,
    deliveries: DeliverySender,
    log_queries: bool,
}

impl SuggestionFetcher {
    pub fn new(provider: Arc<dyn PlacesProvider>, deliveries: DeliverySender) -> Self {
        Self {
            provider,
            deliveries,
            log_queries: false,
        }
    }

    /// Include query text in debug logs.
    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    pub fn provider(&self) -> &Arc<dyn PlacesProvider> {
        &self.provider
    }

    /// Look up suggestions for `query` and deliver the outcome for
    /// `(field_id, token)` once it completes.
    ///
    /// Exactly one provider call is made, or none for a blank query.
    pub fn fetch(&self, field_id: FieldId, query: String, token: RequestToken) -> JoinHandle<()> {
        let fetcher = self.clone();
        tokio::spawn(async move {
            let outcome = fetcher.lookup(&query).await;
            let delivery = Delivery {
                field_id,
                token,
                outcome,
            };
            if fetcher.deliveries.send(delivery).is_err() {
                tracing::debug!(
                    field_id = %field_id,
                    token = %token,
                    "Delivery receiver closed, dropping suggestions"
                );
            }
        })
    }

    /// Query the provider directly. Blank queries short-circuit to an empty
    /// list without a provider call.
    pub async fn lookup(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        if self.log_queries {
            tracing::debug!(provider = self.provider.name(), query, "Requesting suggestions");
        } else {
            tracing::debug!(
                provider = self.provider.name(),
                query_len = query.chars().count(),
                "Requesting suggestions"
            );
        }

        self.provider.place_predictions(query).await
    }
}

impl std::fmt::Debug for SuggestionFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionFetcher")
            .field("provider", &self.provider.name())
            .field("log_queries", &self.log_queries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::TokenCounter;
    use crate::provider::{RouteRequest, RouteResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PlacesProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn place_predictions(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Network("connection refused".to_string()));
            }
            Ok(vec![Suggestion::new("s1", format!("{} Street", query))])
        }

        async fn compute_route(&self, _request: &RouteRequest) -> Result<RouteResult, ProviderError> {
            Err(ProviderError::Configuration("unused".to_string()))
        }
    }

    fn provider(fail: bool) -> Arc<CountingProvider> {
        Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    #[tokio::test]
    async fn test_fetch_delivers_for_field_and_token() {
        let provider = provider(false);
        let (tx, mut rx) = delivery_channel();
        let fetcher = SuggestionFetcher::new(provider.clone(), tx);
        let token = TokenCounter::default().mint();

        fetcher.fetch(FieldId(3), "Main".to_string(), token).await.unwrap();

        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery.field_id, FieldId(3));
        assert_eq!(delivery.token, token);
        assert_eq!(
            delivery.outcome,
            Ok(vec![Suggestion::new("s1", "Main Street")])
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_query_skips_provider() {
        let provider = provider(false);
        let (tx, mut rx) = delivery_channel();
        let fetcher = SuggestionFetcher::new(provider.clone(), tx);
        let token = TokenCounter::default().mint();

        fetcher.fetch(FieldId(1), "   ".to_string(), token).await.unwrap();

        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery.outcome, Ok(vec![]));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_delivered() {
        let provider = provider(true);
        let (tx, mut rx) = delivery_channel();
        let fetcher = SuggestionFetcher::new(provider, tx);
        let token = TokenCounter::default().mint();

        fetcher.fetch(FieldId(1), "Main".to_string(), token).await.unwrap();

        let delivery = rx.recv().await.unwrap();
        assert!(matches!(delivery.outcome, Err(ProviderError::Network(_))));
    }

    #[tokio::test]
    async fn test_lookup_trims_query() {
        let provider = provider(false);
        let (tx, _rx) = delivery_channel();
        let fetcher = SuggestionFetcher::new(provider, tx).with_query_logging(true);

        let suggestions = fetcher.lookup("  Main  ").await.unwrap();
        assert_eq!(suggestions[0].label, "Main Street");
    }

    #[tokio::test]
    async fn test_closed_receiver_does_not_panic() {
        let provider = provider(false);
        let (tx, rx) = delivery_channel();
        drop(rx);
        let fetcher = SuggestionFetcher::new(provider, tx);
        let token = TokenCounter::default().mint();

        assert!(fetcher.fetch(FieldId(1), "Main".to_string(), token).await.is_ok());
    }
}
