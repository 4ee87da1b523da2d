use std::time::Duration;

use crate::errors::CoreError;
use crate::models::holding::MarketClass;
use crate::models::quote::PriceQuote;
use crate::providers::registry::QuoteProviderRegistry;

/// Default per-lookup deadline. One slow provider call must not stall a
/// whole aggregation fan-in.
pub const DEFAULT_RESOLVE_DEADLINE: Duration = Duration::from_secs(10);

/// Resolves a live unit price for one identifier of one market class.
///
/// Each resolution is a single attempt against the class's registered
/// provider — no retries, no caching. Failure (provider error, unknown
/// identifier, deadline exceeded) is a normal, typed outcome; callers
/// decide what to do with it (the valuator falls back to purchase
/// price).
pub struct PriceResolver {
    registry: QuoteProviderRegistry,
    deadline: Duration,
}

impl PriceResolver {
    #[must_use]
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self::with_deadline(registry, DEFAULT_RESOLVE_DEADLINE)
    }

    #[must_use]
    pub fn with_deadline(registry: QuoteProviderRegistry, deadline: Duration) -> Self {
        Self { registry, deadline }
    }

    /// Check whether a provider is registered for a market class.
    #[must_use]
    pub fn has_provider_for(&self, class: MarketClass) -> bool {
        self.registry.provider_for(class).is_some()
    }

    /// Resolve the current price of `identifier` in class `class`.
    ///
    /// Validates that the returned price is finite and non-negative;
    /// a quote failing that check is reported as a provider error.
    pub async fn resolve(
        &self,
        class: MarketClass,
        identifier: &str,
    ) -> Result<PriceQuote, CoreError> {
        let provider = self
            .registry
            .provider_for(class)
            .ok_or_else(|| CoreError::NoProvider(class.to_string()))?;

        let quote = tokio::time::timeout(self.deadline, provider.fetch_quote(identifier))
            .await
            .map_err(|_| CoreError::Timeout {
                identifier: identifier.to_string(),
                millis: self.deadline.as_millis() as u64,
            })??;

        if !quote.unit_price.is_finite() || quote.unit_price < 0.0 {
            return Err(CoreError::Api {
                provider: provider.name().to_string(),
                message: format!(
                    "Invalid price returned for {identifier}: {} (must be finite and non-negative)",
                    quote.unit_price
                ),
            });
        }

        Ok(quote)
    }
}
