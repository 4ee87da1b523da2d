use crate::models::holding::MarketClass;

use super::amfi::AmfiProvider;
use super::coingecko::CoinGeckoProvider;
use super::traits::QuoteProvider;
use super::yahoo_finance::YahooFinanceProvider;

/// Registry of available quote providers.
///
/// Routes lookups to the right provider by `MarketClass`. New providers
/// can be registered without touching resolution code.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the default provider per market class.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // AMFI — mutual fund NAVs, no API key needed
        registry.register(Box::new(AmfiProvider::new()));

        // CoinGecko — crypto, no API key needed
        registry.register(Box::new(CoinGeckoProvider::new()));

        // Yahoo Finance — equities, no API key needed
        if let Ok(yahoo) = YahooFinanceProvider::new() {
            registry.register(Box::new(yahoo));
        }

        registry
    }

    /// Register a new quote provider.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// Find the first provider that supports the given market class.
    #[must_use]
    pub fn provider_for(&self, class: MarketClass) -> Option<&dyn QuoteProvider> {
        self.providers
            .iter()
            .find(|p| p.supported_classes().contains(&class))
            .map(|p| p.as_ref())
    }

    /// Names of the providers registered for a given market class.
    #[must_use]
    pub fn provider_names(&self, class: MarketClass) -> Vec<String> {
        self.providers
            .iter()
            .filter(|p| p.supported_classes().contains(&class))
            .map(|p| p.name().to_string())
            .collect()
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
