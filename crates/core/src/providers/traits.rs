use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::MarketClass;
use crate::models::quote::PriceQuote;

/// Trait abstraction for live quote sources.
///
/// Each market-linked asset class has one provider behind this trait
/// (Yahoo Finance for equities, AMFI for fund NAVs, CoinGecko for
/// coins). If an API changes or dies, only that one implementation is
/// replaced; resolution and valuation code is untouched.
///
/// A failed fetch is a normal outcome, surfaced as a typed `CoreError`
/// — implementations must not panic on provider misbehaviour.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which market classes this provider can quote.
    fn supported_classes(&self) -> Vec<MarketClass>;

    /// Fetch the current unit price for a class-appropriate identifier
    /// (ticker symbol, scheme code, or coin id). Single attempt — no
    /// retries, no caching at this layer.
    async fn fetch_quote(&self, identifier: &str) -> Result<PriceQuote, CoreError>;
}
