use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::MarketClass;
use crate::models::quote::PriceQuote;

use super::traits::QuoteProvider;

/// Yahoo Finance provider for equity quotes.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, indices.
/// - **Data**: latest close of the most recent 1-day candle.
///
/// Uses the `yahoo_finance_api` crate, which wraps Yahoo Finance's
/// public endpoints. Prices come back in the listing currency of the
/// ticker (NSE tickers quote in INR).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn supported_classes(&self) -> Vec<MarketClass> {
        vec![MarketClass::Equity]
    }

    async fn fetch_quote(&self, identifier: &str) -> Result<PriceQuote, CoreError> {
        let resp = self
            .connector
            .get_latest_quotes(identifier, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch latest quote for {identifier}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("No quote data for {identifier}: {e}"),
        })?;

        Ok(PriceQuote::new(identifier, quote.close))
    }
}
