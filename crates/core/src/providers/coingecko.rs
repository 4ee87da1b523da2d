use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::holding::MarketClass;
use crate::models::quote::PriceQuote;

use super::traits::QuoteProvider;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko provider for cryptocurrency prices.
///
/// - **Free**: No API key required on the public tier.
/// - **Data**: current USD price via `/simple/price`.
///
/// CoinGecko is keyed by lowercase coin ids ("bitcoin", "ethereum") —
/// exactly what crypto holdings carry as their identifier, so no
/// symbol-to-id mapping is needed here.
pub struct CoinGeckoProvider {
    client: Client,
}

impl CoinGeckoProvider {
    #[must_use]
    pub fn new() -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── CoinGecko API response types ────────────────────────────────────

#[derive(Deserialize)]
struct CoinPrice {
    usd: Option<f64>,
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    fn supported_classes(&self) -> Vec<MarketClass> {
        vec![MarketClass::Crypto]
    }

    async fn fetch_quote(&self, identifier: &str) -> Result<PriceQuote, CoreError> {
        let id = identifier.to_lowercase();
        let url = format!("{BASE_URL}/simple/price?ids={id}&vs_currencies=usd");

        let resp: HashMap<String, CoinPrice> = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "CoinGecko".into(),
                message: format!("Failed to parse response for {id}: {e}"),
            })?;

        let price = resp
            .get(&id)
            .and_then(|p| p.usd)
            .ok_or_else(|| CoreError::PriceNotAvailable {
                identifier: identifier.to_string(),
                class: MarketClass::Crypto.to_string(),
            })?;

        Ok(PriceQuote::new(identifier, price))
    }
}
