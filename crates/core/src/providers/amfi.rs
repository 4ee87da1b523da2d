use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::holding::MarketClass;
use crate::models::quote::PriceQuote;

use super::traits::QuoteProvider;

const NAV_ALL_URL: &str = "https://www.amfiindia.com/spages/NAVAll.txt";

/// AMFI provider for Indian mutual-fund NAVs.
///
/// - **Free**: No API key required.
/// - **Source**: the daily `NAVAll.txt` published by AMFI.
/// - **Format**: `;`-separated rows of
///   `Scheme Code;ISIN Payout;ISIN Reinvest;Scheme Name;NAV;Date`,
///   interleaved with fund-house header lines and blanks.
///
/// One fetch downloads the whole file; the requested scheme code is
/// located by a line scan. Parsing lives in [`parse_nav`] so it can be
/// tested without the network.
pub struct AmfiProvider {
    client: Client,
}

impl AmfiProvider {
    #[must_use]
    pub fn new() -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for AmfiProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan an AMFI NAVAll body for a scheme code and parse its NAV.
/// Header lines, blanks, and malformed rows are skipped.
#[must_use]
pub fn parse_nav(body: &str, scheme_code: &str) -> Option<f64> {
    for line in body.lines() {
        let mut fields = line.split(';');
        if fields.next()?.trim() != scheme_code {
            continue;
        }
        // fields: ISIN payout, ISIN reinvest, scheme name, NAV
        let nav = fields.nth(3)?.trim();
        return nav.parse::<f64>().ok();
    }
    None
}

#[async_trait]
impl QuoteProvider for AmfiProvider {
    fn name(&self) -> &str {
        "AMFI"
    }

    fn supported_classes(&self) -> Vec<MarketClass> {
        vec![MarketClass::MutualFund]
    }

    async fn fetch_quote(&self, identifier: &str) -> Result<PriceQuote, CoreError> {
        let body = self
            .client
            .get(NAV_ALL_URL)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| CoreError::Api {
                provider: "AMFI".into(),
                message: format!("NAVAll request failed: {e}"),
            })?
            .text()
            .await?;

        let nav = parse_nav(&body, identifier).ok_or_else(|| CoreError::PriceNotAvailable {
            identifier: identifier.to_string(),
            class: MarketClass::MutualFund.to_string(),
        })?;

        Ok(PriceQuote::new(identifier, nav))
    }
}
