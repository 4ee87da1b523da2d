use std::sync::atomic::{AtomicU64, Ordering};

use log::warn;

use crate::models::holding::{Holding, MarketClass};
use crate::models::valuation::{HoldingValuation, ValuatedHolding};

use super::price_resolver::PriceResolver;

/// Computes current/invested/gain-loss figures for one holding.
///
/// Valuation is infallible by contract: when a price lookup fails, the
/// holding is valued at its purchase price (zero movement for this
/// cycle). The fallback is silent towards aggregate callers but
/// observable — every occurrence is logged and counted.
pub struct ValuationService {
    fallbacks: AtomicU64,
}

impl ValuationService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fallbacks: AtomicU64::new(0),
        }
    }

    /// How many price lookups have fallen back to purchase price since
    /// this service was built.
    #[must_use]
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Valuate one holding.
    ///
    /// Market holdings resolve a live price; manual holdings carry
    /// their own user-maintained values and skip resolution entirely.
    pub async fn valuate(&self, resolver: &PriceResolver, holding: &Holding) -> HoldingValuation {
        match holding {
            Holding::Manual(h) => HoldingValuation::from_values(h.current_value, h.invested_value),
            _ => {
                let row = self.valuate_row(resolver, holding).await;
                HoldingValuation::from_values(row.current_value, row.total_invested)
            }
        }
    }

    /// Valuate one holding into an enriched dashboard row.
    pub async fn valuate_row(
        &self,
        resolver: &PriceResolver,
        holding: &Holding,
    ) -> ValuatedHolding {
        match holding {
            Holding::Equity(h) => {
                self.market_row(
                    resolver,
                    MarketClass::Equity,
                    &h.external_id,
                    &h.symbol,
                    &h.symbol,
                    h.quantity,
                    h.purchase_price,
                )
                .await
            }
            Holding::MutualFund(h) => {
                self.market_row(
                    resolver,
                    MarketClass::MutualFund,
                    &h.external_id,
                    &h.scheme_code,
                    &h.scheme_code,
                    h.quantity,
                    h.purchase_price,
                )
                .await
            }
            Holding::Crypto(h) => {
                self.market_row(
                    resolver,
                    MarketClass::Crypto,
                    &h.external_id,
                    &h.coin_id,
                    &h.symbol,
                    h.quantity,
                    h.purchase_price,
                )
                .await
            }
            Holding::Manual(h) => ValuatedHolding {
                external_id: h.external_id.clone(),
                class_label: h.asset_type.clone(),
                name: h.asset_name.clone(),
                quantity: None,
                current_price: None,
                total_invested: h.invested_value,
                current_value: h.current_value,
                pnl: h.current_value - h.invested_value,
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn market_row(
        &self,
        resolver: &PriceResolver,
        class: MarketClass,
        external_id: &str,
        identifier: &str,
        name: &str,
        quantity: f64,
        purchase_price: f64,
    ) -> ValuatedHolding {
        let price = self
            .unit_price(resolver, class, identifier, purchase_price)
            .await;
        let current_value = quantity * price;
        let total_invested = quantity * purchase_price;

        ValuatedHolding {
            external_id: external_id.to_string(),
            class_label: class.to_string(),
            name: name.to_string(),
            quantity: Some(quantity),
            current_price: Some(price),
            total_invested,
            current_value,
            pnl: current_value - total_invested,
        }
    }

    /// Resolve a unit price, falling back to the purchase price when
    /// the lookup fails for any reason.
    async fn unit_price(
        &self,
        resolver: &PriceResolver,
        class: MarketClass,
        identifier: &str,
        purchase_price: f64,
    ) -> f64 {
        match resolver.resolve(class, identifier).await {
            Ok(quote) => quote.unit_price,
            Err(e) => {
                self.fallbacks.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "Price lookup failed for {identifier} ({class}), valuing at purchase price: {e}"
                );
                purchase_price
            }
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
