use futures::future::join_all;

use crate::models::holding::{Holding, HoldingsSnapshot, ManualHolding};
use crate::models::valuation::{
    safe_percent, AssetClassSummary, HoldingValuation, PortfolioDashboard,
};

use super::price_resolver::PriceResolver;
use super::valuation_service::ValuationService;

/// Fans the valuator out over a snapshot's holdings and reduces the
/// results into per-class summaries and dashboard rows.
///
/// The fan-out is concurrent per class; the fan-in is a plain join —
/// it cannot fail, because per-item price failures are already
/// absorbed by the valuator's fallback.
pub struct SummaryService;

impl SummaryService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Summarize every asset class present in the snapshot.
    ///
    /// Classes with zero holdings are omitted entirely — callers get no
    /// zero-value placeholder rows. Manual holdings are grouped by
    /// their declared asset type, each distinct type producing its own
    /// summary with its own icon (unknown types get a generic one, they
    /// are never dropped).
    pub async fn class_summaries(
        &self,
        resolver: &PriceResolver,
        valuator: &ValuationService,
        snapshot: &HoldingsSnapshot,
    ) -> Vec<AssetClassSummary> {
        let mut summaries = Vec::new();

        if !snapshot.equities.is_empty() {
            let holdings: Vec<Holding> =
                snapshot.equities.iter().cloned().map(Holding::Equity).collect();
            summaries.push(
                self.summarize("Stocks", "show_chart", resolver, valuator, &holdings)
                    .await,
            );
        }

        if !snapshot.cryptos.is_empty() {
            let holdings: Vec<Holding> =
                snapshot.cryptos.iter().cloned().map(Holding::Crypto).collect();
            summaries.push(
                self.summarize("Crypto", "currency_bitcoin", resolver, valuator, &holdings)
                    .await,
            );
        }

        if !snapshot.mutual_funds.is_empty() {
            let holdings: Vec<Holding> =
                snapshot.mutual_funds.iter().cloned().map(Holding::MutualFund).collect();
            summaries.push(
                self.summarize("Mutual Funds", "pie_chart", resolver, valuator, &holdings)
                    .await,
            );
        }

        for (asset_type, group) in group_manuals(&snapshot.manuals) {
            let holdings: Vec<Holding> = group.into_iter().cloned().map(Holding::Manual).collect();
            summaries.push(
                self.summarize(&asset_type, manual_icon(&asset_type), resolver, valuator, &holdings)
                    .await,
            );
        }

        summaries
    }

    /// Valuate every holding and reduce the rows into a dashboard view.
    pub async fn dashboard(
        &self,
        resolver: &PriceResolver,
        valuator: &ValuationService,
        snapshot: &HoldingsSnapshot,
    ) -> PortfolioDashboard {
        let holdings = snapshot.flatten();
        let assets = join_all(
            holdings
                .iter()
                .map(|h| valuator.valuate_row(resolver, h)),
        )
        .await;

        let total_invested: f64 = assets.iter().map(|a| a.total_invested).sum();
        let total_current_value: f64 = assets.iter().map(|a| a.current_value).sum();

        PortfolioDashboard {
            assets,
            total_invested,
            total_current_value,
            total_pnl: total_current_value - total_invested,
        }
    }

    /// Fan out over one class's holdings, then reduce by summation.
    async fn summarize(
        &self,
        class_label: &str,
        icon: &str,
        resolver: &PriceResolver,
        valuator: &ValuationService,
        holdings: &[Holding],
    ) -> AssetClassSummary {
        let valuations: Vec<HoldingValuation> =
            join_all(holdings.iter().map(|h| valuator.valuate(resolver, h))).await;

        let total_value: f64 = valuations.iter().map(|v| v.current_value).sum();
        let total_invested: f64 = valuations.iter().map(|v| v.invested_value).sum();
        let gain_loss = total_value - total_invested;

        AssetClassSummary {
            class_label: class_label.to_string(),
            icon: icon.to_string(),
            total_value,
            total_invested,
            gain_loss,
            gain_loss_percent: safe_percent(gain_loss, total_invested),
            holding_count: holdings.len(),
        }
    }
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new()
    }
}

/// Group manual holdings by asset type, preserving first-seen order.
fn group_manuals(manuals: &[ManualHolding]) -> Vec<(String, Vec<&ManualHolding>)> {
    let mut groups: Vec<(String, Vec<&ManualHolding>)> = Vec::new();
    for manual in manuals {
        match groups.iter_mut().find(|(t, _)| *t == manual.asset_type) {
            Some((_, group)) => group.push(manual),
            None => groups.push((manual.asset_type.clone(), vec![manual])),
        }
    }
    groups
}

/// Icon for a manual asset type. Unrecognized types fall back to the
/// generic institution icon rather than being dropped.
fn manual_icon(asset_type: &str) -> &'static str {
    match asset_type {
        "Gold" | "Silver" => "diamond",
        "Real Estate" => "home",
        "NPS" => "savings",
        "Bond" | "Bonds" => "account_balance",
        _ => "account_balance",
    }
}
