use futures::future::join_all;
use log::warn;

use crate::errors::CoreError;
use crate::models::expense::Expense;
use crate::models::holding::HoldingsSnapshot;
use crate::models::valuation::{safe_percent, NetWorth, PortfolioValue};

use super::price_resolver::PriceResolver;
use super::valuation_service::ValuationService;

/// Reduces the full flattened holdings list to portfolio totals, and
/// composes them with a liabilities figure into the net-worth view.
pub struct NetWorthService;

impl NetWorthService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Total portfolio value across every asset class, manual included.
    /// Same concurrent fan-out as the class summaries, without the
    /// per-class grouping.
    pub async fn portfolio_value(
        &self,
        resolver: &PriceResolver,
        valuator: &ValuationService,
        snapshot: &HoldingsSnapshot,
    ) -> PortfolioValue {
        let holdings = snapshot.flatten();
        let valuations = join_all(holdings.iter().map(|h| valuator.valuate(resolver, h))).await;

        let total_assets: f64 = valuations.iter().map(|v| v.current_value).sum();
        let total_invested: f64 = valuations.iter().map(|v| v.invested_value).sum();
        let return_amount = total_assets - total_invested;

        PortfolioValue {
            total_assets,
            total_invested,
            return_amount,
            return_percent: safe_percent(return_amount, total_invested),
        }
    }

    /// Compose portfolio value with liabilities.
    ///
    /// Holdings are the required input — the caller fails the read when
    /// the repository is down. The expense source is optional: when it
    /// failed, liabilities degrade to zero and the computation still
    /// succeeds. Liabilities are the sum of all recorded expense
    /// amounts.
    pub async fn net_worth(
        &self,
        resolver: &PriceResolver,
        valuator: &ValuationService,
        snapshot: &HoldingsSnapshot,
        expenses: Result<Vec<Expense>, CoreError>,
    ) -> NetWorth {
        let value = self.portfolio_value(resolver, valuator, snapshot).await;

        let total_liabilities = match expenses {
            Ok(expenses) => expenses.iter().map(|e| e.amount).sum(),
            Err(e) => {
                warn!("Expense source unavailable, treating liabilities as 0: {e}");
                0.0
            }
        };

        NetWorth {
            net_worth: value.total_assets - total_liabilities,
            total_assets: value.total_assets,
            total_liabilities,
            change_amount: value.return_amount,
            change_percent: value.return_percent,
        }
    }
}

impl Default for NetWorthService {
    fn default() -> Self {
        Self::new()
    }
}
