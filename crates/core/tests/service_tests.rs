// ═══════════════════════════════════════════════════════════════════
// Service Tests — ValuationService, SummaryService, NetWorthService
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use vault_core::errors::CoreError;
use vault_core::models::expense::Expense;
use vault_core::models::holding::{
    CryptoHolding, EquityHolding, Holding, HoldingsSnapshot, ManualHolding, MarketClass,
    MutualFundHolding,
};
use vault_core::providers::registry::QuoteProviderRegistry;
use vault_core::providers::traits::QuoteProvider;
use vault_core::models::quote::PriceQuote;
use vault_core::services::networth_service::NetWorthService;
use vault_core::services::price_resolver::PriceResolver;
use vault_core::services::summary_service::SummaryService;
use vault_core::services::valuation_service::ValuationService;

// ═══════════════════════════════════════════════════════════════════
// Mock provider
// ═══════════════════════════════════════════════════════════════════

/// Serves prices from a fixed table; unknown identifiers fail, which
/// is exactly what drives the valuator's fallback path.
struct TableProvider {
    prices: HashMap<String, f64>,
}

impl TableProvider {
    fn with_defaults() -> Self {
        let mut prices = HashMap::new();
        prices.insert("RELIANCE".to_string(), 2450.0);
        prices.insert("TATASTEEL".to_string(), 125.0);
        prices.insert("120503".to_string(), 52.5);
        prices.insert("bitcoin".to_string(), 5_950_000.0);
        Self { prices }
    }
}

#[async_trait]
impl QuoteProvider for TableProvider {
    fn name(&self) -> &str {
        "Table"
    }

    fn supported_classes(&self) -> Vec<MarketClass> {
        vec![MarketClass::Equity, MarketClass::MutualFund, MarketClass::Crypto]
    }

    async fn fetch_quote(&self, identifier: &str) -> Result<PriceQuote, CoreError> {
        self.prices
            .get(identifier)
            .map(|price| PriceQuote::new(identifier, *price))
            .ok_or_else(|| CoreError::PriceNotAvailable {
                identifier: identifier.to_string(),
                class: "test".to_string(),
            })
    }
}

fn table_resolver() -> PriceResolver {
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(TableProvider::with_defaults()));
    PriceResolver::new(registry)
}

/// A resolver whose provider rejects everything.
fn failing_resolver() -> PriceResolver {
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(TableProvider {
        prices: HashMap::new(),
    }));
    PriceResolver::new(registry)
}

// ═══════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════

fn equity(symbol: &str, quantity: f64, purchase_price: f64) -> EquityHolding {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    EquityHolding {
        id: 1,
        external_id: format!("stk_{symbol}"),
        user_id: "user_1".into(),
        symbol: symbol.into(),
        exchange: "NSE".into(),
        quantity,
        purchase_price,
        purchase_date: now,
        created_at: now,
        updated_at: now,
    }
}

fn fund(scheme_code: &str, quantity: f64, purchase_price: f64) -> MutualFundHolding {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    MutualFundHolding {
        id: 2,
        external_id: format!("mf_{scheme_code}"),
        user_id: "user_1".into(),
        scheme_code: scheme_code.into(),
        quantity,
        purchase_price,
        purchase_date: now,
        created_at: now,
        updated_at: now,
    }
}

fn crypto(coin_id: &str, symbol: &str, quantity: f64, purchase_price: f64) -> CryptoHolding {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    CryptoHolding {
        id: 3,
        external_id: format!("cry_{coin_id}"),
        user_id: "user_1".into(),
        coin_id: coin_id.into(),
        symbol: symbol.into(),
        quantity,
        purchase_price,
        purchase_date: now,
        created_at: now,
        updated_at: now,
    }
}

fn manual(asset_name: &str, asset_type: &str, invested: f64, current: f64) -> ManualHolding {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    ManualHolding {
        id: 4,
        external_id: format!("man_{asset_name}"),
        user_id: "user_1".into(),
        asset_name: asset_name.into(),
        asset_type: asset_type.into(),
        invested_value: invested,
        current_value: current,
        purchase_date: now,
        maturity_date: None,
        created_at: now,
        updated_at: now,
    }
}

fn expense(amount: f64) -> Expense {
    Expense {
        id: format!("exp_{amount}"),
        date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        category: "Bills".into(),
        amount,
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ═══════════════════════════════════════════════════════════════════
// Holding valuator
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn valuates_equity_with_live_price() {
    // RELIANCE: 50 × 2400 invested, resolver quotes 2450
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let holding = Holding::Equity(equity("RELIANCE", 50.0, 2400.0));

    let v = valuator.valuate(&resolver, &holding).await;
    assert!(approx_eq(v.current_value, 122_500.0));
    assert!(approx_eq(v.invested_value, 120_000.0));
    assert!(approx_eq(v.gain_loss, 2_500.0));
    assert!((v.gain_loss_percent - 2.0833).abs() < 0.001);
    assert_eq!(valuator.fallback_count(), 0);
}

#[tokio::test]
async fn failed_lookup_falls_back_to_purchase_price() {
    let resolver = failing_resolver();
    let valuator = ValuationService::new();
    let holding = Holding::Equity(equity("RELIANCE", 50.0, 2400.0));

    let v = valuator.valuate(&resolver, &holding).await;
    assert!(approx_eq(v.current_value, 120_000.0));
    assert!(approx_eq(v.current_value, v.invested_value));
    assert!(approx_eq(v.gain_loss, 0.0));
    assert!(approx_eq(v.gain_loss_percent, 0.0));
    assert_eq!(valuator.fallback_count(), 1);
}

#[tokio::test]
async fn fallback_counter_accumulates_per_failure() {
    let resolver = failing_resolver();
    let valuator = ValuationService::new();

    for symbol in ["RELIANCE", "TATASTEEL", "INFY"] {
        let holding = Holding::Equity(equity(symbol, 1.0, 100.0));
        valuator.valuate(&resolver, &holding).await;
    }
    assert_eq!(valuator.fallback_count(), 3);
}

#[tokio::test]
async fn manual_holding_skips_price_resolution() {
    // A failing resolver must not matter: manual values are user-kept
    let resolver = failing_resolver();
    let valuator = ValuationService::new();
    let holding = Holding::Manual(manual("Gold Bond", "Gold", 50_000.0, 58_000.0));

    let v = valuator.valuate(&resolver, &holding).await;
    assert!(approx_eq(v.current_value, 58_000.0));
    assert!(approx_eq(v.invested_value, 50_000.0));
    assert!(approx_eq(v.gain_loss, 8_000.0));
    assert_eq!(valuator.fallback_count(), 0);
}

#[tokio::test]
async fn zero_invested_yields_zero_percent() {
    let resolver = failing_resolver();
    let valuator = ValuationService::new();
    let holding = Holding::Equity(equity("FREEBIE", 10.0, 0.0));

    let v = valuator.valuate(&resolver, &holding).await;
    assert!(approx_eq(v.invested_value, 0.0));
    assert!(approx_eq(v.gain_loss_percent, 0.0));
}

#[tokio::test]
async fn dashboard_row_carries_price_and_pnl() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();

    let row = valuator
        .valuate_row(&resolver, &Holding::Equity(equity("RELIANCE", 50.0, 2400.0)))
        .await;
    assert_eq!(row.external_id, "stk_RELIANCE");
    assert_eq!(row.class_label, "Equity");
    assert_eq!(row.quantity, Some(50.0));
    assert_eq!(row.current_price, Some(2450.0));
    assert!(approx_eq(row.pnl, 2_500.0));

    let manual_row = valuator
        .valuate_row(
            &resolver,
            &Holding::Manual(manual("Gold Bond", "Gold", 50_000.0, 58_000.0)),
        )
        .await;
    assert_eq!(manual_row.class_label, "Gold");
    assert_eq!(manual_row.quantity, None);
    assert_eq!(manual_row.current_price, None);
    assert!(approx_eq(manual_row.pnl, 8_000.0));
}

// ═══════════════════════════════════════════════════════════════════
// Asset-class aggregator
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn summaries_omit_empty_classes() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = SummaryService::new();

    let snapshot = HoldingsSnapshot {
        equities: vec![equity("RELIANCE", 50.0, 2400.0)],
        ..Default::default()
    };

    let summaries = service.class_summaries(&resolver, &valuator, &snapshot).await;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].class_label, "Stocks");
    assert_eq!(summaries[0].icon, "show_chart");
}

#[tokio::test]
async fn empty_snapshot_has_no_summaries() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = SummaryService::new();

    let summaries = service
        .class_summaries(&resolver, &valuator, &HoldingsSnapshot::default())
        .await;
    assert!(summaries.is_empty());
}

#[tokio::test]
async fn summary_reduces_class_by_summation() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = SummaryService::new();

    let snapshot = HoldingsSnapshot {
        equities: vec![
            equity("RELIANCE", 50.0, 2400.0),  // 122_500 current, 120_000 invested
            equity("TATASTEEL", 100.0, 110.0), // 12_500 current, 11_000 invested
        ],
        ..Default::default()
    };

    let summaries = service.class_summaries(&resolver, &valuator, &snapshot).await;
    assert_eq!(summaries.len(), 1);
    let stocks = &summaries[0];
    assert!(approx_eq(stocks.total_value, 135_000.0));
    assert!(approx_eq(stocks.total_invested, 131_000.0));
    assert!(approx_eq(stocks.gain_loss, 4_000.0));
    assert_eq!(stocks.holding_count, 2);
}

#[tokio::test]
async fn manual_holdings_group_by_asset_type() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = SummaryService::new();

    let snapshot = HoldingsSnapshot {
        manuals: vec![
            manual("Gold Bond A", "Gold", 50_000.0, 58_000.0),
            manual("Gold Bond B", "Gold", 20_000.0, 21_000.0),
            manual("2BHK Flat", "Real Estate", 1_800_000.0, 1_850_400.0),
            manual("Old Timer", "Vintage Cars", 300_000.0, 320_000.0),
        ],
        ..Default::default()
    };

    let summaries = service.class_summaries(&resolver, &valuator, &snapshot).await;
    assert_eq!(summaries.len(), 3);

    let gold = &summaries[0];
    assert_eq!(gold.class_label, "Gold");
    assert_eq!(gold.icon, "diamond");
    assert!(approx_eq(gold.total_value, 79_000.0));
    assert!(approx_eq(gold.total_invested, 70_000.0));
    assert_eq!(gold.holding_count, 2);

    let estate = &summaries[1];
    assert_eq!(estate.class_label, "Real Estate");
    assert_eq!(estate.icon, "home");

    // Unrecognized type still gets a summary with the generic icon
    let unknown = &summaries[2];
    assert_eq!(unknown.class_label, "Vintage Cars");
    assert_eq!(unknown.icon, "account_balance");
}

#[tokio::test]
async fn summary_class_labels_and_icons() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = SummaryService::new();

    let snapshot = HoldingsSnapshot {
        equities: vec![equity("RELIANCE", 1.0, 2400.0)],
        mutual_funds: vec![fund("120503", 100.0, 45.2)],
        cryptos: vec![crypto("bitcoin", "BTC", 0.1, 3_500_000.0)],
        manuals: vec![],
    };

    let summaries = service.class_summaries(&resolver, &valuator, &snapshot).await;
    let labels: Vec<(&str, &str)> = summaries
        .iter()
        .map(|s| (s.class_label.as_str(), s.icon.as_str()))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("Stocks", "show_chart"),
            ("Crypto", "currency_bitcoin"),
            ("Mutual Funds", "pie_chart"),
        ]
    );
}

// ═══════════════════════════════════════════════════════════════════
// Net worth calculator
// ═══════════════════════════════════════════════════════════════════

fn full_snapshot() -> HoldingsSnapshot {
    HoldingsSnapshot {
        equities: vec![
            equity("RELIANCE", 50.0, 2400.0),
            equity("TATASTEEL", 100.0, 110.0),
        ],
        mutual_funds: vec![fund("120503", 1500.5, 45.2)],
        cryptos: vec![crypto("bitcoin", "BTC", 0.045, 3_500_000.0)],
        manuals: vec![manual("Gold Bond", "Bond", 50_000.0, 58_000.0)],
    }
}

#[tokio::test]
async fn portfolio_value_reduces_flattened_list() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = NetWorthService::new();

    let value = service
        .portfolio_value(&resolver, &valuator, &full_snapshot())
        .await;

    // 122_500 + 12_500 + 1500.5×52.5 + 0.045×5_950_000 + 58_000
    let expected_assets = 122_500.0 + 12_500.0 + 78_776.25 + 267_750.0 + 58_000.0;
    let expected_invested = 120_000.0 + 11_000.0 + 67_822.6 + 157_500.0 + 50_000.0;
    assert!(approx_eq(value.total_assets, expected_assets));
    assert!(approx_eq(value.total_invested, expected_invested));
    assert!(approx_eq(
        value.return_amount,
        expected_assets - expected_invested
    ));
}

#[tokio::test]
async fn class_summaries_add_up_to_portfolio_total() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let summary_service = SummaryService::new();
    let networth_service = NetWorthService::new();
    let snapshot = full_snapshot();

    let summaries = summary_service
        .class_summaries(&resolver, &valuator, &snapshot)
        .await;
    let value = networth_service
        .portfolio_value(&resolver, &valuator, &snapshot)
        .await;

    let summed: f64 = summaries.iter().map(|s| s.total_value).sum();
    assert!(approx_eq(summed, value.total_assets));

    let summed_invested: f64 = summaries.iter().map(|s| s.total_invested).sum();
    assert!(approx_eq(summed_invested, value.total_invested));
}

#[tokio::test]
async fn net_worth_subtracts_expenses() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = NetWorthService::new();
    let snapshot = full_snapshot();

    let expenses = vec![expense(12_000.0), expense(8_000.0)];
    let net = service
        .net_worth(&resolver, &valuator, &snapshot, Ok(expenses))
        .await;

    assert!(approx_eq(net.total_liabilities, 20_000.0));
    assert!(approx_eq(net.net_worth, net.total_assets - 20_000.0));
    // change figures are the since-purchase return
    assert!(net.change_amount > 0.0);
}

#[tokio::test]
async fn expense_failure_degrades_to_zero_liabilities() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = NetWorthService::new();
    let snapshot = full_snapshot();

    let net = service
        .net_worth(
            &resolver,
            &valuator,
            &snapshot,
            Err(CoreError::ExpensesUnavailable("connection refused".into())),
        )
        .await;

    assert!(approx_eq(net.total_liabilities, 0.0));
    assert!(approx_eq(net.net_worth, net.total_assets));
}

#[tokio::test]
async fn net_worth_matches_portfolio_return_figures() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = NetWorthService::new();
    let snapshot = full_snapshot();

    let value = service.portfolio_value(&resolver, &valuator, &snapshot).await;
    let net = service
        .net_worth(&resolver, &valuator, &snapshot, Ok(vec![]))
        .await;

    assert!(approx_eq(net.change_amount, value.return_amount));
    assert!(approx_eq(net.change_percent, value.return_percent));
}

#[tokio::test]
async fn empty_portfolio_values_to_zero() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = NetWorthService::new();

    let value = service
        .portfolio_value(&resolver, &valuator, &HoldingsSnapshot::default())
        .await;
    assert!(approx_eq(value.total_assets, 0.0));
    assert!(approx_eq(value.total_invested, 0.0));
    assert!(approx_eq(value.return_percent, 0.0));
}

// ═══════════════════════════════════════════════════════════════════
// Dashboard
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn dashboard_totals_match_row_sums() {
    let resolver = table_resolver();
    let valuator = ValuationService::new();
    let service = SummaryService::new();
    let snapshot = full_snapshot();

    let dashboard = service.dashboard(&resolver, &valuator, &snapshot).await;
    assert_eq!(dashboard.assets.len(), snapshot.holding_count());

    let row_invested: f64 = dashboard.assets.iter().map(|a| a.total_invested).sum();
    let row_current: f64 = dashboard.assets.iter().map(|a| a.current_value).sum();
    assert!(approx_eq(dashboard.total_invested, row_invested));
    assert!(approx_eq(dashboard.total_current_value, row_current));
    assert!(approx_eq(
        dashboard.total_pnl,
        row_current - row_invested
    ));
}
