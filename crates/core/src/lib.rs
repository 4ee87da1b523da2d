pub mod cache;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod stores;

use std::sync::Arc;
use std::time::Duration;

use cache::TtlCache;
use errors::CoreError;
use models::holding::MarketClass;
use models::instrument::{self, MarketInstrument};
use models::ledger::{InvestAssetClass, InvestmentEntry, InvestmentForm};
use models::valuation::{
    AssetClassSummary, NetWorth, PortfolioDashboard, PortfolioSnapshot, PortfolioValue,
};
use providers::registry::QuoteProviderRegistry;
use services::ledger_service::LedgerService;
use services::networth_service::NetWorthService;
use services::price_resolver::{PriceResolver, DEFAULT_RESOLVE_DEADLINE};
use services::snapshot_service::SnapshotService;
use services::summary_service::SummaryService;
use services::valuation_service::ValuationService;
use stores::traits::{ExpenseSource, FundingAccountsStore, HoldingsRepository};

/// Tuning knobs for the engine. The defaults mirror the dashboard's
/// behaviour: five-minute read cache, ten-second price deadline, eight
/// retained ledger entries, one year of snapshots.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long aggregation results stay served from cache.
    pub cache_ttl: Duration,
    /// Per-lookup deadline for price resolution.
    pub resolve_deadline: Duration,
    /// Retained investment-ledger window (most-recent-first).
    pub ledger_window: usize,
    /// Retained portfolio snapshots per user.
    pub snapshot_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(5 * 60),
            resolve_deadline: DEFAULT_RESOLVE_DEADLINE,
            ledger_window: services::ledger_service::DEFAULT_RECENT_WINDOW,
            snapshot_depth: services::snapshot_service::DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// Main entry point for the vault-core library.
///
/// Read path: holdings are pulled from the repository, each holding's
/// price is resolved concurrently (failures fall back to purchase
/// price), results are reduced into summaries / portfolio value / net
/// worth and cached for a bounded interval.
///
/// Write path: `submit_investment` validates a submission, checks and
/// decrements the funding balance, and merges the entry into the
/// ledger — one synchronous transition, serialized per account. Writes
/// do not invalidate the read cache; reads catch up when the TTL
/// lapses.
#[must_use]
pub struct PortfolioEngine {
    holdings: Arc<dyn HoldingsRepository>,
    expenses: Arc<dyn ExpenseSource>,
    accounts: Arc<dyn FundingAccountsStore>,
    resolver: PriceResolver,
    valuator: ValuationService,
    summary_service: SummaryService,
    networth_service: NetWorthService,
    ledger: LedgerService,
    snapshots: SnapshotService,
    instruments: Vec<MarketInstrument>,
    summaries_cache: TtlCache<String, Vec<AssetClassSummary>>,
    value_cache: TtlCache<String, PortfolioValue>,
    networth_cache: TtlCache<String, NetWorth>,
}

impl std::fmt::Debug for PortfolioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioEngine")
            .field("ledger_entries", &self.ledger.entry_count())
            .field("price_fallbacks", &self.valuator.fallback_count())
            .field("cached_reads", &self.cached_reads())
            .finish()
    }
}

impl PortfolioEngine {
    /// Build an engine with default configuration.
    pub fn new(
        holdings: Arc<dyn HoldingsRepository>,
        expenses: Arc<dyn ExpenseSource>,
        registry: QuoteProviderRegistry,
        accounts: Arc<dyn FundingAccountsStore>,
    ) -> Self {
        Self::with_config(holdings, expenses, registry, accounts, EngineConfig::default())
    }

    /// Build an engine with explicit configuration.
    pub fn with_config(
        holdings: Arc<dyn HoldingsRepository>,
        expenses: Arc<dyn ExpenseSource>,
        registry: QuoteProviderRegistry,
        accounts: Arc<dyn FundingAccountsStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            holdings,
            expenses,
            accounts: accounts.clone(),
            resolver: PriceResolver::with_deadline(registry, config.resolve_deadline),
            valuator: ValuationService::new(),
            summary_service: SummaryService::new(),
            networth_service: NetWorthService::new(),
            ledger: LedgerService::with_window(accounts, config.ledger_window),
            snapshots: SnapshotService::with_depth(config.snapshot_depth),
            instruments: instrument::default_catalog(),
            summaries_cache: TtlCache::new(config.cache_ttl),
            value_cache: TtlCache::new(config.cache_ttl),
            networth_cache: TtlCache::new(config.cache_ttl),
        }
    }

    // ── Read APIs ───────────────────────────────────────────────────

    /// One summary per asset class the user actually holds. Classes
    /// with zero holdings are omitted; manual holdings contribute one
    /// summary per declared asset type.
    pub async fn asset_class_summaries(
        &self,
        user_id: &str,
    ) -> Result<Vec<AssetClassSummary>, CoreError> {
        let key = user_id.to_string();
        if let Some(hit) = self.summaries_cache.get(&key) {
            return Ok(hit);
        }

        let snapshot = self.holdings.list_holdings(user_id).await?;
        snapshot.validate()?;

        let summaries = self
            .summary_service
            .class_summaries(&self.resolver, &self.valuator, &snapshot)
            .await;
        self.summaries_cache.insert(key, summaries.clone());
        Ok(summaries)
    }

    /// Whole-portfolio totals across every asset class.
    pub async fn portfolio_value(&self, user_id: &str) -> Result<PortfolioValue, CoreError> {
        let key = user_id.to_string();
        if let Some(hit) = self.value_cache.get(&key) {
            return Ok(hit);
        }

        let snapshot = self.holdings.list_holdings(user_id).await?;
        snapshot.validate()?;

        let value = self
            .networth_service
            .portfolio_value(&self.resolver, &self.valuator, &snapshot)
            .await;
        self.value_cache.insert(key, value.clone());
        Ok(value)
    }

    /// Net worth: total assets minus total liabilities (the sum of all
    /// recorded expenses). Holdings are required — a repository failure
    /// fails the read. The expense source is optional — its failure
    /// degrades liabilities to zero.
    pub async fn net_worth(&self, user_id: &str) -> Result<NetWorth, CoreError> {
        let key = user_id.to_string();
        if let Some(hit) = self.networth_cache.get(&key) {
            return Ok(hit);
        }

        let snapshot = self.holdings.list_holdings(user_id).await?;
        snapshot.validate()?;
        let expenses = self.expenses.list_expenses(user_id).await;

        let net_worth = self
            .networth_service
            .net_worth(&self.resolver, &self.valuator, &snapshot, expenses)
            .await;
        self.networth_cache.insert(key, net_worth.clone());
        Ok(net_worth)
    }

    /// Per-holding dashboard rows with live prices, plus totals.
    pub async fn dashboard(&self, user_id: &str) -> Result<PortfolioDashboard, CoreError> {
        let snapshot = self.holdings.list_holdings(user_id).await?;
        snapshot.validate()?;

        Ok(self
            .summary_service
            .dashboard(&self.resolver, &self.valuator, &snapshot)
            .await)
    }

    // ── Write API ───────────────────────────────────────────────────

    /// Record an investment submission: validate, check the funding
    /// balance, merge-or-append the ledger entry, deduct the amount.
    /// Failures leave every piece of state untouched.
    pub fn submit_investment(&self, form: &InvestmentForm) -> Result<InvestmentEntry, CoreError> {
        self.ledger.submit(form)
    }

    /// The retained ledger entries, most recent first.
    #[must_use]
    pub fn recent_investments(&self) -> Vec<InvestmentEntry> {
        self.ledger.recent_entries()
    }

    // ── Instruments ─────────────────────────────────────────────────

    /// Search the instrument catalog for the invest flow.
    #[must_use]
    pub fn search_instruments(
        &self,
        asset_class: InvestAssetClass,
        query: &str,
    ) -> Vec<MarketInstrument> {
        instrument::search_instruments(&self.instruments, asset_class, query)
            .into_iter()
            .cloned()
            .collect()
    }

    // ── Snapshots ───────────────────────────────────────────────────

    /// Value the portfolio right now and record it as today's snapshot.
    pub async fn record_snapshot(&self, user_id: &str) -> Result<PortfolioSnapshot, CoreError> {
        let snapshot = self.holdings.list_holdings(user_id).await?;
        snapshot.validate()?;

        let value = self
            .networth_service
            .portfolio_value(&self.resolver, &self.valuator, &snapshot)
            .await;
        let today = chrono::Utc::now().date_naive();
        Ok(self.snapshots.record(user_id, today, value.total_assets))
    }

    /// Recorded snapshots for one user, oldest first.
    #[must_use]
    pub fn snapshot_history(&self, user_id: &str) -> Vec<PortfolioSnapshot> {
        self.snapshots.history(user_id)
    }

    // ── Observability & Cache ───────────────────────────────────────

    /// How many price lookups have fallen back to purchase price.
    #[must_use]
    pub fn price_fallback_count(&self) -> u64 {
        self.valuator.fallback_count()
    }

    /// Check if a quote provider is registered for a market class.
    #[must_use]
    pub fn is_provider_available(&self, class: MarketClass) -> bool {
        self.resolver.has_provider_for(class)
    }

    /// The available balance of a funding account.
    #[must_use]
    pub fn funding_balance(&self, account: &str) -> Option<f64> {
        self.accounts.get_balance(account)
    }

    /// Drop all cached read results for one user.
    pub fn invalidate_cache(&self, user_id: &str) {
        let key = user_id.to_string();
        self.summaries_cache.invalidate(&key);
        self.value_cache.invalidate(&key);
        self.networth_cache.invalidate(&key);
    }

    /// Total cached read results across all users and query shapes.
    #[must_use]
    pub fn cached_reads(&self) -> usize {
        self.summaries_cache.len() + self.value_cache.len() + self.networth_cache.len()
    }
}
