use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Asset classes accepted by the invest flow.
///
/// The market-linked classes (fund/stock/crypto) require a priced
/// instrument picked from search; the others are recorded by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestAssetClass {
    MutualFund,
    Stock,
    Crypto,
    FixedDeposit,
    RealEstate,
}

impl InvestAssetClass {
    pub const ALL: [InvestAssetClass; 5] = [
        InvestAssetClass::MutualFund,
        InvestAssetClass::Stock,
        InvestAssetClass::Crypto,
        InvestAssetClass::FixedDeposit,
        InvestAssetClass::RealEstate,
    ];

    /// Whether this class trades against a searchable market instrument
    /// (and therefore requires symbol, price and units on submission).
    #[must_use]
    pub fn is_market(&self) -> bool {
        matches!(
            self,
            InvestAssetClass::MutualFund | InvestAssetClass::Stock | InvestAssetClass::Crypto
        )
    }
}

impl std::fmt::Display for InvestAssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvestAssetClass::MutualFund => write!(f, "Mutual Fund"),
            InvestAssetClass::Stock => write!(f, "Stock"),
            InvestAssetClass::Crypto => write!(f, "Crypto"),
            InvestAssetClass::FixedDeposit => write!(f, "Fixed Deposit"),
            InvestAssetClass::RealEstate => write!(f, "Real Estate"),
        }
    }
}

/// A raw investment submission, exactly as the form hands it over.
/// Nothing here is trusted until `LedgerService` validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentForm {
    pub date_time: Option<DateTime<Utc>>,
    pub out_account: String,
    pub asset_class: InvestAssetClass,
    /// Instrument picked from search; empty when none was selected.
    #[serde(default)]
    pub selected_symbol: String,
    /// Free-form name for non-market classes.
    #[serde(default)]
    pub asset_name: String,
    pub amount: f64,
    #[serde(default)]
    pub price_per_unit: Option<f64>,
    #[serde(default)]
    pub units: Option<f64>,
    #[serde(default)]
    pub expected_roi: Option<f64>,
    #[serde(default)]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub notes: String,
}

/// A recorded investment transaction. Entries for the same
/// (asset class, asset name) pair are merged rather than duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentEntry {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub out_account: String,
    pub asset_class: InvestAssetClass,
    pub asset_name: String,
    pub amount: f64,
    #[serde(default)]
    pub price_per_unit: Option<f64>,
    #[serde(default)]
    pub units: Option<f64>,
    #[serde(default)]
    pub expected_roi: Option<f64>,
    #[serde(default)]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub notes: String,
}

/// Derive units from amount and price, rounded to 6 decimal places.
/// Returns `None` when either input is non-positive.
#[must_use]
pub fn units_for(amount: f64, price_per_unit: f64) -> Option<f64> {
    if amount <= 0.0 || price_per_unit <= 0.0 {
        return None;
    }
    Some((amount / price_per_unit * 1e6).round() / 1e6)
}
