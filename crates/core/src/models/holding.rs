use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// The market-linked asset classes. Each class resolves live prices
/// through its own provider entry point, keyed by a class-appropriate
/// identifier (ticker symbol, scheme code, coin id).
///
/// Manually-tracked holdings are deliberately NOT part of this enum:
/// their values are user-maintained and never touch a price provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketClass {
    Equity,
    MutualFund,
    Crypto,
}

impl std::fmt::Display for MarketClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketClass::Equity => write!(f, "Equity"),
            MarketClass::MutualFund => write!(f, "Mutual Fund"),
            MarketClass::Crypto => write!(f, "Crypto"),
        }
    }
}

/// An exchange-listed stock position. Priced by ticker symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityHolding {
    pub id: i64,
    pub external_id: String,
    pub user_id: String,
    /// Ticker symbol, e.g. "RELIANCE"
    pub symbol: String,
    pub exchange: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A mutual-fund position. Priced by AMFI scheme code (NAV).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutualFundHolding {
    pub id: i64,
    pub external_id: String,
    pub user_id: String,
    /// AMFI scheme code, e.g. "120503"
    pub scheme_code: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cryptocurrency position. Priced by coin id ("bitcoin"), with a
/// display symbol ("BTC") kept alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoHolding {
    pub id: i64,
    pub external_id: String,
    pub user_id: String,
    /// Provider coin id, e.g. "bitcoin"
    pub coin_id: String,
    /// Display symbol, e.g. "BTC"
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A manually-tracked asset (gold, real estate, NPS, bonds, …).
/// Both invested and current values are user-maintained; valuation
/// never consults a price provider for these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualHolding {
    pub id: i64,
    pub external_id: String,
    pub user_id: String,
    pub asset_name: String,
    /// Free-form asset type, e.g. "Gold", "Real Estate", "Bond".
    /// Summaries group manual holdings by this string.
    pub asset_type: String,
    pub invested_value: f64,
    pub current_value: f64,
    pub purchase_date: DateTime<Utc>,
    #[serde(default)]
    pub maturity_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recorded position in one asset. Closed sum type — valuation logic
/// dispatches on the variant, never on field probing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Holding {
    Equity(EquityHolding),
    MutualFund(MutualFundHolding),
    Crypto(CryptoHolding),
    Manual(ManualHolding),
}

impl Holding {
    /// The market class of this holding, or `None` for manual assets.
    #[must_use]
    pub fn market_class(&self) -> Option<MarketClass> {
        match self {
            Holding::Equity(_) => Some(MarketClass::Equity),
            Holding::MutualFund(_) => Some(MarketClass::MutualFund),
            Holding::Crypto(_) => Some(MarketClass::Crypto),
            Holding::Manual(_) => None,
        }
    }

    /// The class-appropriate price-lookup key, or `None` for manual assets.
    #[must_use]
    pub fn market_identifier(&self) -> Option<&str> {
        match self {
            Holding::Equity(h) => Some(&h.symbol),
            Holding::MutualFund(h) => Some(&h.scheme_code),
            Holding::Crypto(h) => Some(&h.coin_id),
            Holding::Manual(_) => None,
        }
    }

    #[must_use]
    pub fn external_id(&self) -> &str {
        match self {
            Holding::Equity(h) => &h.external_id,
            Holding::MutualFund(h) => &h.external_id,
            Holding::Crypto(h) => &h.external_id,
            Holding::Manual(h) => &h.external_id,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Holding::Equity(h) => &h.user_id,
            Holding::MutualFund(h) => &h.user_id,
            Holding::Crypto(h) => &h.user_id,
            Holding::Manual(h) => &h.user_id,
        }
    }

    /// Human-facing name for dashboard rows: symbol for equities and
    /// crypto, scheme code for funds, asset name for manual holdings.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Holding::Equity(h) => &h.symbol,
            Holding::MutualFund(h) => &h.scheme_code,
            Holding::Crypto(h) => &h.symbol,
            Holding::Manual(h) => &h.asset_name,
        }
    }

    /// Check the holding invariants: quantity and purchase price are
    /// never negative (manual holdings: invested/current values).
    pub fn validate(&self) -> Result<(), CoreError> {
        let (quantity, price) = match self {
            Holding::Equity(h) => (h.quantity, h.purchase_price),
            Holding::MutualFund(h) => (h.quantity, h.purchase_price),
            Holding::Crypto(h) => (h.quantity, h.purchase_price),
            Holding::Manual(h) => (h.invested_value, h.current_value),
        };
        if quantity < 0.0 || price < 0.0 {
            return Err(CoreError::Validation(format!(
                "Holding {} has a negative quantity, price, or value",
                self.external_id()
            )));
        }
        Ok(())
    }
}

/// What the holdings repository returns for one user: the typed holding
/// lists, empty (never an error) for classes the user doesn't hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsSnapshot {
    pub equities: Vec<EquityHolding>,
    pub mutual_funds: Vec<MutualFundHolding>,
    pub cryptos: Vec<CryptoHolding>,
    pub manuals: Vec<ManualHolding>,
}

impl HoldingsSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holding_count() == 0
    }

    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.equities.len() + self.mutual_funds.len() + self.cryptos.len() + self.manuals.len()
    }

    /// Flatten the typed lists into one unified holding list, in class
    /// order (equities, funds, crypto, manual).
    #[must_use]
    pub fn flatten(&self) -> Vec<Holding> {
        let mut all = Vec::with_capacity(self.holding_count());
        all.extend(self.equities.iter().cloned().map(Holding::Equity));
        all.extend(self.mutual_funds.iter().cloned().map(Holding::MutualFund));
        all.extend(self.cryptos.iter().cloned().map(Holding::Crypto));
        all.extend(self.manuals.iter().cloned().map(Holding::Manual));
        all
    }

    /// Validate every holding in the snapshot.
    pub fn validate(&self) -> Result<(), CoreError> {
        for holding in self.flatten() {
            holding.validate()?;
        }
        Ok(())
    }
}
