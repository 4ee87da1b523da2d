use serde::{Deserialize, Serialize};

use super::ledger::InvestAssetClass;

/// Maximum results returned by an instrument search.
pub const SEARCH_RESULT_LIMIT: usize = 6;

/// A searchable market instrument backing the invest flow. The invest
/// form requires market-class submissions to pick one of these, which
/// pins the symbol and pre-fills the unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInstrument {
    pub symbol: String,
    pub name: String,
    pub asset_class: InvestAssetClass,
    pub last_price: f64,
}

impl MarketInstrument {
    fn new(
        symbol: &str,
        name: &str,
        asset_class: InvestAssetClass,
        last_price: f64,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            asset_class,
            last_price,
        }
    }
}

/// The built-in instrument catalog offered by the invest flow.
#[must_use]
pub fn default_catalog() -> Vec<MarketInstrument> {
    vec![
        MarketInstrument::new("TCS.NS", "Tata Consultancy Services", InvestAssetClass::Stock, 4125.2),
        MarketInstrument::new("TATAMOTORS.NS", "Tata Motors", InvestAssetClass::Stock, 985.4),
        MarketInstrument::new("INFY.NS", "Infosys", InvestAssetClass::Stock, 1662.75),
        MarketInstrument::new("HDFCBANK.NS", "HDFC Bank", InvestAssetClass::Stock, 1745.9),
        MarketInstrument::new("MOTILALMIDC150-G", "Motilal Oswal Midcap Fund", InvestAssetClass::MutualFund, 82.13),
        MarketInstrument::new("PPFAS-FLEXI-G", "Parag Parikh Flexi Cap Fund", InvestAssetClass::MutualFund, 69.84),
        MarketInstrument::new("BTCINR", "Bitcoin", InvestAssetClass::Crypto, 5_685_400.0),
        MarketInstrument::new("ETHINR", "Ethereum", InvestAssetClass::Crypto, 286_900.0),
    ]
}

/// Filter a catalog by asset class and a case-insensitive query against
/// symbol or name. Non-market classes have no instruments and return
/// nothing. Results are capped at [`SEARCH_RESULT_LIMIT`].
#[must_use]
pub fn search_instruments<'a>(
    catalog: &'a [MarketInstrument],
    asset_class: InvestAssetClass,
    query: &str,
) -> Vec<&'a MarketInstrument> {
    if !asset_class.is_market() {
        return Vec::new();
    }

    let query = query.trim().to_lowercase();
    catalog
        .iter()
        .filter(|i| i.asset_class == asset_class)
        .filter(|i| {
            query.is_empty()
                || i.name.to_lowercase().contains(&query)
                || i.symbol.to_lowercase().contains(&query)
        })
        .take(SEARCH_RESULT_LIMIT)
        .collect()
}
