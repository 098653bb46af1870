use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PositionPool;

/* Decimals written to the holdings file keep this many fractional digits. Consumers round for display. */
pub const OUTPUT_DECIMALS: u32 = 8;

/* One row of the holdings file. Field names are the column headers. */
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct HoldingRow {
    pub ticker: String,
    pub title: String,
    pub isin: String,
    pub instrument_currency: String,
    pub account_currency: String,
    pub quantity: Decimal,
    pub avg_entry_price_native: Decimal,
    pub avg_entry_price_gbp: Decimal,
    pub total_cost_native: Decimal,
    pub total_cost_gbp: Decimal,
    pub last_txn_timestamp: String,
}

impl HoldingRow {
    pub fn from_pool(pool: &PositionPool) -> Self {
        return HoldingRow {
            ticker: pool.key.ticker.clone(),
            title: pool.title.clone(),
            isin: pool.isin.clone(),
            instrument_currency: pool.key.instrument_currency.clone(),
            account_currency: pool.account_currency.clone(),
            quantity: round_output(pool.quantity),
            avg_entry_price_native: round_output(pool.avg_native()),
            avg_entry_price_gbp: round_output(pool.avg_account()),
            total_cost_native: round_output(pool.cost_native),
            total_cost_gbp: round_output(pool.cost_account),
            last_txn_timestamp: pool
                .last_timestamp
                .map(format_timestamp)
                .unwrap_or_default(),
        };
    }
}

fn round_output(value: Decimal) -> Decimal {
    return value.round_dp(OUTPUT_DECIMALS).normalize();
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    return timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true);
}

/* Every non-zero position at the end of one run, sorted by ticker then instrument currency */
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub holdings: Vec<HoldingRow>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        return self.holdings.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.holdings.is_empty();
    }

    pub fn get(&self, ticker: &str, instrument_currency: &str) -> Option<&HoldingRow> {
        return self
            .holdings
            .iter()
            .find(|row| row.ticker == ticker && row.instrument_currency == instrument_currency);
    }
}
