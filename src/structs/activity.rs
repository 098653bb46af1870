use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PositionKey;

/* The only two events that move a pool. Anything else in the export is dropped by the normalizer. */
#[derive(Hash, Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    /* Case-insensitive match on the `Buy / Sell` column */
    pub fn from_str(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("BUY") {
            return Some(Action::Buy);
        } else if value.eq_ignore_ascii_case("SELL") {
            return Some(Action::Sell);
        }
        None
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

/* One order row of the activity export, already typed.

Amounts are kept in the currency the broker reports them in:
- `shares_amount_native` is in the instrument currency and excludes fees
- `total_amount_account` is in the account currency and includes every fee and duty
- `fx_rate` is instrument units for one unit of account currency, only set across currencies
*/
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub action: Action,
    pub ticker: String,
    pub isin: String,
    pub title: String,
    pub instrument_currency: String,
    pub account_currency: String,
    pub quantity: Decimal,
    pub shares_amount_native: Decimal,
    pub total_amount_account: Decimal,
    pub fx_rate: Option<Decimal>,
    pub fx_fee_account: Decimal,
    pub stamp_duty_account: Decimal,
    pub timestamp: DateTime<Utc>,
    pub line: u64, // line in the export, 0 when not read from a file
}

impl ActivityEvent {
    pub fn key(&self) -> PositionKey {
        return PositionKey::new(&self.ticker, &self.instrument_currency);
    }

    pub fn currencies_differ(&self) -> bool {
        return self.instrument_currency != self.account_currency;
    }
}
