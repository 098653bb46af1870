use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    errors::{DataError, DataErrorReason},
    functions::fx_fee_native,
    parsing::{FX_FEE_AMOUNT, QUANTITY, STAMP_DUTY, TOTAL_AMOUNT, TOTAL_SHARES_AMOUNT},
};

use super::ActivityEvent;

/* UK stamp duty is only folded into the native pool when the instrument itself trades in this currency */
pub const STAMP_DUTY_CURRENCY: &str = "GBP";

/* A position is identified by ticker AND instrument currency: the same ticker listed in two
currencies gives two unrelated pools. */
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Serialize, Deserialize)]
pub struct PositionKey {
    pub ticker: String,
    pub instrument_currency: String,
}

impl PositionKey {
    pub fn new(ticker: &str, instrument_currency: &str) -> Self {
        return PositionKey {
            ticker: ticker.to_string(),
            instrument_currency: instrument_currency.to_string(),
        };
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.ticker, self.instrument_currency)
    }
}

/* What happened when a sell was applied. `clamped` is set when the sell asked for more than was held. */
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct SellOutcome {
    pub reduced_quantity: Decimal,
    pub clamped: bool,
}

/* Pooled (weighted average) cost of one position, tracked in both currencies at once.

Both cost pools include fees. Averages are derived on read and never stored. Every apply checks its
arithmetic: a total that leaves the Decimal range is a DataError on the event's line, and the pool
is left as it was.
*/
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PositionPool {
    pub key: PositionKey,
    pub title: String,
    pub isin: String,
    pub account_currency: String,
    pub quantity: Decimal,
    pub cost_native: Decimal,
    pub cost_account: Decimal,
    pub last_timestamp: Option<DateTime<Utc>>,
}

impl PositionPool {
    pub fn new(key: PositionKey) -> Self {
        return PositionPool {
            key,
            title: String::new(),
            isin: String::new(),
            account_currency: String::new(),
            quantity: dec!(0),
            cost_native: dec!(0),
            cost_account: dec!(0),
            last_timestamp: None,
        };
    }

    /* Representable after every successful apply */
    pub fn avg_native(&self) -> Decimal {
        return average(self.cost_native, self.quantity).unwrap_or(Decimal::MAX);
    }

    pub fn avg_account(&self) -> Decimal {
        return average(self.cost_account, self.quantity).unwrap_or(Decimal::MAX);
    }

    pub fn is_empty(&self) -> bool {
        return self.quantity.is_zero();
    }

    pub fn apply_buy(&mut self, event: &ActivityEvent) -> Result<(), DataError> {
        let fx_fee = fx_fee_native(
            event.fx_fee_account,
            event.fx_rate.unwrap_or(dec!(0)),
            event.currencies_differ(),
        )
        .ok_or_else(|| overflow(event, FX_FEE_AMOUNT, event.fx_fee_account))?;
        let stamp_duty = if event.instrument_currency == STAMP_DUTY_CURRENCY {
            event.stamp_duty_account
        } else {
            dec!(0)
        };

        let cost_native = self
            .cost_native
            .checked_add(event.shares_amount_native)
            .and_then(|cost| cost.checked_add(fx_fee))
            .ok_or_else(|| overflow(event, TOTAL_SHARES_AMOUNT, event.shares_amount_native))?
            .checked_add(stamp_duty)
            .ok_or_else(|| overflow(event, STAMP_DUTY, event.stamp_duty_account))?;
        // Already fee and duty inclusive in the export
        let cost_account = self
            .cost_account
            .checked_add(event.total_amount_account)
            .ok_or_else(|| overflow(event, TOTAL_AMOUNT, event.total_amount_account))?;
        let quantity = self
            .quantity
            .checked_add(event.quantity)
            .ok_or_else(|| overflow(event, QUANTITY, event.quantity))?;
        if average(cost_native, quantity).is_none() || average(cost_account, quantity).is_none() {
            return Err(overflow(event, QUANTITY, event.quantity));
        }

        self.cost_native = cost_native;
        self.cost_account = cost_account;
        self.quantity = quantity;
        self.touch(event);
        Ok(())
    }

    /* Classic average cost reduction. Realized gains are not tracked. */
    pub fn apply_sell(&mut self, event: &ActivityEvent) -> Result<SellOutcome, DataError> {
        let clamped = event.quantity > self.quantity;
        let reduced_quantity = event.quantity.min(self.quantity);

        if clamped {
            warn!(
                "Sell of {} {} exceeds held quantity {}, only {} reduced",
                event.quantity, self.key, self.quantity, reduced_quantity
            );
        }

        if reduced_quantity == self.quantity {
            // Fully sold down: avoid leaving a rounding residue from the average
            self.cost_native = dec!(0);
            self.cost_account = dec!(0);
            self.quantity = dec!(0);
        } else {
            let sold_native = self
                .avg_native()
                .checked_mul(reduced_quantity)
                .ok_or_else(|| overflow(event, QUANTITY, event.quantity))?;
            let sold_account = self
                .avg_account()
                .checked_mul(reduced_quantity)
                .ok_or_else(|| overflow(event, QUANTITY, event.quantity))?;
            // Both costs and the quantity are non-negative and the reduction is below the holding
            self.cost_native = (self.cost_native - sold_native).max(dec!(0));
            self.cost_account = (self.cost_account - sold_account).max(dec!(0));
            self.quantity -= reduced_quantity;
        }
        self.touch(event);

        return Ok(SellOutcome {
            reduced_quantity,
            clamped,
        });
    }

    /* Latest non-empty identity wins, timestamp only moves forward */
    fn touch(&mut self, event: &ActivityEvent) {
        if !event.title.is_empty() {
            self.title = event.title.clone();
        }
        if !event.isin.is_empty() {
            self.isin = event.isin.clone();
        }
        if !event.account_currency.is_empty() {
            self.account_currency = event.account_currency.clone();
        }
        self.last_timestamp = match self.last_timestamp {
            Some(last) => Some(last.max(event.timestamp)),
            None => Some(event.timestamp),
        };
    }
}

fn average(cost: Decimal, quantity: Decimal) -> Option<Decimal> {
    if quantity.is_zero() {
        return Some(dec!(0));
    }
    return cost.checked_div(quantity);
}

fn overflow(event: &ActivityEvent, field: &str, value: Decimal) -> DataError {
    return DataError::new(event.line, field, &value.to_string(), DataErrorReason::Overflow);
}
