use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use hashbrown::HashMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::{
    errors::{ConfigurationError, DataError, DataErrorReason, IoError, RunError},
    parsing::{check_headers, parse_decimal, parse_timestamp},
    structs::{Action, ActivityEvent},
};

pub const TYPE: &str = "Type";
pub const BUY_SELL: &str = "Buy / Sell";
pub const TICKER: &str = "Ticker";
pub const TITLE: &str = "Title";
pub const ISIN: &str = "ISIN";
pub const QUANTITY: &str = "Quantity";
pub const INSTRUMENT_CURRENCY: &str = "Instrument Currency";
pub const ACCOUNT_CURRENCY: &str = "Account Currency";
pub const TOTAL_SHARES_AMOUNT: &str = "Total Shares Amount";
pub const TOTAL_AMOUNT: &str = "Total Amount";
pub const FX_RATE: &str = "FX Rate";
pub const FX_FEE_AMOUNT: &str = "FX Fee Amount";
pub const STAMP_DUTY: &str = "Stamp Duty";
pub const TIMESTAMP: &str = "Timestamp";

pub const REQUIRED_HEADERS: [&str; 14] = [
    TYPE,
    BUY_SELL,
    TICKER,
    TITLE,
    ISIN,
    QUANTITY,
    INSTRUMENT_CURRENCY,
    ACCOUNT_CURRENCY,
    TOTAL_SHARES_AMOUNT,
    TOTAL_AMOUNT,
    FX_RATE,
    FX_FEE_AMOUNT,
    STAMP_DUTY,
    TIMESTAMP,
];

/* Only rows of this type are trades. Dividends, interest, top ups... are dropped. */
pub const ORDER_TYPE: &str = "ORDER";

/* The typed, time ordered order events of one export.

Iterating never consumes it, so the same log can be replayed through several engines.
*/
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ActivityLog {
    pub events: Vec<ActivityEvent>,
    pub dropped_rows: usize,
}

impl ActivityLog {
    pub fn iter(&self) -> std::slice::Iter<'_, ActivityEvent> {
        return self.events.iter();
    }

    pub fn len(&self) -> usize {
        return self.events.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.events.is_empty();
    }
}

impl<'a> IntoIterator for &'a ActivityLog {
    type Item = &'a ActivityEvent;
    type IntoIter = std::slice::Iter<'a, ActivityEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

pub fn read_activity_file(path: &Path) -> Result<ActivityLog, RunError> {
    let file = File::open(path).map_err(|e| ConfigurationError::UnreadableSource {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    return read_activity(file);
}

/* Headers are all checked before the first row is read. Any bad order row aborts the whole read. */
pub fn read_activity<R: Read>(reader: R) -> Result<ActivityLog, RunError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| IoError::new(format!("Cannot read activity headers: {e}")))?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    check_headers(&headers, &REQUIRED_HEADERS)?;

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| (header.as_str(), i))
        .collect();

    let mut log = ActivityLog::default();
    for result in rdr.records() {
        let record = result.map_err(row_error)?;
        let row = Row {
            record: &record,
            index: &index,
            line: record.position().map_or(0, |position| position.line()),
        };

        if !row.text(TYPE).eq_ignore_ascii_case(ORDER_TYPE) {
            log.dropped_rows += 1;
            continue;
        }
        log.events.push(row.to_event()?);
    }

    // Stable: orders sharing a timestamp keep their order in the file
    log.events.sort_by_key(|event| event.timestamp);
    debug!(
        "Read {} order events, dropped {} other rows",
        log.events.len(),
        log.dropped_rows
    );
    return Ok(log);
}

/* A ragged row is bad data on a known line, anything else is a read failure */
fn row_error(error: csv::Error) -> RunError {
    if let csv::ErrorKind::UnequalLengths { pos, expected_len, len } = error.kind() {
        let line = pos.as_ref().map_or(0, |position| position.line());
        return DataError::new(
            line,
            "fields",
            &len.to_string(),
            DataErrorReason::FieldCount {
                expected: *expected_len,
                found: *len,
            },
        )
        .into();
    }
    return IoError::new(format!("Cannot read activity row: {error}")).into();
}

struct Row<'a> {
    record: &'a StringRecord,
    index: &'a HashMap<&'a str, usize>,
    line: u64,
}

impl<'a> Row<'a> {
    fn text(&self, field: &str) -> &'a str {
        return self
            .index
            .get(field)
            .and_then(|i| self.record.get(*i))
            .unwrap_or("");
    }

    fn error(&self, field: &str, reason: DataErrorReason) -> DataError {
        return DataError::new(self.line, field, self.text(field), reason);
    }

    /* None when the cell is empty, an error when it is not a non-negative decimal */
    fn optional_decimal(&self, field: &str) -> Result<Option<Decimal>, DataError> {
        let raw = self.text(field);
        if raw.is_empty() {
            return Ok(None);
        }
        let value = parse_decimal(raw).ok_or_else(|| self.error(field, DataErrorReason::InvalidDecimal))?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(self.error(field, DataErrorReason::Negative));
        }
        Ok(Some(value))
    }

    fn required_decimal(&self, field: &str) -> Result<Decimal, DataError> {
        return self
            .optional_decimal(field)?
            .ok_or_else(|| self.error(field, DataErrorReason::MissingValue));
    }

    fn to_event(&self) -> Result<ActivityEvent, DataError> {
        let action = Action::from_str(self.text(BUY_SELL))
            .ok_or_else(|| self.error(BUY_SELL, DataErrorReason::UnknownAction))?;

        let quantity = self.required_decimal(QUANTITY)?;
        if quantity.is_zero() {
            return Err(self.error(QUANTITY, DataErrorReason::NonPositiveQuantity));
        }

        let timestamp = parse_timestamp(self.text(TIMESTAMP))
            .ok_or_else(|| self.error(TIMESTAMP, DataErrorReason::InvalidTimestamp))?;

        let instrument_currency = self.text(INSTRUMENT_CURRENCY).to_ascii_uppercase();
        let account_currency = self.text(ACCOUNT_CURRENCY).to_ascii_uppercase();
        let currencies_differ = instrument_currency != account_currency;

        let fx_fee_account = self.optional_decimal(FX_FEE_AMOUNT)?.unwrap_or(dec!(0));
        let fx_rate = if currencies_differ {
            self.optional_decimal(FX_RATE)?
        } else {
            None
        };
        if currencies_differ && fx_rate.is_none() && !fx_fee_account.is_zero() {
            return Err(self.error(FX_RATE, DataErrorReason::MissingFxRate));
        }

        return Ok(ActivityEvent {
            action,
            ticker: self.text(TICKER).to_string(),
            isin: self.text(ISIN).to_string(),
            title: self.text(TITLE).to_string(),
            instrument_currency,
            account_currency,
            quantity,
            shares_amount_native: self.required_decimal(TOTAL_SHARES_AMOUNT)?,
            total_amount_account: self.required_decimal(TOTAL_AMOUNT)?,
            fx_rate,
            fx_fee_account,
            stamp_duty_account: self.optional_decimal(STAMP_DUTY)?.unwrap_or(dec!(0)),
            timestamp,
            line: self.line,
        });
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::errors::SchemaError;

    use super::*;

    const HEADER: &str = "Title,Type,Timestamp,Account Currency,Total Amount,Buy / Sell,Ticker,ISIN,Price per Share in Account Currency,Stamp Duty,Quantity,Venue,Order ID,Order Type,Instrument Currency,Total Shares Amount,Price per Share,FX Rate,Base FX Rate,FX Fee (BPS),FX Fee Amount,Dividend Ex Date,Dividend Pay Date,Dividend Eligible Quantity,Dividend Amount Per Share,Dividend Gross Distribution Amount,Dividend Net Distribution Amount,Dividend Withheld Tax Percentage,Dividend Withheld Tax Amount";

    fn export(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    const VOD_BUY: &str = "Vodafone,ORDER,2024-01-10T09:00:00.000Z,GBP,105.00,BUY,VOD,GB00BH4HKS39,10.5,0.50,10,XLON,1,BASIC,GBP,100.00,10,,,,,,,,,,,,";
    const AAPL_BUY: &str = "Apple,ORDER,2024-01-05T15:00:00.000Z,GBP,118.00,BUY,AAPL,US0378331005,118,,1,XNAS,2,BASIC,USD,150.00,150,1.30,1.31,99,2.00,,,,,,,,";
    const DIVIDEND: &str = "Vodafone,DIVIDEND,2024-02-01T00:00:00.000Z,GBP,3.10,,VOD,GB00BH4HKS39,,,,,,,GBP,,,,,,,2024-01-01,2024-02-01,10,0.31,3.10,3.10,0,0";

    #[test]
    fn test_orders_are_typed_and_sorted() {
        let log = read_activity(export(&[VOD_BUY, DIVIDEND, AAPL_BUY]).as_bytes()).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.dropped_rows, 1);

        let aapl = &log.events[0];
        assert_eq!(aapl.ticker, "AAPL");
        assert_eq!(aapl.action, Action::Buy);
        assert_eq!(aapl.instrument_currency, "USD");
        assert_eq!(aapl.account_currency, "GBP");
        assert_eq!(aapl.fx_rate, Some(dec!(1.30)));
        assert_eq!(aapl.fx_fee_account, dec!(2));
        assert_eq!(aapl.stamp_duty_account, dec!(0));
        assert_eq!(aapl.timestamp, Utc.with_ymd_and_hms(2024, 1, 5, 15, 0, 0).unwrap());

        let vod = &log.events[1];
        assert_eq!(vod.title, "Vodafone");
        assert_eq!(vod.isin, "GB00BH4HKS39");
        assert_eq!(vod.quantity, dec!(10));
        assert_eq!(vod.shares_amount_native, dec!(100));
        assert_eq!(vod.total_amount_account, dec!(105));
        assert_eq!(vod.stamp_duty_account, dec!(0.5));
        assert_eq!(vod.fx_rate, None);
        // Lines in the file, not positions after sorting
        assert_eq!(vod.line, 2);
        assert_eq!(aapl.line, 4);
    }

    #[test]
    fn test_ragged_row_is_data_error() {
        let ragged = "Vodafone,ORDER,2024-01-11T09:00:00Z,GBP,105,BUY,VOD";
        match read_activity(export(&[VOD_BUY, ragged]).as_bytes()).unwrap_err() {
            RunError::Data(e) => {
                assert_eq!(e.row, 3);
                assert_eq!(e.reason, DataErrorReason::FieldCount { expected: 29, found: 7 });
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_ties_keep_file_order() {
        let first = "A,ORDER,2024-01-10T09:00:00Z,GBP,10,BUY,AAA,,,,1,,,,GBP,10,,,,,,,,,,,,,";
        let second = "B,ORDER,2024-01-10T09:00:00Z,GBP,10,SELL,BBB,,,,1,,,,GBP,10,,,,,,,,,,,,,";
        let log = read_activity(export(&[first, second]).as_bytes()).unwrap();
        let tickers: Vec<&str> = log.iter().map(|event| event.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAA", "BBB"]);
    }

    #[test]
    fn test_log_is_restartable() {
        let log = read_activity(export(&[VOD_BUY, AAPL_BUY]).as_bytes()).unwrap();
        assert_eq!(log.iter().count(), 2);
        assert_eq!((&log).into_iter().count(), 2);
    }

    #[test]
    fn test_missing_headers_fail_before_rows() {
        let src = "Type,Ticker,Quantity\nORDER,VOD,not-a-number\n";
        match read_activity(src.as_bytes()).unwrap_err() {
            RunError::Schema(SchemaError { missing }) => {
                assert_eq!(missing.len(), 11);
                assert!(missing.contains(&BUY_SELL.to_string()));
                assert!(missing.contains(&TIMESTAMP.to_string()));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let src = format!("\u{feff}{}", export(&[VOD_BUY]));
        assert_eq!(read_activity(src.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_action_is_data_error() {
        let row = "Vodafone,ORDER,2024-01-10T09:00:00Z,GBP,105,HOLD,VOD,,,,10,,,,GBP,100,,,,,,,,,,,,,";
        match read_activity(export(&[row]).as_bytes()).unwrap_err() {
            RunError::Data(e) => {
                assert_eq!(e.row, 2);
                assert_eq!(e.field, BUY_SELL);
                assert_eq!(e.raw, "HOLD");
                assert_eq!(e.reason, DataErrorReason::UnknownAction);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_unknown_action_on_dropped_row_is_fine() {
        let row = "Interest,INTEREST_FROM_CASH,2024-01-10T09:00:00Z,GBP,0.12,,,,,,,,,,,,,,,,,,,,,,,,";
        let log = read_activity(export(&[row]).as_bytes()).unwrap();
        assert!(log.is_empty());
        assert_eq!(log.dropped_rows, 1);
    }

    #[test]
    fn test_bad_values_are_data_errors() {
        let cases = [
            ("Vodafone,ORDER,yesterday,GBP,105,BUY,VOD,,,,10,,,,GBP,100,,,,,,,,,,,,,", TIMESTAMP, DataErrorReason::InvalidTimestamp),
            ("Vodafone,ORDER,2024-01-10,GBP,1O5,BUY,VOD,,,,10,,,,GBP,100,,,,,,,,,,,,,", TOTAL_AMOUNT, DataErrorReason::InvalidDecimal),
            ("Vodafone,ORDER,2024-01-10,GBP,105,BUY,VOD,,,,0,,,,GBP,100,,,,,,,,,,,,,", QUANTITY, DataErrorReason::NonPositiveQuantity),
            ("Vodafone,ORDER,2024-01-10,GBP,105,BUY,VOD,,,,-2,,,,GBP,100,,,,,,,,,,,,,", QUANTITY, DataErrorReason::Negative),
            ("Vodafone,ORDER,2024-01-10,GBP,,BUY,VOD,,,,2,,,,GBP,100,,,,,,,,,,,,,", TOTAL_AMOUNT, DataErrorReason::MissingValue),
            ("Apple,ORDER,2024-01-10,GBP,118,BUY,AAPL,,,,1,,,,USD,150,,,,,2.00,,,,,,,,", FX_RATE, DataErrorReason::MissingFxRate),
        ];
        for (row, field, reason) in cases {
            match read_activity(export(&[row]).as_bytes()).unwrap_err() {
                RunError::Data(e) => {
                    assert_eq!(e.field, field, "{row}");
                    assert_eq!(e.reason, reason, "{row}");
                }
                other => panic!("unexpected error {other}"),
            }
        }
    }

    #[test]
    fn test_fx_rate_ignored_in_same_currency() {
        let row = "Vodafone,ORDER,2024-01-10,GBP,105,buy,VOD,,,,10,,,,gbp,100,,1.0,,,,,,,,,,,";
        let log = read_activity(export(&[row]).as_bytes()).unwrap();
        assert_eq!(log.events[0].fx_rate, None);
        assert_eq!(log.events[0].instrument_currency, "GBP");
        assert_eq!(log.events[0].action, Action::Buy);
    }
}
