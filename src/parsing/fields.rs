use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

/* Brokers pad amounts with thousands separators or a currency sign: "£1,234.50" */
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '£' | '$' | '€'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    return Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok();
}

/* ISO 8601. Timestamps without an offset are taken as UTC. */
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc());
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("105.00"), Some(dec!(105.00)));
        assert_eq!(parse_decimal(" £1,234.5 "), Some(dec!(1234.5)));
        assert_eq!(parse_decimal("$0.0001"), Some(dec!(0.0001)));
        assert_eq!(parse_decimal("1.5e2"), Some(dec!(150)));
        assert_eq!(parse_decimal("-3"), Some(dec!(-3)));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("n/a"), None);
    }

    #[test]
    fn test_decimal_keeps_precision() {
        let mut total = dec!(0);
        for _ in 0..10 {
            total += parse_decimal("0.1").unwrap();
        }
        assert_eq!(total, dec!(1));
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 5).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T14:30:05.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T15:30:05+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T14:30:05"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 14:30:05"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("01/03/2024"), None);
    }
}
