use crate::{errors::IoError, structs::Snapshot};

pub fn holdings_to_json(snapshot: &Snapshot) -> Result<Vec<u8>, IoError> {
    let mut bytes = serde_json::to_vec_pretty(snapshot).map_err(|e| IoError::new(e.to_string()))?;
    bytes.push(b'\n');
    return Ok(bytes);
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::structs::HoldingRow;

    use super::*;

    #[test]
    fn test_decimals_are_strings() {
        let snapshot = Snapshot {
            holdings: vec![HoldingRow {
                ticker: "AAPL".to_string(),
                title: "Apple".to_string(),
                isin: String::new(),
                instrument_currency: "USD".to_string(),
                account_currency: "GBP".to_string(),
                quantity: dec!(0.5),
                avg_entry_price_native: dec!(305.2),
                avg_entry_price_gbp: dec!(236),
                total_cost_native: dec!(152.6),
                total_cost_gbp: dec!(118),
                last_txn_timestamp: "2024-01-05T15:00:00Z".to_string(),
            }],
        };
        let value: serde_json::Value = serde_json::from_slice(&holdings_to_json(&snapshot).unwrap()).unwrap();
        assert_eq!(value["holdings"][0]["total_cost_native"], "152.6");
        assert_eq!(value["holdings"][0]["quantity"], "0.5");

        let back: Snapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snapshot);
    }
}
