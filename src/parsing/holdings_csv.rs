use csv::WriterBuilder;

use crate::{errors::IoError, structs::Snapshot};

pub const OUTPUT_HEADERS: [&str; 11] = [
    "ticker",
    "title",
    "isin",
    "instrument_currency",
    "account_currency",
    "quantity",
    "avg_entry_price_native",
    "avg_entry_price_gbp",
    "total_cost_native",
    "total_cost_gbp",
    "last_txn_timestamp",
];

/* The header row is always written, even when nothing is held */
pub fn holdings_to_csv(snapshot: &Snapshot) -> Result<Vec<u8>, IoError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer
        .write_record(OUTPUT_HEADERS)
        .map_err(|e| IoError::new(e.to_string()))?;
    for row in &snapshot.holdings {
        writer.serialize(row).map_err(|e| IoError::new(e.to_string()))?;
    }
    return writer
        .into_inner()
        .map_err(|e| IoError::new(e.to_string()));
}
