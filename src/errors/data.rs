use std::fmt;

/* A single row could not be turned into an ActivityEvent. Aborts the whole run. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataError {
    pub row: u64, // line in the source file, header is line 1
    pub field: String,
    pub raw: String,
    pub reason: DataErrorReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataErrorReason {
    InvalidDecimal,
    InvalidTimestamp,
    UnknownAction,
    Negative,
    NonPositiveQuantity,
    MissingValue,
    MissingFxRate,
    Overflow,
    FieldCount { expected: u64, found: u64 },
}

impl DataError {
    pub fn new(row: u64, field: &str, raw: &str, reason: DataErrorReason) -> Self {
        return DataError {
            row,
            field: field.to_string(),
            raw: raw.to_string(),
            reason,
        };
    }
}

impl fmt::Display for DataErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataErrorReason::InvalidDecimal => write!(f, "not a decimal number"),
            DataErrorReason::InvalidTimestamp => write!(f, "not an ISO 8601 timestamp"),
            DataErrorReason::UnknownAction => write!(f, "expected BUY or SELL"),
            DataErrorReason::Negative => write!(f, "must not be negative"),
            DataErrorReason::NonPositiveQuantity => write!(f, "order quantity must be positive"),
            DataErrorReason::MissingValue => write!(f, "value is required on an order row"),
            DataErrorReason::MissingFxRate => {
                write!(f, "FX fee charged across currencies without an FX rate")
            }
            DataErrorReason::Overflow => write!(f, "running totals exceed the decimal range"),
            DataErrorReason::FieldCount { expected, found } => {
                write!(f, "row has {found} fields, the header has {expected}")
            }
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Row {}: field '{}' with value '{}': {}",
            self.row, self.field, self.raw, self.reason
        )
    }
}

impl std::error::Error for DataError {}
