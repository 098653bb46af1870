pub mod fields;
pub use fields::*;

pub mod validation;
pub use validation::*;

pub mod activity_csv;
pub use activity_csv::*;

pub mod holdings_csv;
pub use holdings_csv::*;

pub mod holdings_json;
pub use holdings_json::*;
