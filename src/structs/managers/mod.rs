pub mod position_book;
pub use position_book::*;
