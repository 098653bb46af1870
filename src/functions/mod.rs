pub mod currency;
pub use currency::*;

pub mod cost_basis;
pub use cost_basis::*;

pub mod workflow;
pub use workflow::*;
