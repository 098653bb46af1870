pub mod activity;
pub use activity::*;

pub mod position;
pub use position::*;

pub mod holding;
pub use holding::*;

pub mod managers;
pub use managers::*;
