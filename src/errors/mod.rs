pub mod io_error;
pub use io_error::*;

pub mod configuration;
pub use configuration::*;

pub mod schema;
pub use schema::*;

pub mod data;
pub use data::*;

pub mod run_error;
pub use run_error::*;
