pub mod config;
pub mod errors;
pub mod functions;
pub mod parsing;
pub mod structs;
pub mod utils;
