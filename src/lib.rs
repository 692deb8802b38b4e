pub mod args;
pub mod calc;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod organize;
pub mod sales;
pub mod todo;
mod utils;
pub mod words;


pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use model::Amount;
