pub mod compose;
pub mod config;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod server;
pub mod session;

pub use error::{Error, Result};
