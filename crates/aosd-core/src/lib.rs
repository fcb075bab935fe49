pub mod config;
pub mod logging;

pub mod download;
pub mod error;
pub mod fetch;
pub mod filename;
pub mod listing;
pub mod output;
pub mod pipeline;
pub mod resolve;

pub use error::{AosdError, FetchError};
