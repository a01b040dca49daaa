//! Previously generated movies.

mod client;
mod types;

pub use client::HistoryClient;
pub use types::*;
