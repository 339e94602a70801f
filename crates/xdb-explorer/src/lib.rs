//! XDB Chain account explorer
//!
//! Looks up an account on a Horizon-style ledger API: validates the
//! address, fetches the account snapshot, follows pagination cursors for
//! its transactions, payments, offers, effects and issued assets, and
//! reports each collection's outcome independently.

pub mod address;
pub mod aggregator;
pub mod client;
pub mod config;
pub mod core;
pub mod pagination;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use address::{validate, AccountId};
pub use aggregator::AccountAggregator;
pub use client::{LedgerApiClient, ReqwestTransport};
pub use config::ExplorerConfig;
pub use crate::core::*;
pub use pagination::PaginatedCollector;
pub use render::Renderer;
pub use session::{LookupSequencer, LookupTicket};
