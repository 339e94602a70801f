//! Core domain abstractions and types
//!
//! Error taxonomy, the transport port and the values that flow from the
//! client through the collector and aggregator to the presentation layer.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{ExplorerError, ExplorerResult, FetchError};
pub use traits::{HttpTransport, RawResponse};
pub use types::{
    AccountSnapshot, AccountState, AggregateResult, Balance, CollectionResult, LedgerRecord, Page,
    ResourceKind, Signer,
};
