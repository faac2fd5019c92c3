//! Capability traits for the external systems ChainMuse orchestrates.
//!
//! Each trait has a live implementation talking to the real service and a
//! simulated implementation selected explicitly at construction time.

mod content;
mod generator;
mod ledger;

pub use content::{ContentStore, RetrievalEndpoint};
pub use generator::NarrativeGenerator;
pub use ledger::{LedgerMinter, LedgerReader};
