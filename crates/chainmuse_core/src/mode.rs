//! Adapter operating mode.

use serde::{Deserialize, Serialize};

/// Whether an adapter talks to the real external system or to an
/// in-process simulation of it.
///
/// Chosen once at construction and never switched at runtime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum AdapterMode {
    /// Backed by the configured external service
    #[display("configured")]
    Live,
    /// Backed by an in-process simulation
    #[display("simulated")]
    Simulated,
}
