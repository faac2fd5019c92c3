//! HTTP surface for ChainMuse.
//!
//! Exposes node creation, ledger queries and content retrieval over axum.
//! All adapters are built once from [`ChainmuseConfig`] and shared through
//! [`AppState`].

mod api;
mod config;
mod error;
mod request;
mod response;
mod state;

pub use api::create_router;
pub use config::{ChainmuseConfig, ServerConfig};
pub use error::ApiError;
pub use request::{CreateChildBody, CreateRootBody, LimitQuery};
pub use response::{CreatedResponse, HealthResponse, ServiceModes};
pub use state::AppState;

use tokio::net::TcpListener;
use tracing::info;

/// Serve the API on `listener` until the process stops.
///
/// # Errors
///
/// Returns an I/O error if the server fails.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "ChainMuse server listening");
    }
    axum::serve(listener, create_router(state)).await
}
