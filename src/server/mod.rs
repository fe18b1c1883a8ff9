//! HTTP API server for the string index.

pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use crate::metric::MetricKind;
use crate::normalize::NormalForm;
use crate::vptree::VpTree;

/// Shared application state: the immutable tree plus the configuration
/// reported by `/info`. Queries read the tree concurrently without
/// synchronization; the build fully completes before the listener opens.
pub struct AppState {
    pub tree: VpTree<MetricKind>,
    pub metric: MetricKind,
    pub norm: Option<NormalForm>,
    pub timeout: Duration,
}

impl AppState {
    /// The normalization name reported by `/info`; empty when none is set.
    pub fn norm_name(&self) -> &'static str {
        self.norm.map(|n| n.name()).unwrap_or("")
    }

    /// Normalize an incoming string when a normal form is configured.
    pub fn normalize(&self, s: &str) -> String {
        match self.norm {
            Some(form) => form.apply(s),
            None => s.to_string(),
        }
    }
}

/// Start the HTTP server on `addr`.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = routes::create_router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
