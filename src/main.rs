use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use wc22_dashboard::bindings::Dashboard;
use wc22_dashboard::config::DashboardConfig;
use wc22_dashboard::dataset::load_dataset;
use wc22_dashboard::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = DashboardConfig::from_env();
    let dataset = load_dataset(&config.data_path)
        .with_context(|| format!("cannot start without {}", config.data_path.display()))?;
    tracing::info!(rows = dataset.len(), path = %config.data_path.display(), "dataset loaded");

    let quirks = config.quirks.active();
    if !quirks.is_empty() {
        tracing::warn!(
            ?quirks,
            "legacy display quirks enabled; these look like authoring defects in the first release"
        );
    }

    let dashboard = Dashboard::with_defaults(Arc::new(dataset), config.quirks)
        .context("failed to initialise dashboard bindings")?;
    server::serve(config.bind_addr, AppState::new(dashboard)).await
}
