use anyhow::{Context, Result};
use domo::backend::{Backend, RestBackend};
use domo::command::CommandDispatcher;
use domo::config::{self, DomoConfig};
use domo::dashboard::Dashboard;
use domo::poller::PollerSet;
use domo::store::EntityStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "domo=info".into()),
        )
        .init();

    info!("Domo starting...");

    let config_path = std::env::var("DOMO_CONFIG").unwrap_or_else(|_| "domo.toml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        config::load_config(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", config_path, e))?
    } else {
        info!(path = %config_path, "No config file found, using defaults");
        DomoConfig::default()
    };

    info!(
        backend = %config.backend.base_url,
        poll_interval_secs = config.poll.interval_seconds,
        category_count = config.categories.len(),
        "Configuration loaded"
    );

    let backend: Arc<dyn Backend> = Arc::new(
        RestBackend::new(&config.backend).context("Failed to initialize backend client")?,
    );
    let store = Arc::new(EntityStore::new(
        config.categories.iter().map(|c| c.name.clone()),
    ));
    let dispatcher = Arc::new(CommandDispatcher::new(
        Arc::clone(&backend),
        Arc::clone(&store),
    ));
    let dashboard = Dashboard::new(
        Arc::clone(&store),
        dispatcher,
        config.scene_order.clone(),
        config.categories.clone(),
    );

    // One polling loop per configured category
    let mut pollers = PollerSet::new();
    let poll_interval = Duration::from_secs(config.poll.interval_seconds);
    for category in &config.categories {
        pollers.spawn(
            category.clone(),
            Arc::clone(&backend),
            Arc::clone(&store),
            poll_interval,
        );
    }
    info!(poller_count = config.categories.len(), "Category pollers started");

    // Log snapshot changes in place of a rendering layer
    let mut updates = dashboard.subscribe();
    let log_handle = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => {
                    info!(category = %update.category, change = ?update.change, "Snapshot updated")
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped = skipped, "Snapshot log lagging")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    log_handle.abort();
    pollers.shutdown();
    info!("Domo stopped");

    Ok(())
}
