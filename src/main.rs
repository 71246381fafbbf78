use anyhow::{Context, Result};
use tracing::info;

use courier::broker::{AmqpTransport, Publisher};
use courier::config::{load_config, CourierConfig};

const USAGE: &str = "usage: courier <user_id> <type> [payload-json]";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier=info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let user_id = args.next().context(USAGE)?;
    let message_type = args.next().context(USAGE)?;
    let payload = match args.next() {
        Some(raw) => serde_json::from_str(&raw).context("payload must be valid JSON")?,
        None => serde_json::json!({}),
    };

    let config = match std::env::var("COURIER_CONFIG") {
        Ok(path) => load_config(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path, e))?,
        Err(_) => CourierConfig::default(),
    };

    let publisher = Publisher::new(Box::new(AmqpTransport), config.broker);

    publisher
        .send(user_id.as_str(), message_type, payload)
        .await
        .context("Failed to publish notification")?;
    publisher.close().await;

    info!("Notification published");
    Ok(())
}
