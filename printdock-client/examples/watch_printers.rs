//! Watch a shop's printers from the terminal
//!
//! ```text
//! PRINTDOCK_URL=http://localhost:8080 PRINTDOCK_SHOP=shop-1 \
//!     cargo run -p printdock-client --example watch_printers
//! ```

use std::sync::Arc;
use std::time::Duration;

use printdock_client::{ClientConfig, Dashboard, PrinterClient, RefreshWorker};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "printdock_client=info".into()),
        )
        .init();

    let base_url =
        std::env::var("PRINTDOCK_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let shop_id = std::env::var("PRINTDOCK_SHOP").unwrap_or_else(|_| "shop-1".into());
    let config = ClientConfig::new(base_url, shop_id).with_poll_interval(Duration::from_secs(5));

    let dashboard = Arc::new(Dashboard::new(PrinterClient::from_config(&config)?));
    let shutdown = CancellationToken::new();
    let worker =
        RefreshWorker::new(dashboard.clone(), config.poll_interval, shutdown.clone()).spawn();

    let mut ticker = tokio::time::interval(config.poll_interval);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                for printer in dashboard.printers() {
                    println!(
                        "{:<20} {:<6} duplex={:<5} sizes={:<16} badge={:?} agent={:?}",
                        printer.name,
                        printer.capability_type.as_str(),
                        printer.duplex,
                        printer.paper_sizes.join(","),
                        printer.badge_status,
                        printer.card_status,
                    );
                }
                println!();
            }
        }
    }

    shutdown.cancel();
    worker.await?;
    Ok(())
}
