//! # Example: many_services
//!
//! Several independently stoppable services sharing one event bus and one
//! parent cancellation token, logging through `tracing`.
//!
//! Shows how to:
//! - route service logs into `tracing` with [`TracingLogger`]
//! - watch lifecycle events of all services on a shared [`Bus`]
//! - stop one service explicitly while the others keep running
//! - stop the rest at once by cancelling the parent token
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example many_services
//! ```

use std::{sync::Arc, time::Duration};

use servicekit::{Bus, EventKind, Service, ServiceConfig, TracingLogger};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let bus = Bus::new(256);
    let parent = CancellationToken::new();
    let cfg = ServiceConfig::default().with_tick_interval(Duration::from_millis(400));

    // Print only the transitions, not every heartbeat.
    let mut rx = bus.subscribe();
    let watcher = tokio::spawn(async move {
        while let Ok(ev) = rx.recv().await {
            if ev.kind != EventKind::Heartbeat {
                println!(
                    "#{} {:?} service={}",
                    ev.seq,
                    ev.kind,
                    ev.service.as_deref().unwrap_or("-")
                );
            }
        }
    });

    let mut services = Vec::new();
    for name in ["ingest", "index", "compact"] {
        let svc = Service::builder(name, Arc::new(TracingLogger::new(name)))
            .with_config(cfg.clone())
            .with_bus(bus.clone())
            .with_parent_token(&parent)
            .build()?;
        svc.init();
        svc.run();
        services.push(svc);
    }

    tokio::time::sleep(Duration::from_secs(1)).await;
    services[0].stop_and_wait().await?;

    tokio::time::sleep(Duration::from_secs(1)).await;
    parent.cancel();
    for svc in &services[1..] {
        svc.wait_stopped(cfg.grace).await?;
    }

    drop(services);
    drop(bus);
    watcher.await?;
    Ok(())
}
