//! # buttonhubd — buttonhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise logging
//! - Open the `SQLite` accessory cache and run migrations
//! - Replay cached accessories, reconcile configured buttons and wait for
//!   new accessories to initialise
//! - Build the axum router over the frozen registry
//! - Bind to a TCP port and serve until shutdown or a fatal fault
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::future::IntoFuture;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use buttonhub_adapter_http_axum::{AppState, FatalSignal, router};
use buttonhub_adapter_storage_sqlite_sqlx::SqliteAccessoryCache;
use buttonhub_adapter_virtual::VirtualButtonFactory;
use buttonhub_app::event_bus::{InProcessEventBus, PressSubscription};
use buttonhub_app::platform::Platform;

use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.logging.filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Accessory cache
    let db = buttonhub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let cache = SqliteAccessoryCache::new(db.pool().clone());

    // Host event bus
    let event_bus = Arc::new(InProcessEventBus::new(256));
    tokio::spawn(log_presses(event_bus.subscribe()));

    // Platform startup
    let factory = VirtualButtonFactory::new(Arc::clone(&event_bus));
    let mut platform = Platform::new(config.platform(), factory, cache);
    platform.restore_cached().await?;
    let ready = platform.init().await?;

    // HTTP
    let (fatal, mut fatal_rx) = FatalSignal::channel();
    let app = router::build(AppState::new(ready.registry(), fatal));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        platform = %ready.name(),
        addr = %listener.local_addr()?,
        "listening for button events"
    );

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    tokio::select! {
        result = server => result?,
        Some(fault) = fatal_rx.recv() => {
            tracing::error!(error = %fault, "stopping after fatal fault");
            return Err(fault.into());
        }
    }

    tracing::info!("buttonhubd stopped");
    Ok(())
}

/// Log every press published to the host bus until the bus goes away.
async fn log_presses(mut presses: PressSubscription) {
    while let Some(event) = presses.recv().await {
        tracing::info!(
            button = %event.button,
            kind = %event.kind,
            accessory_id = %event.accessory_id,
            "press signalled"
        );
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown requested");
}
