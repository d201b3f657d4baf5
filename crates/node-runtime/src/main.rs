//! # Hashline Node
//!
//! Entry point for the ownership-ledger state machine.
//!
//! ## Startup Sequence
//!
//! 1. Parse CLI flags and initialize logging
//! 2. Build the content gateway against the daemon API
//! 3. Fetch the authorized-address list, if a hash was given (fatal on
//!    failure: an unreadable list must not silently become "nobody")
//! 4. Construct the ledger service over a fresh in-memory store
//! 5. Serve the protocol over TCP until SIGINT

use anyhow::{Context, Result};
use clap::Parser;
use ledger_app::adapters::memory_store::InMemoryStore;
use ledger_app::adapters::time::SystemTimeSource;
use ledger_app::LedgerService;
use node_runtime::{HttpContentGateway, NodeOptions, ProtocolServer};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();

    let options = NodeOptions::parse();
    let (runtime, mut ledger_config) = options.into_configs();

    let gateway = Arc::new(
        HttpContentGateway::new(&runtime.content_api)
            .context("failed to build the content gateway")?,
    );

    if !runtime.authorized_hash.is_empty() {
        let list = gateway
            .fetch_authorized_list(&runtime.authorized_hash)
            .await
            .context("the authorized-list hash has a problem")?;
        info!(count = list.len(), "authorized addresses loaded");
        ledger_config.authorized.extend(list);
    }

    let service = LedgerService::new(
        ledger_config,
        Arc::new(InMemoryStore::new()),
        gateway,
        Arc::new(SystemTimeSource),
    )
    .context("failed to initialize the ledger service")?;

    let listener = TcpListener::bind(&runtime.listen)
        .await
        .with_context(|| format!("failed to bind {}", runtime.listen))?;
    info!(listen = %runtime.listen, "protocol server listening");

    let server = ProtocolServer::new(Arc::new(service));
    tokio::select! {
        result = server.serve(listener) => {
            result.context("protocol server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
        }
    }

    Ok(())
}
