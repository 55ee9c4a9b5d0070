// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hango serve` command implementation.
//!
//! Wires the SQLite thread store and the OpenAI gateway into the memory
//! manager and translator, then serves the HTTP API until a shutdown signal.
//! Both adapters are constructed once here and closed on the way out.

use std::sync::Arc;

use hango_chat::{MemoryManager, Translator};
use hango_config::HangoConfig;
use hango_core::{HangoError, PluginAdapter, ThreadStore};
use hango_gateway::{GatewayState, start_server};
use hango_openai::OpenAiGateway;
use hango_storage::SqliteThreadStore;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the `hango serve` command.
///
/// A missing API key or an unopenable database is fatal before the listener
/// is bound.
pub async fn run_serve(config: HangoConfig) -> Result<(), HangoError> {
    init_tracing(&config.service.log_level);

    info!(name = %config.service.name, "starting hango serve");

    let gateway = Arc::new(OpenAiGateway::new(&config.openai)?);

    let store = Arc::new(SqliteThreadStore::new(config.storage.clone()));
    store.initialize().await?;
    match store.thread_count().await {
        Ok(count) => info!(
            path = %config.storage.database_path,
            threads = count,
            "thread store ready"
        ),
        Err(e) => warn!(error = %e, "could not count stored threads"),
    }

    let manager = Arc::new(MemoryManager::new(
        store.clone(),
        gateway.clone(),
        &config.memory,
        config.openai.chat_model.clone(),
    ));
    let translator = Arc::new(Translator::new(
        gateway.clone(),
        config.openai.translation_model.clone(),
    ));
    info!(
        threshold_chars = config.memory.compaction_threshold_chars,
        serialize_threads = config.memory.serialize_threads,
        "memory manager ready"
    );

    let cancel = shutdown::install_signal_handler();
    let served = start_server(&config.server, GatewayState::new(manager, translator), cancel).await;

    if let Err(e) = store.close().await {
        warn!(error = %e, "failed to close thread store");
    }
    if let Err(e) = gateway.shutdown().await {
        warn!(error = %e, "failed to shut down completion gateway");
    }
    log_heap_stats();

    served?;
    info!("hango serve shutdown complete");
    Ok(())
}

#[cfg(not(target_env = "msvc"))]
fn log_heap_stats() {
    // Stats are cached until the epoch advances.
    let _ = tikv_jemalloc_ctl::epoch::advance();
    let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
    let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
    info!(
        allocated_mb = allocated / (1024 * 1024),
        resident_mb = resident / (1024 * 1024),
        "heap at shutdown"
    );
}

#[cfg(target_env = "msvc")]
fn log_heap_stats() {}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hango={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
