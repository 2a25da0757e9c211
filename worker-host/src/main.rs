//--------------------------------------------------------------------------
// (C) Copyright Travis Sharp <travis@kuipersys.com>.  All rights reserved.
//--------------------------------------------------------------------------

use std::sync::Arc;

use clap::Parser;
use cmd::Cli;
use config::WorkerConfig;
use services::periodic::{PeriodicWorkerOptions, PeriodicWorkerService};
use services::HostedService;
use tokio_util::sync::CancellationToken;
use worker_runtime::ServiceProviderBuilder;

mod cmd;
mod config;
mod logging;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = WorkerConfig::load(&cli)?;

    logging::init(&config.log_level, config.otel_stdout);
    tracing::info!(">> Starting worker-host service...");
    tracing::info!(">> {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::info!(">> Runtime: {}", worker_runtime::get_version_string());
    tracing::info!(">> Build Time: {}", option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"));

    let provider = Arc::new(ServiceProviderBuilder::new().build());

    if !provider.is_registered(&config.service_name) {
        anyhow::bail!("No scoped service registered for: {}", config.service_name);
    }

    let lifetime = CancellationToken::new();
    let service = Arc::new(PeriodicWorkerService::new(
        provider,
        PeriodicWorkerOptions::from(&config),
        lifetime.clone(),
    ));

    tracing::info!(">> Interval: {}s, Service: {}", config.interval_secs, config.service_name);
    service.start().await?;
    tracing::info!(">> Press Ctrl-C to stop the worker.");

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!(">> Ctrl-C received, shutting down.");
        }
        _ = lifetime.cancelled() => {
            tracing::warn!(">> Worker stopped unexpectedly, shutting down.");
        }
    }

    let result = service.stop().await;
    tracing::info!(
        ">> Worker {:?} after {} iterations.",
        service.state(),
        service.execution_count()
    );
    logging::shutdown();

    result
}
