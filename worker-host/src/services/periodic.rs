use std::{
    any::Any,
    panic::AssertUnwindSafe,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::Local;
use futures_util::FutureExt;
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use worker_runtime::{ServiceProvider, SCOPED_WRITER};

use super::{HostedService, ServiceState};
use crate::{config::WorkerConfig, logging};

#[derive(Debug, Clone)]
pub struct PeriodicWorkerOptions {
    pub interval: Duration,
    pub service_name: String,
}

impl Default for PeriodicWorkerOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            service_name: SCOPED_WRITER.to_string(),
        }
    }
}

impl From<&WorkerConfig> for PeriodicWorkerOptions {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            interval: config.interval(),
            service_name: config.service_name.clone(),
        }
    }
}

struct RunningTask {
    token: CancellationToken,
    handle: JoinHandle<anyhow::Result<()>>,
}

/// Resolves the configured scoped service in a fresh scope and calls it,
/// once per interval, until stopped.
pub struct PeriodicWorkerService {
    provider: Arc<ServiceProvider>,
    options: PeriodicWorkerOptions,
    lifetime: CancellationToken,
    task: Mutex<Option<RunningTask>>,
    is_running: AtomicBool,
    execution_count: AtomicU64,
}

impl PeriodicWorkerService {
    /// `lifetime` is the host's shutdown token. Cancelling it stops the loop,
    /// and the loop cancels it if it faults.
    pub fn new(
        provider: Arc<ServiceProvider>,
        options: PeriodicWorkerOptions,
        lifetime: CancellationToken,
    ) -> Self {
        Self {
            provider,
            options,
            lifetime,
            task: Mutex::new(None),
            is_running: AtomicBool::new(false),
            execution_count: AtomicU64::new(0),
        }
    }

    pub fn execution_count(&self) -> u64 {
        self.execution_count.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ServiceState {
        if self.is_running.load(Ordering::SeqCst) {
            ServiceState::Running
        } else {
            ServiceState::Idle
        }
    }

    async fn run(self: Arc<Self>, token: CancellationToken) -> anyhow::Result<()> {
        let result = loop {
            if let Err(e) = self.execute_once().await {
                tracing::error!("PeriodicWorkerService faulted: {:?}", e);
                break Err(e);
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!("PeriodicWorkerService cancelled.");
                    break Ok(());
                }
                _ = tokio::time::sleep(self.options.interval) => {}
            }
        };

        self.is_running.store(false, Ordering::SeqCst);

        if result.is_err() {
            self.lifetime.cancel();
        }

        result
    }

    async fn execute_once(&self) -> anyhow::Result<()> {
        let count = self.execution_count.fetch_add(1, Ordering::SeqCst) + 1;
        let span = tracing::info_span!("iteration", count);

        async {
            tracing::info!("PeriodicWorkerService: execute {}. Count: {}", Local::now(), count);

            if let Some(activity_id) = logging::get_current_activity_id() {
                tracing::debug!("Activity: {}", activity_id);
            }

            // a panicking factory is as fatal as a panicking worker
            match AssertUnwindSafe(self.resolve_and_write()).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Err(anyhow::anyhow!(
                    "Scoped service '{}' panicked: {}",
                    self.options.service_name,
                    panic_message(&*panic)
                )),
            }
        }
        .instrument(span)
        .await
    }

    async fn resolve_and_write(&self) -> anyhow::Result<()> {
        // dropped on every exit path, releasing whatever it resolved
        let mut scope = self.provider.create_scope();
        let service = scope.get_required_service(&self.options.service_name)?;

        service.write().await;

        Ok(())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

#[async_trait]
impl HostedService for PeriodicWorkerService {
    async fn start(self: &Arc<Self>) -> anyhow::Result<()> {
        let mut guard = self.task.lock().await;

        if let Some(running) = guard.take() {
            if !running.handle.is_finished() {
                *guard = Some(running);
                anyhow::bail!("PeriodicWorkerService is already running.");
            }

            if let Ok(Err(e)) = running.handle.await {
                tracing::warn!("Previous PeriodicWorkerService run ended with a fault: {:?}", e);
            }
        }

        if self.lifetime.is_cancelled() {
            anyhow::bail!("PeriodicWorkerService cannot start, the host is shutting down.");
        }

        tracing::info!("PeriodicWorkerService: start {}", Local::now());

        let token = self.lifetime.child_token();
        self.is_running.store(true, Ordering::SeqCst);
        let handle = tokio::spawn(self.clone().run(token.clone()));

        *guard = Some(RunningTask { token, handle });

        Ok(())
    }

    async fn stop(self: &Arc<Self>) -> anyhow::Result<()> {
        let running = self.task.lock().await.take();

        let Some(running) = running else {
            tracing::debug!("PeriodicWorkerService is not running.");
            return Ok(());
        };

        running.token.cancel();
        let outcome = running.handle.await;
        self.is_running.store(false, Ordering::SeqCst);

        tracing::info!("PeriodicWorkerService: stop {}", Local::now());

        match outcome {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("PeriodicWorkerService task failed to join: {}", e)),
        }
    }
}
