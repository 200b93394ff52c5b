//! Run lifecycle orchestration.
//!
//! A session walks one run through its five phases in order: load and
//! validate the config, expose the receiver, fire the paced requests, wait
//! for callbacks against the budget, then report and tear down. The phases
//! live behind a trait so alternative frontends can drive them separately.


use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::{self, TestPlan};
use crate::error::{AppError, AppResult, ConfigError, FirerError};
use crate::firer;
use crate::metrics::compute_metrics;
use crate::receiver::tunnel::TunnelProvider;
use crate::receiver::{self, ReceiverConfig, ReceiverHandle};
use crate::sinks::{render_report, write_outputs};
use crate::tracker::{Tracker, TrackerEntry};
use crate::wait::{CompletionSender, WaitCoordinator, WaitOutcome};

/// Lifecycle of one load-test run, phase by phase.
///
/// Phases must be driven in declaration order; each one checks that its
/// prerequisites ran and fails with a configuration error otherwise.
#[async_trait]
pub trait WebhookTester {
    /// Loads and validates the config file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or fails validation.
    fn load_config(&mut self, path: &Path) -> AppResult<()>;

    /// Binds the callback receiver and resolves its reachable URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the bind fails or, in tunnel mode, when the
    /// credential is missing or no provider is wired in.
    async fn start_receiver(&mut self) -> AppResult<()>;

    /// Dispatches the full paced request sequence.
    ///
    /// # Errors
    ///
    /// Returns an error when the receiver never published its URL or the
    /// HTTP client cannot be built.
    async fn fire_requests(&mut self) -> AppResult<()>;

    /// Waits for callbacks until all arrive or the budget elapses.
    ///
    /// # Errors
    ///
    /// Returns an error when called before the earlier phases.
    async fn wait_for_results(&mut self) -> AppResult<WaitOutcome>;

    /// Computes metrics, writes the report, and tears the run down.
    ///
    /// # Errors
    ///
    /// Returns an error when a configured output cannot be written.
    async fn post_process(&mut self, outcome: WaitOutcome) -> AppResult<()>;
}

/// Drives a tester through the whole lifecycle for one config file.
///
/// # Errors
///
/// Propagates the first phase error; a timed-out wait is an outcome, not an
/// error.
pub async fn execute<T>(tester: &mut T, config_path: &Path) -> AppResult<WaitOutcome>
where
    T: WebhookTester + Send,
{
    tester.load_config(config_path)?;
    tester.start_receiver().await?;
    tester.fire_requests().await?;
    let outcome = tester.wait_for_results().await?;
    tester.post_process(outcome).await?;
    Ok(outcome)
}

/// Production [`WebhookTester`].
#[derive(Default)]
pub struct DefaultTester {
    tunnel: Option<Arc<dyn TunnelProvider>>,
    plan: Option<TestPlan>,
    tracker: Arc<Tracker>,
    completions: Option<CompletionSender>,
    coordinator: Option<WaitCoordinator>,
    receiver: Option<ReceiverHandle>,
    url_rx: Option<oneshot::Receiver<String>>,
    in_flight: Option<JoinSet<()>>,
}

impl DefaultTester {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires in a tunnel provider for `server: ngrok` configs.
    #[must_use]
    pub fn with_tunnel(provider: Arc<dyn TunnelProvider>) -> Self {
        Self {
            tunnel: Some(provider),
            ..Self::default()
        }
    }

    fn plan(&self) -> AppResult<&TestPlan> {
        self.plan
            .as_ref()
            .ok_or_else(|| AppError::config(ConfigError::NotLoaded))
    }
}

#[async_trait]
impl WebhookTester for DefaultTester {
    fn load_config(&mut self, path: &Path) -> AppResult<()> {
        let raw = config::load_config(path)?;
        let plan = config::validate_config(&raw)?;
        info!(
            test = %plan.name,
            iterations = plan.iterations,
            timeout = ?plan.timeout,
            "config loaded"
        );

        let expected = usize::try_from(plan.iterations).unwrap_or(usize::MAX);
        let (completions, coordinator) = WaitCoordinator::new(expected, plan.timeout);
        self.completions = Some(completions);
        self.coordinator = Some(coordinator);
        self.plan = Some(plan);
        Ok(())
    }

    async fn start_receiver(&mut self) -> AppResult<()> {
        let plan = self.plan()?;
        let completions = self
            .completions
            .clone()
            .ok_or_else(|| AppError::config(ConfigError::NotLoaded))?;

        let mode = receiver::resolve_mode(plan.server, self.tunnel.clone())?;
        let config = ReceiverConfig {
            port: plan.receiver_port,
            mode,
            picker: plan.correlation_picker.clone(),
        };
        let (handle, url_rx) =
            receiver::start_receiver(config, Arc::clone(&self.tracker), completions).await?;
        self.receiver = Some(handle);
        self.url_rx = Some(url_rx);
        Ok(())
    }

    async fn fire_requests(&mut self) -> AppResult<()> {
        let plan = self.plan()?.clone();
        let url_rx = self
            .url_rx
            .take()
            .ok_or_else(|| AppError::firer(FirerError::HandshakeClosed))?;
        let reply_url = url_rx
            .await
            .map_err(|_closed| AppError::firer(FirerError::HandshakeClosed))?;

        let in_flight = firer::fire_requests(&plan, &self.tracker, &reply_url).await?;
        self.in_flight = Some(in_flight);
        Ok(())
    }

    async fn wait_for_results(&mut self) -> AppResult<WaitOutcome> {
        let coordinator = self
            .coordinator
            .take()
            .ok_or_else(|| AppError::config(ConfigError::NotLoaded))?;
        let outcome = coordinator.wait_for_results().await;
        match outcome {
            WaitOutcome::Complete => info!("all callbacks received"),
            WaitOutcome::TimedOut { completed } => warn!(
                completed,
                "wait budget elapsed before all callbacks arrived"
            ),
        }
        Ok(outcome)
    }

    async fn post_process(&mut self, outcome: WaitOutcome) -> AppResult<()> {
        let plan = self.plan()?.clone();

        // The report covers the configured run window, not however long the
        // wait happened to take.
        let entries: Vec<TrackerEntry> = self.tracker.snapshot().into_values().collect();
        let metrics = compute_metrics(&entries, plan.run_duration);
        let report = render_report(&plan.name, &metrics, &outcome, plan.iterations);
        write_outputs(&plan.outputs, &report).await?;

        if let Some(handle) = self.receiver.take() {
            handle.shutdown().await;
        }
        // Unanswered requests are abandoned, not awaited; they already count
        // as timeouts in the report.
        if let Some(mut in_flight) = self.in_flight.take() {
            if !in_flight.is_empty() {
                debug!(remaining = in_flight.len(), "abandoning in-flight requests");
            }
            in_flight.abort_all();
        }
        Ok(())
    }
}
