//! Callback receiver: accepts inbound webhook callbacks, resolves their
//! correlation ids against the tracker, and signals completions.

mod http;
pub mod tunnel;


use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::types::ServerMode;
use crate::error::{AppError, AppResult, ReceiverError};
use crate::locator::Locator;
use crate::tracker::Tracker;
use crate::wait::CompletionSender;

use http::{read_http_request, write_ack_response, write_error_response};
use tunnel::TunnelProvider;

/// Grace period granted to in-flight handlers after shutdown is requested.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// How the receiver is exposed to the tested service.
pub enum ReceiverMode {
    Local,
    Tunneled(Arc<dyn TunnelProvider>),
}

pub struct ReceiverConfig {
    pub port: u16,
    pub mode: ReceiverMode,
    pub picker: Locator,
}

/// Resolves the configured server mode into a receiver mode.
///
/// # Errors
///
/// Fails before any request is fired when the tunnel credential is missing
/// from the environment, or when `server: ngrok` is selected but no tunnel
/// provider is wired in.
pub fn resolve_mode(
    server: ServerMode,
    provider: Option<Arc<dyn TunnelProvider>>,
) -> AppResult<ReceiverMode> {
    match server {
        ServerMode::Local => Ok(ReceiverMode::Local),
        ServerMode::Ngrok => {
            tunnel::require_auth_token()?;
            provider.map(ReceiverMode::Tunneled).ok_or_else(|| {
                AppError::receiver(ReceiverError::TunnelProviderUnavailable)
            })
        }
    }
}

struct ReceiverState {
    picker: Locator,
    tracker: Arc<Tracker>,
    completions: CompletionSender,
}

/// Running receiver; dropping it without [`ReceiverHandle::shutdown`] leaves
/// the serving task to be reaped at runtime teardown.
pub struct ReceiverHandle {
    shutdown_tx: broadcast::Sender<()>,
    serve_task: JoinHandle<()>,
}

impl ReceiverHandle {
    /// Stops accepting connections, then waits for the serving task, which
    /// drains in-flight handlers for at most the grace period.
    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            debug!("receiver already stopped");
        }
        if let Err(err) = self.serve_task.await {
            warn!(error = %err, "receiver serve task ended abnormally");
        }
    }
}

/// Binds the receiver, spawns its serving task, and publishes the reachable
/// URL exactly once on the returned handshake channel.
///
/// # Errors
///
/// Returns an error when the local bind fails or the tunnel provider cannot
/// open a public endpoint.
pub async fn start_receiver(
    config: ReceiverConfig,
    tracker: Arc<Tracker>,
    completions: CompletionSender,
) -> AppResult<(ReceiverHandle, oneshot::Receiver<String>)> {
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = TcpListener::bind(&addr).await.map_err(|err| {
        AppError::receiver(ReceiverError::Bind { addr, source: err })
    })?;
    let local_addr = listener
        .local_addr()
        .map_err(|err| AppError::receiver(ReceiverError::LocalAddr { source: err }))?;

    let reachable_url = match &config.mode {
        ReceiverMode::Local => format!("http://{}/", local_addr),
        ReceiverMode::Tunneled(provider) => provider
            .open(local_addr)
            .await
            .map_err(|err| AppError::receiver(ReceiverError::Tunnel { source: err }))?,
    };

    let (url_tx, url_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let state = Arc::new(ReceiverState {
        picker: config.picker,
        tracker,
        completions,
    });
    let serve_task = tokio::spawn(serve(listener, state, shutdown_rx));

    if url_tx.send(reachable_url.clone()).is_err() {
        warn!("handshake receiver dropped before the URL was published");
    }
    info!(url = %reachable_url, "receiver listening");

    Ok((
        ReceiverHandle {
            shutdown_tx,
            serve_task,
        },
        url_rx,
    ))
}

async fn serve(
    listener: TcpListener,
    state: Arc<ReceiverState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut handlers = JoinSet::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((socket, peer)) => {
                    debug!(%peer, "callback connection accepted");
                    let state = Arc::clone(&state);
                    handlers.spawn(handle_connection(socket, state));
                }
                Err(err) => warn!(error = %err, "failed to accept callback connection"),
            },
            _shutdown = shutdown_rx.recv() => break,
        }
        // Reap finished handlers so the set does not grow with the run.
        while handlers.try_join_next().is_some() {}
    }

    drop(listener);
    info!("receiver shutting down; draining in-flight handlers");
    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while handlers.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        warn!("grace period elapsed; aborting remaining callback handlers");
        handlers.abort_all();
    }
}

async fn handle_connection(mut socket: TcpStream, state: Arc<ReceiverState>) {
    let request = match read_http_request(&mut socket).await {
        Ok(request) => request,
        Err(err) => {
            debug!(status = err.status, error = %err.message, "failed to read callback request");
            if let Err(write_err) = write_error_response(&mut socket, err.status, &err.message).await
            {
                debug!(error = %write_err, "failed to write error response");
            }
            return;
        }
    };

    debug!(method = %request.method, path = %request.path, "callback request");
    if request.method != "POST" {
        if let Err(write_err) =
            write_error_response(&mut socket, 405, "Only POST callbacks are accepted").await
        {
            debug!(error = %write_err, "failed to write error response");
        }
        return;
    }

    process_callback(&state, &request.body);

    // Acknowledged regardless of whether correlation succeeded.
    if let Err(write_err) = write_ack_response(&mut socket).await {
        debug!(error = %write_err, "failed to write callback acknowledgement");
    }
}

fn process_callback(state: &ReceiverState, body: &[u8]) {
    let tree = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("callback body is not a JSON object; ignoring");
            return;
        }
        Err(err) => {
            warn!(error = %err, "callback body failed to decode; ignoring");
            return;
        }
    };

    let Some(id) = state.picker.get(&tree).and_then(Value::as_str) else {
        warn!(
            path = state.picker.path(),
            "callback carries no correlation id at the picker path; ignoring"
        );
        return;
    };

    if state.tracker.record_end(id, Instant::now()) {
        debug!(correlation_id = id, "callback matched");
        state.completions.signal();
    } else {
        warn!(
            correlation_id = id,
            "callback for unknown or already-matched correlation id; ignoring"
        );
    }
}
