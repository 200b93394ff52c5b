//! Timeout-bounded completion coordinator.
//!
//! The receiver signals one unit per matched callback; the coordinator
//! counts units against the number of fired requests and races the count
//! against the configured wait budget.

use std::time::Duration;

use tokio::sync::mpsc;


/// How a wait ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Every fired request was matched by a callback in time.
    Complete,
    /// The budget elapsed first; `completed` callbacks had arrived by then.
    TimedOut { completed: usize },
}

impl WaitOutcome {
    #[must_use]
    pub fn is_timed_out(&self) -> bool {
        matches!(self, WaitOutcome::TimedOut { .. })
    }
}

/// Sender half handed to the receiver; one signal per matched callback.
#[derive(Clone, Debug)]
pub struct CompletionSender {
    tx: mpsc::UnboundedSender<()>,
}

impl CompletionSender {
    pub fn signal(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("completion signal dropped; coordinator already finished");
        }
    }
}

/// Blocks the run until all fired requests are matched or a timeout elapses.
#[derive(Debug)]
pub struct WaitCoordinator {
    rx: mpsc::UnboundedReceiver<()>,
    expected: usize,
    timeout: Duration,
}

impl WaitCoordinator {
    #[must_use]
    pub fn new(expected: usize, timeout: Duration) -> (CompletionSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            CompletionSender { tx },
            Self {
                rx,
                expected,
                timeout,
            },
        )
    }

    /// Waits for `expected` completion signals, racing against the timeout.
    ///
    /// Timing out abandons nothing: in-flight requests and the receiver keep
    /// running, and the caller decides what to do with the partial result.
    pub async fn wait_for_results(mut self) -> WaitOutcome {
        if self.expected == 0 {
            return WaitOutcome::Complete;
        }

        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);

        let mut completed = 0usize;
        loop {
            tokio::select! {
                received = self.rx.recv() => match received {
                    Some(()) => {
                        completed = completed.saturating_add(1);
                        if completed >= self.expected {
                            return WaitOutcome::Complete;
                        }
                    }
                    // All senders gone; nothing more can complete, so run
                    // out the remaining budget and report what arrived.
                    None => {
                        deadline.as_mut().await;
                        return WaitOutcome::TimedOut { completed };
                    }
                },
                () = deadline.as_mut() => return WaitOutcome::TimedOut { completed },
            }
        }
    }
}
