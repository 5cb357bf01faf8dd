use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::sleep;
use uuid::Uuid;

use crate::errors::{LauncherError, Result};
use crate::executor::{commands, CommandExecutor};
use crate::models::{OperationStatus, ProgressSnapshot, SessionInfo, TrackOutcome};

/// UI-side display surface for an operation in flight. The tag is used only
/// for cosmetic theming, never for session identity.
pub trait ProgressSink: Send + Sync {
    fn show(&self, tag: &str, message: &str);
    fn update(&self, progress: f64, message: &str);
    fn hide(&self);
}

/// Side effect invoked exactly once, after the terminal snapshot is observed
/// and before the sink is hidden.
pub type CompletionHook = Box<dyn FnOnce() + Send>;

#[derive(Clone, Debug)]
pub struct TrackRequest {
    pub command: String,
    pub args: Value,
    pub tag: String,
    pub initial_message: String,
    pub complete_message: String,
}

impl TrackRequest {
    pub fn new(command: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Value::Null,
            tag: tag.into(),
            initial_message: "Processing...".to_string(),
            complete_message: "Complete!".to_string(),
        }
    }

    pub fn args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    pub fn messages(
        mut self,
        initial_message: impl Into<String>,
        complete_message: impl Into<String>,
    ) -> Self {
        self.initial_message = initial_message.into();
        self.complete_message = complete_message.into();
        self
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    /// Cosmetic pause between the forced 100% update and hiding the sink.
    pub settle_delay: Duration,
    /// Consecutive empty progress reads tolerated before the session is
    /// declared stalled.
    pub stall_budget: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            settle_delay: Duration::from_millis(1000),
            stall_budget: 50,
        }
    }
}

struct ActiveSession {
    info: SessionInfo,
    cancel: watch::Sender<bool>,
}

/// Drives the start→poll→finish lifecycle for any long-running backend
/// command. At most one session may be active at a time; the registry
/// rejects concurrent `track` calls instead of letting two pollers race the
/// shared progress endpoint.
#[derive(Clone)]
pub struct ProgressTracker {
    executor: Arc<dyn CommandExecutor>,
    config: TrackerConfig,
    active: Arc<Mutex<Option<ActiveSession>>>,
}

impl ProgressTracker {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self::with_config(executor, TrackerConfig::default())
    }

    pub fn with_config(executor: Arc<dyn CommandExecutor>, config: TrackerConfig) -> Self {
        Self {
            executor,
            config,
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Issues `request.command`, then polls the shared progress endpoint
    /// until the operation reaches a terminal state. Each poll is fully
    /// awaited before the next is scheduled, so snapshots are observed in
    /// issue order.
    ///
    /// Terminates with exactly one of: `Ok(Completed)`, `Ok(Cancelled)`, or
    /// an error (initiation failure, poll failure, stall, or a backend
    /// failure status). The sink is hidden on every terminal path.
    pub async fn track(
        &self,
        request: TrackRequest,
        sink: Arc<dyn ProgressSink>,
        on_complete: Option<CompletionHook>,
    ) -> Result<TrackOutcome> {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let info = SessionInfo {
            session_id: Uuid::new_v4().to_string(),
            command: request.command.clone(),
            tag: request.tag.clone(),
            started_at: Utc::now().timestamp(),
        };

        {
            let mut guard = self.lock();
            if let Some(active) = guard.as_ref() {
                return Err(LauncherError::Busy(active.info.command.clone()));
            }
            *guard = Some(ActiveSession {
                info: info.clone(),
                cancel: cancel_tx,
            });
        }

        tracing::info!(
            "tracking {} session={} tag={}",
            request.command,
            info.session_id,
            request.tag
        );
        sink.show(&request.tag, &request.initial_message);

        let result = self
            .run_session(&request, sink.as_ref(), on_complete, cancel_rx)
            .await;

        *self.lock() = None;
        sink.hide();

        match &result {
            Ok(outcome) => tracing::info!(
                "{} session={} finished: {:?}",
                request.command,
                info.session_id,
                outcome
            ),
            Err(err) => tracing::error!(
                "{} session={} failed: {}",
                request.command,
                info.session_id,
                err
            ),
        }

        result
    }

    /// Requests cancellation of the active session, if any. Returns whether
    /// a session was signalled. Safe to call at any time; after the session
    /// has reached a terminal state this is a no-op.
    pub fn cancel_active(&self) -> bool {
        let guard = self.lock();
        match guard.as_ref() {
            Some(active) => {
                tracing::info!(
                    "cancel requested for {} session={}",
                    active.info.command,
                    active.info.session_id
                );
                active.cancel.send(true).is_ok()
            }
            None => false,
        }
    }

    pub fn active_session(&self) -> Option<SessionInfo> {
        self.lock().as_ref().map(|active| active.info.clone())
    }

    async fn run_session(
        &self,
        request: &TrackRequest,
        sink: &dyn ProgressSink,
        mut on_complete: Option<CompletionHook>,
        mut cancel_rx: watch::Receiver<bool>,
    ) -> Result<TrackOutcome> {
        self.executor
            .execute(&request.command, request.args.clone())
            .await?;
        tracing::debug!("{} accepted by backend, polling for progress", request.command);

        let mut empty_polls = 0u32;
        loop {
            tokio::select! {
                _ = cancel_rx.changed() => {
                    self.notify_backend_cancel(&request.command);
                    return Ok(TrackOutcome::Cancelled);
                }
                _ = sleep(self.config.poll_interval) => {}
            }

            let raw = self
                .executor
                .execute(commands::GET_UPDATE_PROGRESS, Value::Null)
                .await?;

            // Backends answer null or false while no snapshot exists yet;
            // anything that does not decode is a skipped tick, not an error.
            let snapshot: ProgressSnapshot = match serde_json::from_value(raw) {
                Ok(snapshot) => snapshot,
                Err(_) => {
                    empty_polls += 1;
                    tracing::debug!(
                        "no progress data received ({}/{})",
                        empty_polls,
                        self.config.stall_budget
                    );
                    if empty_polls >= self.config.stall_budget {
                        return Err(LauncherError::Stalled(empty_polls));
                    }
                    continue;
                }
            };
            empty_polls = 0;
            if !snapshot.active {
                if snapshot.status == Some(OperationStatus::Failure) {
                    let message = if snapshot.message.is_empty() {
                        request.command.clone()
                    } else {
                        snapshot.message
                    };
                    return Err(LauncherError::Operation(message));
                }

                sink.update(100.0, &request.complete_message);
                if let Some(hook) = on_complete.take() {
                    hook();
                }
                sleep(self.config.settle_delay).await;
                return Ok(TrackOutcome::Completed);
            }

            sink.update(snapshot.progress, &snapshot.message);
        }
    }

    /// Best-effort backend notification; delivery success or failure is
    /// logged and never surfaced to the caller of `track`.
    fn notify_backend_cancel(&self, command: &str) {
        let executor = self.executor.clone();
        let command = command.to_string();
        tokio::spawn(async move {
            match executor.execute(commands::CANCEL_UPDATE, Value::Null).await {
                Ok(_) => tracing::info!("cancel delivered to backend for {}", command),
                Err(err) => tracing::warn!("failed to deliver cancel for {}: {}", command, err),
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
