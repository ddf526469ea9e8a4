//! Client-side polling watcher: turns the pull protocol into a chat feed.
//!
//! `ChatWatcher` is the only non-trivial client logic: it joins once,
//! then polls `read` on a fixed interval and forwards visible lines to a
//! display channel. The server transport is a port (`ChatTransport`) so
//! the watcher can run against the HTTP adapter in `gabble-api` or a
//! mock in tests. Cancellation is explicit via a `CancellationToken`:
//! on stop the watcher sends exactly one leave and terminates regardless
//! of the response.

use std::future::Future;
use std::time::Duration;

use gabble_types::error::TransportError;
use gabble_types::session::SessionToken;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Time between polls. The protocol tolerates any interval; two seconds
/// keeps the feed responsive without hammering the server.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Client-side port over the chat protocol.
///
/// Implementations live outside the core (e.g. `HttpChatTransport` in
/// `gabble-api`). Uses native async fn in traits (RPITIT, Rust 2024
/// edition); the watcher is generic over the implementation.
pub trait ChatTransport: Send + Sync {
    /// Ask to join; yields the identity token on acceptance.
    fn join(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<SessionToken, TransportError>> + Send;

    /// Post a message. `Ok(false)` means the server answered `no`.
    fn post(
        &self,
        name: &str,
        token: SessionToken,
        text: &str,
    ) -> impl Future<Output = Result<bool, TransportError>> + Send;

    /// Fetch everything visible since the last read (may be empty).
    fn read(
        &self,
        name: &str,
        token: SessionToken,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Announce departure. `Ok(false)` means the server answered `no`.
    fn leave(
        &self,
        name: &str,
        token: SessionToken,
    ) -> impl Future<Output = Result<bool, TransportError>> + Send;
}

/// How the polling loop ended.
#[derive(Debug, PartialEq, Eq)]
pub enum WatcherExit {
    /// Stopped by cancellation; a leave was sent.
    Left,
    /// A transport error ended the loop; a diagnostic line was emitted.
    Failed,
}

/// The periodic-poll loop for one logged-in user.
///
/// Constructed by [`ChatWatcher::join`], which performs the one join
/// attempt (no retry on rejection). The token is set once there and
/// read-only for the loop's lifetime.
pub struct ChatWatcher<T: ChatTransport> {
    transport: T,
    name: String,
    token: SessionToken,
    interval: Duration,
    display: mpsc::Sender<String>,
    cancel: CancellationToken,
}

impl<T: ChatTransport> ChatWatcher<T> {
    /// Send the single join request and build the watcher on acceptance.
    ///
    /// A rejection or transport error fails the client immediately;
    /// there is no retry on join failure.
    pub async fn join(
        transport: T,
        name: impl Into<String>,
        display: mpsc::Sender<String>,
    ) -> Result<Self, TransportError> {
        let name = name.into();
        let token = transport.join(&name).await?;
        info!(%name, "joined the chat group");
        Ok(Self {
            transport,
            name,
            token,
            interval: DEFAULT_POLL_INTERVAL,
            display,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// The identity token issued at join, for use by a sender alongside
    /// the watcher (e.g. the CLI's post pump).
    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Handle for stopping the loop deterministically.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Poll until cancelled or the transport fails.
    ///
    /// Each cycle sleeps the interval, issues one read, and forwards the
    /// returned lines -- except those beginning with `(<own name>)`,
    /// which were already echoed locally at send time. That suppression
    /// is display de-duplication only; the server-side log still holds
    /// the lines.
    pub async fn run(self) -> WatcherExit {
        let own_prefix = format!("({})", self.name);
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return self.depart().await,
                _ = tokio::time::sleep(self.interval) => {}
            }

            match self.transport.read(&self.name, self.token).await {
                Ok(batch) => {
                    debug!(name = %self.name, bytes = batch.len(), "poll complete");
                    for line in batch.lines() {
                        if line.is_empty() || line.starts_with(&own_prefix) {
                            continue;
                        }
                        if self.display.send(line.to_string()).await.is_err() {
                            // Display gone; treat like a stop request.
                            return self.depart().await;
                        }
                    }
                }
                Err(e) => {
                    warn!(name = %self.name, error = %e, "poll failed, stopping watcher");
                    let _ = self
                        .display
                        .send(format!("server error: watching stopped ({e})"))
                        .await;
                    return WatcherExit::Failed;
                }
            }
        }
    }

    /// Send exactly one leave and exit, regardless of its response.
    async fn depart(&self) -> WatcherExit {
        if let Err(e) = self.transport.leave(&self.name, self.token).await {
            warn!(name = %self.name, error = %e, "leave failed during shutdown");
        }
        WatcherExit::Left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Scripted transport: pops one read result per poll, counts leaves.
    #[derive(Clone)]
    struct ScriptedTransport {
        reject_join: bool,
        reads: Arc<Mutex<VecDeque<Result<String, TransportError>>>>,
        leaves: Arc<AtomicUsize>,
    }

    impl ScriptedTransport {
        fn new(reads: Vec<Result<String, TransportError>>) -> Self {
            Self {
                reject_join: false,
                reads: Arc::new(Mutex::new(reads.into_iter().collect())),
                leaves: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn rejecting() -> Self {
            let mut t = Self::new(Vec::new());
            t.reject_join = true;
            t
        }

        fn leave_count(&self) -> usize {
            self.leaves.load(Ordering::SeqCst)
        }
    }

    impl ChatTransport for ScriptedTransport {
        async fn join(&self, _name: &str) -> Result<SessionToken, TransportError> {
            if self.reject_join {
                Err(TransportError::Rejected)
            } else {
                Ok(SessionToken(7))
            }
        }

        async fn post(
            &self,
            _name: &str,
            _token: SessionToken,
            _text: &str,
        ) -> Result<bool, TransportError> {
            Ok(true)
        }

        async fn read(
            &self,
            _name: &str,
            _token: SessionToken,
        ) -> Result<String, TransportError> {
            self.reads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }

        async fn leave(
            &self,
            _name: &str,
            _token: SessionToken,
        ) -> Result<bool, TransportError> {
            self.leaves.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_join_rejection_fails_without_retry() {
        let (tx, _rx) = mpsc::channel(4);
        let result = ChatWatcher::join(ScriptedTransport::rejecting(), "alice", tx).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_forwards_foreign_lines_and_suppresses_own() {
        let transport =
            ScriptedTransport::new(vec![Ok("(alice) hi\n(bob) already echoed\n".to_string())]);
        let (tx, mut rx) = mpsc::channel(16);
        let watcher = ChatWatcher::join(transport.clone(), "bob", tx).await.unwrap();
        let cancel = watcher.cancel_token();
        let handle = tokio::spawn(watcher.run());

        assert_eq!(rx.recv().await.unwrap(), "(alice) hi");
        cancel.cancel();
        assert_eq!(handle.await.unwrap(), WatcherExit::Left);
        // Only the foreign line came through.
        assert!(rx.try_recv().is_err());
        assert_eq!(transport.leave_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_sends_exactly_one_leave() {
        let transport = ScriptedTransport::new(Vec::new());
        let (tx, _rx) = mpsc::channel(4);
        let watcher = ChatWatcher::join(transport.clone(), "alice", tx).await.unwrap();
        let cancel = watcher.cancel_token();
        let handle = tokio::spawn(watcher.run());

        cancel.cancel();
        assert_eq!(handle.await.unwrap(), WatcherExit::Left);
        assert_eq!(transport.leave_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_emits_diagnostic_and_stops() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Failed(
            "connection reset".to_string(),
        ))]);
        let (tx, mut rx) = mpsc::channel(4);
        let watcher = ChatWatcher::join(transport.clone(), "alice", tx).await.unwrap();
        let exit = watcher.run().await;

        assert_eq!(exit, WatcherExit::Failed);
        let diagnostic = rx.recv().await.unwrap();
        assert!(diagnostic.contains("watching stopped"));
        // A fatal poll is not a departure; no leave is sent.
        assert_eq!(transport.leave_count(), 0);
    }
}
