//! Start, notify and shutdown for a long-lived network listener.
//!
//! [`NetworkService`] wraps an actix-web [`Server`] built by a factory from a
//! listener the wrapper binds itself. Both the credential authority and the
//! gateway run through it.
//!
//! ```text
//! Created -> Listening -> Draining -> Stopped
//!                      \-> Failed
//! ```
//!
//! The terminal event (clean stop or failure) is delivered exactly once on a
//! single-slot channel obtained from [`NetworkService::notify`].

use std::future::Future;
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{Server, ServerHandle};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How long a forced stop may take before the serve task is abandoned.
const FORCED_STOP_GRACE: Duration = Duration::from_secs(5);

/// Builds the server around a bound listener.
pub type ServerFactory = Box<dyn FnOnce(TcpListener) -> io::Result<Server> + Send>;

/// Terminal event delivered through [`NetworkService::notify`].
pub type TerminalEvent = Result<(), LifecycleError>;

/// Observable listener state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Created,
    Listening,
    Draining,
    Stopped,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("{service}: failed to bind {addr}: {source}")]
    Bind {
        service: &'static str,
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("{service}: server failed: {message}")]
    Serve {
        service: &'static str,
        message: String,
    },
    #[error("{service}: already started")]
    AlreadyStarted { service: &'static str },
    #[error("{service}: graceful drain exceeded {timeout:?}; listener force-stopped")]
    DeadlineExceeded {
        service: &'static str,
        timeout: Duration,
    },
}

/// Listener wrapper shared by both services.
pub struct NetworkService {
    name: &'static str,
    addr: SocketAddr,
    factory: Option<ServerFactory>,
    state: Arc<watch::Sender<ListenerState>>,
    notify_tx: Option<oneshot::Sender<TerminalEvent>>,
    notify_rx: Option<oneshot::Receiver<TerminalEvent>>,
    handle: Option<ServerHandle>,
    task: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl NetworkService {
    /// Prepare a service that will listen on `addr`. Nothing is bound until
    /// [`start`](Self::start).
    pub fn new(name: &'static str, addr: SocketAddr, factory: ServerFactory) -> Self {
        let (state, _) = watch::channel(ListenerState::Created);
        let (notify_tx, notify_rx) = oneshot::channel();
        Self {
            name,
            addr,
            factory: Some(factory),
            state: Arc::new(state),
            notify_tx: Some(notify_tx),
            notify_rx: Some(notify_rx),
            handle: None,
            task: None,
            local_addr: None,
        }
    }

    pub fn state(&self) -> ListenerState {
        *self.state.borrow()
    }

    /// Receiver that follows every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ListenerState> {
        self.state.subscribe()
    }

    /// Address actually bound, once listening. Useful with port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Take the terminal-event channel. Only the first call returns it.
    pub fn notify(&mut self) -> Option<oneshot::Receiver<TerminalEvent>> {
        self.notify_rx.take()
    }

    fn transition(&self, next: ListenerState) {
        let name = self.name;
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            info!(service = name, from = ?*current, to = ?next, "listener state changed");
            *current = next;
            true
        });
    }

    fn fail(&mut self, failure: LifecycleError) {
        error!(service = self.name, error = %failure, "listener failed");
        self.transition(ListenerState::Failed);
        if let Some(tx) = self.notify_tx.take() {
            let _ = tx.send(Err(failure));
        }
    }

    /// Bind and begin serving on a background task. Returns immediately.
    ///
    /// Bind and build failures are not returned here; they move the service
    /// to [`ListenerState::Failed`] and arrive on the notify channel.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::AlreadyStarted`] on a second call.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        let service = self.name;
        let Some(factory) = self.factory.take() else {
            return Err(LifecycleError::AlreadyStarted { service });
        };

        let listener = match TcpListener::bind(self.addr) {
            Ok(listener) => listener,
            Err(source) => {
                self.fail(LifecycleError::Bind {
                    service,
                    addr: self.addr,
                    source,
                });
                return Ok(());
            }
        };
        self.local_addr = listener.local_addr().ok();

        let server = match factory(listener) {
            Ok(server) => server,
            Err(err) => {
                self.fail(LifecycleError::Serve {
                    service,
                    message: err.to_string(),
                });
                return Ok(());
            }
        };

        self.handle = Some(server.handle());
        self.transition(ListenerState::Listening);
        info!(service, addr = ?self.local_addr, "listening");

        let state = Arc::clone(&self.state);
        let notify_tx = self.notify_tx.take();
        self.task = Some(tokio::spawn(async move {
            let outcome = server.await;
            let event = match outcome {
                Ok(()) => {
                    state.send_if_modified(|current| {
                        let external_stop = *current == ListenerState::Listening;
                        if external_stop {
                            *current = ListenerState::Stopped;
                        }
                        external_stop
                    });
                    Ok(())
                }
                Err(err) => {
                    error!(service, error = %err, "server loop exited with an error");
                    state.send_if_modified(|current| {
                        let failed = *current == ListenerState::Listening;
                        if failed {
                            *current = ListenerState::Failed;
                        }
                        failed
                    });
                    Err(LifecycleError::Serve {
                        service,
                        message: err.to_string(),
                    })
                }
            };
            if let Some(tx) = notify_tx {
                let _ = tx.send(event);
            }
        }));
        Ok(())
    }

    /// Stop accepting, let in-flight requests finish, and force-stop once
    /// `timeout` has elapsed. Calls after the first are no-ops.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::DeadlineExceeded`] when the drain had to be cut
    /// short.
    pub async fn shutdown(&mut self, timeout: Duration) -> Result<(), LifecycleError> {
        let service = self.name;
        let Some(handle) = self.handle.take() else {
            if self.state() == ListenerState::Created {
                self.transition(ListenerState::Stopped);
            }
            return Ok(());
        };

        if self.state() == ListenerState::Listening {
            self.transition(ListenerState::Draining);
        }
        info!(service, ?timeout, "draining listener");

        let result = match tokio::time::timeout(timeout, handle.stop(true)).await {
            Ok(()) => Ok(()),
            Err(_) => {
                warn!(service, ?timeout, "drain deadline exceeded; forcing stop");
                handle.stop(false).await;
                Err(LifecycleError::DeadlineExceeded { service, timeout })
            }
        };

        if let Some(task) = self.task.take() {
            match tokio::time::timeout(FORCED_STOP_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!(service, error = %err, "serve task panicked"),
                Err(_) => error!(service, "serve task did not finish after stop"),
            }
        }

        if self.state() != ListenerState::Failed {
            self.transition(ListenerState::Stopped);
        }
        info!(service, "listener stopped");
        result
    }
}

/// Resolve on SIGINT or SIGTERM.
///
/// # Errors
///
/// Fails when the signal handlers cannot be installed.
pub async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Race `signal` against the service's terminal event, then shut down once.
///
/// `before_drain` runs after the race and before shutdown begins. A listener
/// failure takes precedence over a shutdown error in the returned result.
///
/// # Errors
///
/// The listener failure, or the shutdown error.
pub async fn run_until<S>(
    service: &mut NetworkService,
    signal: S,
    timeout: Duration,
    before_drain: impl FnOnce(),
) -> Result<(), LifecycleError>
where
    S: Future<Output = ()>,
{
    let name = service.name;
    let mut failure = None;
    match service.notify() {
        Some(notify) => {
            tokio::select! {
                () = signal => info!(service = name, "termination requested"),
                event = notify => match event {
                    Ok(Ok(())) => info!(service = name, "listener stopped on its own"),
                    Ok(Err(err)) => failure = Some(err),
                    Err(_) => warn!(service = name, "notify channel closed without an event"),
                },
            }
        }
        None => signal.await,
    }

    before_drain();
    let shutdown = service.shutdown(timeout).await;
    match failure {
        Some(err) => Err(err),
        None => shutdown,
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
