//! The daemon loop: triggers in, focus changes out.
//!
//! Trigger sources run on their own threads and feed one channel; the loop
//! drains it on a single thread, so triggers are handled strictly one after
//! another.  A failing trigger is logged and dropped; the next one is
//! handled as usual.

use crate::bindings::{BindingRegistry, Trigger};
use crate::dispatch::Outcome;
use crate::session::{Session, SessionError};
use crate::traits::WindowManager;
use log::{debug, error, info, warn};
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// How often the loop checks for shutdown while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Cooperative shutdown flag shared by the loop, the trigger sources and
/// the signal handler.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken(Arc<AtomicBool>);

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown.  Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Cancels a [`ShutdownToken`] on SIGINT or SIGTERM.
///
/// The watcher thread is stopped when the guard is dropped.
pub struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SignalGuard {
    pub fn install(token: ShutdownToken) -> std::io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            if let Some(signal) = signals.forever().next() {
                info!("signal {} received, shutting down", signal);
                token.cancel();
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Resolve and run a single trigger, logging any failure.
///
/// Returns the outcome, or `None` when the trigger could not be carried out.
pub fn handle_trigger<W: WindowManager>(
    session: &Session<W>,
    registry: &BindingRegistry,
    trigger: &Trigger,
) -> Option<Outcome> {
    let action = match registry.resolve(trigger) {
        Ok(action) => action,
        Err(e) => {
            warn!("{:?}: {}", trigger, e);
            return None;
        }
    };
    debug!("{:?} -> {}", trigger, action);
    match session.handle(&action) {
        Ok(outcome) => Some(outcome),
        Err(SessionError::Dispatch(e)) => {
            warn!("{:?}: {}", trigger, e);
            None
        }
        Err(e @ SessionError::WindowManager(_)) => {
            error!("{}: {}", action, e);
            None
        }
    }
}

/// Handle triggers until every source has hung up or `shutdown` is
/// cancelled.  Returns the number of triggers received.
pub fn run<W: WindowManager>(
    session: &Session<W>,
    registry: &BindingRegistry,
    triggers: &mpsc::Receiver<Trigger>,
    shutdown: &ShutdownToken,
) -> usize {
    let mut received = 0;
    while !shutdown.is_cancelled() {
        match triggers.recv_timeout(POLL_INTERVAL) {
            Ok(trigger) => {
                received += 1;
                handle_trigger(session, registry, &trigger);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                info!("all trigger sources closed");
                return received;
            }
        }
    }
    info!("shutdown requested");
    received
}

//  Tests
