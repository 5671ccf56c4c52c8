//! The orchestrator that ties actions, snapshots and the window manager
//! together.
//!
//! [`Session`] owns the window-manager connection behind a mutex.  Each
//! call to [`Session::handle`] holds the lock for the whole
//! fetch → decide → send sequence, so concurrent callers queue up instead of
//! acting on a tree another sequence has already changed.

use crate::action::{Action, FocusCommand};
use crate::dispatch::{dispatch, DispatchError, Outcome};
use crate::traits::WindowManager;
use log::{debug, info};
use std::sync::{Mutex, PoisonError};

/// Possible errors from the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The window manager returned an error.  The action is skipped, not
    /// retried.
    #[error("window manager error: {0}")]
    WindowManager(String),
    /// The action itself cannot be carried out.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// A window-manager connection shared by every trigger.
///
/// # Typical usage
///
/// ```ignore
/// let session = Session::new(I3Wm::connect()?);
/// session.handle(&Action::parse("switch_tab next wrap")?)?;
/// ```
pub struct Session<W: WindowManager> {
    wm: Mutex<W>,
}

impl<W: WindowManager> Session<W> {
    pub fn new(wm: W) -> Self {
        Self { wm: Mutex::new(wm) }
    }

    /// Run one action: fetch a fresh snapshot if the action needs one,
    /// decide, and send the resulting focus commands.
    ///
    /// No-op outcomes are returned as `Ok`; only transport failures and
    /// unbound actions are errors.
    pub fn handle(&self, action: &Action) -> Result<Outcome, SessionError> {
        // A panic in another sequence leaves nothing half-updated on our
        // side; the connection is still usable.
        let wm = self.wm.lock().unwrap_or_else(PoisonError::into_inner);

        let snapshot = if action.needs_snapshot() {
            let snapshot = wm
                .fetch_tree()
                .map_err(|e| SessionError::WindowManager(e.to_string()))?;
            debug!("fetched tree with {} containers", snapshot.len());
            Some(snapshot)
        } else {
            None
        };

        let outcome = dispatch(action, snapshot.as_ref())?;
        match outcome {
            Outcome::Focus(intent) => {
                for command in intent.commands() {
                    info!("{}: {:?}", action, command);
                    let sent = match command {
                        FocusCommand::Id(id) => wm.focus_by_id(id),
                        FocusCommand::Direction(direction) => wm.focus_direction(direction),
                    };
                    sent.map_err(|e| SessionError::WindowManager(e.to_string()))?;
                }
            }
            Outcome::NoOp(reason) => info!("{}: nothing to do, {}", action, reason),
        }
        Ok(outcome)
    }

    /// Consume the session and return the window manager.
    pub fn into_inner(self) -> W {
        self.wm.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

//  Tests
