//! Core traits that decouple i3switch from any specific window manager or
//! trigger transport.
//!
//! Every concrete backend (i3/sway IPC, a Unix-socket listener, a test
//! harness, …) implements one of these traits.  The
//! [`Session`](crate::session::Session) and the daemon loop only depend on
//! these abstractions.

use crate::action::Direction;
use crate::bindings::Trigger;
use crate::tree::{ConId, Snapshot};
use std::sync::mpsc;

/// Abstraction over a window manager that reports its container tree and
/// moves focus.
///
/// An implementation might talk to i3 via IPC, or it might be a recording
/// stub used in tests.
pub trait WindowManager {
    /// The error type produced by this window manager.
    type Error: std::error::Error + Send + 'static;

    /// Fetch a fresh snapshot of the whole container tree.
    fn fetch_tree(&self) -> Result<Snapshot, Self::Error>;

    /// Give input focus to the container with the given id.
    fn focus_by_id(&self, id: ConId) -> Result<(), Self::Error>;

    /// Move focus geometrically.
    fn focus_direction(&self, direction: Direction) -> Result<(), Self::Error>;
}

/// A source of [`Trigger`]s.
///
/// Implementations listen on some transport (a Unix socket, a hotkey
/// grabber, an in-memory channel) and forward every trigger into the
/// provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](TriggerSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received trigger must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait TriggerSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Trigger`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Trigger>) -> Result<(), Self::Error>;
}
