//! [`WindowManager`] implementation backed by i3 (or sway) IPC.
//!
//! One connection is opened up front and reused; it is reopened after an
//! I/O failure.  The [`Session`](crate::session::Session) makes sure only one request is
//! in flight on it at a time.

use super::ipc::{self, FrameError, MessageType};
use crate::action::Direction;
use crate::traits::WindowManager;
use crate::tree::{ConId, Snapshot, SnapshotError};
use log::{debug, warn};
use serde::Deserialize;
use std::cell::RefCell;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::Command;

/// i3-backed window manager.
///
/// The connection is reopened once when a request fails with an I/O error,
/// so the daemon survives an i3 `restart`.
pub struct I3Wm {
    /// Where to reconnect.  `None` for streams handed in by the caller.
    path: Option<PathBuf>,
    stream: RefCell<Option<UnixStream>>,
}

/// Errors that can occur when talking to i3.
#[derive(Debug, thiserror::Error)]
pub enum I3Error {
    #[error("no i3 or sway socket found (set I3SOCK or SWAYSOCK)")]
    NoSocket,
    #[error("connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("i3 IPC error: {0}")]
    Frame(#[from] FrameError),
    #[error("bad reply: {0}")]
    Reply(#[from] serde_json::Error),
    #[error("bad tree: {0}")]
    Tree(#[from] SnapshotError),
    #[error("connection to i3 is closed")]
    Disconnected,
    #[error("command {command:?} failed: {reason}")]
    CommandFailed { command: String, reason: String },
}

//  Socket discovery

/// Resolve the IPC socket: `$I3SOCK`, `$SWAYSOCK`, then
/// `i3 --get-socketpath`.
pub fn socket_path() -> Result<PathBuf, I3Error> {
    ["I3SOCK", "SWAYSOCK"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .or_else(|| ask_for_socket_path("i3"))
        .map(PathBuf::from)
        .ok_or(I3Error::NoSocket)
}

fn ask_for_socket_path(executable: &str) -> Option<String> {
    let output = Command::new(executable).arg("--get-socketpath").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8(output.stdout).ok()?;
    let path = path.trim();
    (!path.is_empty()).then(|| path.to_string())
}

fn open(path: &Path) -> Result<UnixStream, I3Error> {
    let stream = UnixStream::connect(path).map_err(|source| I3Error::Connect {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("connected to {}", path.display());
    Ok(stream)
}

//  Minimal serde structs for the JSON we care about

/// One entry of the `RUN_COMMAND` reply array.
#[derive(Deserialize)]
struct CommandReply {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

impl I3Wm {
    /// Connect to the running window manager.
    pub fn connect() -> Result<Self, I3Error> {
        Self::connect_to(&socket_path()?)
    }

    pub fn connect_to(path: &Path) -> Result<Self, I3Error> {
        let stream = open(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            stream: RefCell::new(Some(stream)),
        })
    }

    /// Wrap an already connected stream.  It is not reopened on failure.
    pub fn from_stream(stream: UnixStream) -> Self {
        Self {
            path: None,
            stream: RefCell::new(Some(stream)),
        }
    }

    /// Send one request, reconnecting and retrying once if the connection
    /// turns out to be dead.
    fn request(&self, msg_type: MessageType, payload: &str) -> Result<String, I3Error> {
        match self.try_request(msg_type, payload) {
            Err(I3Error::Frame(FrameError::Io(e))) if self.path.is_some() => {
                warn!("i3 connection lost ({}), reconnecting", e);
                self.try_request(msg_type, payload)
            }
            result => result,
        }
    }

    fn try_request(&self, msg_type: MessageType, payload: &str) -> Result<String, I3Error> {
        let mut slot = self.stream.borrow_mut();
        if slot.is_none() {
            if let Some(path) = &self.path {
                *slot = Some(open(path)?);
            }
        }
        let mut stream: &UnixStream = match slot.as_ref() {
            Some(stream) => stream,
            None => return Err(I3Error::Disconnected),
        };
        let result = ipc::request(&mut stream, msg_type, payload);
        if let Err(FrameError::Io(_)) = result {
            *slot = None;
        }
        Ok(result?)
    }

    /// Run an i3 command and check every reply entry for success.
    fn command(&self, command: &str) -> Result<(), I3Error> {
        debug!("command: {}", command);
        let reply = self.request(MessageType::RunCommand, command)?;
        let replies: Vec<CommandReply> = serde_json::from_str(&reply)?;
        match replies.into_iter().find(|r| !r.success) {
            Some(failed) => Err(I3Error::CommandFailed {
                command: command.to_string(),
                reason: failed.error.unwrap_or_else(|| "unknown error".into()),
            }),
            None => Ok(()),
        }
    }
}

//  WindowManager implementation

impl WindowManager for I3Wm {
    type Error = I3Error;

    fn fetch_tree(&self) -> Result<Snapshot, I3Error> {
        let json = self.request(MessageType::GetTree, "")?;
        Ok(Snapshot::from_json(&json)?)
    }

    fn focus_by_id(&self, id: ConId) -> Result<(), I3Error> {
        self.command(&format!("[con_id={}] focus", id))
    }

    fn focus_direction(&self, direction: Direction) -> Result<(), I3Error> {
        self.command(&format!("focus {}", direction))
    }
}
