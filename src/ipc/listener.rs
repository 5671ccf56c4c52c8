//! Unix-socket [`TriggerSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Trigger`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"Combo":"Mod4+Tab"}
//! {"Action":"switch_tab next wrap"}
//! {"Action":"switch_to_tab 3"}
//! ```
//!
//! An i3 binding can deliver a trigger with e.g.
//! `bindsym Mod4+Tab exec echo '{"Combo":"Mod4+Tab"}' | socat - UNIX-CONNECT:$XDG_RUNTIME_DIR/i3switch.sock`.

use crate::bindings::Trigger;
use crate::daemon::ShutdownToken;
use crate::traits::TriggerSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`TriggerSource`] that listens on a Unix stream socket for
/// JSON-encoded triggers.
///
/// Each accepted connection is served on its own thread and can send
/// multiple newline-delimited triggers, so an idle client never holds up
/// the others.
pub struct UnixSocketListener {
    path: PathBuf,
    shutdown: ShutdownToken,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is in use by another running daemon")]
    InUse(PathBuf),
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](TriggerSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            shutdown: ShutdownToken::new(),
        }
    }

    /// Stop forwarding triggers once `token` is cancelled.
    pub fn with_shutdown(mut self, token: ShutdownToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Remove a socket file left behind by a daemon that is gone.  A socket
    /// that still accepts connections is left alone.
    fn clear_stale_socket(&self) -> Result<(), UnixSocketError> {
        if !self.path.exists() {
            return Ok(());
        }
        if UnixStream::connect(&self.path).is_ok() {
            return Err(UnixSocketError::InUse(self.path.clone()));
        }
        debug!("removing stale socket {}", self.path.display());
        std::fs::remove_file(&self.path)?;
        Ok(())
    }
}

/// Forward every trigger read from one client connection.
fn serve(stream: UnixStream, sink: &mpsc::Sender<Trigger>, shutdown: &ShutdownToken) {
    debug!("client connected");
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        match line {
            Ok(ref text) if text.trim().is_empty() => continue,
            Ok(text) => match serde_json::from_str::<Trigger>(&text) {
                Ok(trigger) => {
                    if shutdown.is_cancelled() {
                        info!("shutting down, dropping {:?}", trigger);
                        return;
                    }
                    debug!("received {:?}", trigger);
                    if sink.send(trigger).is_err() {
                        info!("sink closed, dropping client");
                        return;
                    }
                }
                Err(e) => {
                    error!("bad trigger: {} ({})", text, e);
                }
            },
            Err(e) => {
                error!("read error: {}", e);
                break;
            }
        }
    }
    debug!("client disconnected");
}

impl TriggerSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks**.  Run it on a dedicated thread.  The socket
    /// file is removed once the shutdown token stops it.
    fn run(&mut self, sink: mpsc::Sender<Trigger>) -> Result<(), Self::Error> {
        self.clear_stale_socket()?;

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            if self.shutdown.is_cancelled() {
                break;
            }
            match stream {
                Ok(stream) => {
                    let sink = sink.clone();
                    let shutdown = self.shutdown.clone();
                    std::thread::spawn(move || serve(stream, &sink, &shutdown));
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

//  Tests
