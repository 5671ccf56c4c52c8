//! IPC listener that accepts hotkey triggers over a Unix socket.
//!
//! Key bindings (in i3's own config, or any hotkey daemon) connect to the
//! socket and send newline-delimited JSON triggers.

pub mod listener;
