//! i3-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`WindowManager`](crate::traits::WindowManager) trait, powered by the i3
//! IPC socket.  sway implements the same protocol and works unchanged.
//!
//! Nothing outside this module should reference i3 IPC directly.

pub mod ipc;
pub mod wm;
