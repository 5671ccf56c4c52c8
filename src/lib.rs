//! **i3switch**: tab-aware focus switching for i3 and sway.
//!
//! i3 can only move focus one step in a direction.  i3switch reads the
//! layout tree, finds the tabbed or stacked container the focused window
//! lives in and focuses a sibling tab by position: next, previous (optionally
//! wrapping around) or the n-th one.
//!
//! # Architecture
//!
//! The decision logic is pure and works on an immutable [`tree::Snapshot`]:
//!
//! * [`locator`] finds the focused node and the tab group around it.
//! * [`navigator`] picks the sibling to focus.
//! * [`dispatch`] maps a parsed [`action::Action`] onto one of those and
//!   returns what the window manager should be told.
//!
//! Everything with side effects sits behind two traits:
//!
//! * [`traits::WindowManager`]: fetches the tree and sends focus commands
//!   so the logic is not coupled to a specific IPC socket.
//! * [`traits::TriggerSource`]: delivers triggers (key combos or raw
//!   action strings) so the daemon loop is not coupled to a transport.
//!
//! Concrete implementations live in [`i3`] (i3/sway IPC) and [`ipc`]
//! (Unix-socket trigger listener).  [`session`] serialises the
//! fetch → dispatch → send sequence and [`daemon`] drives it.

pub mod action;
pub mod bindings;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod dispatch;
pub mod i3;
pub mod ipc;
pub mod locator;
pub mod navigator;
pub mod session;
pub mod traits;
pub mod tree;
