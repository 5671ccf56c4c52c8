//! Turning an [`Action`] and a snapshot into an [`Intent`].
//!
//! Dispatch is a pure function: the same action against the same snapshot
//! always yields the same [`Outcome`], and nothing is sent anywhere.  The
//! [`Session`](crate::session::Session) executes whatever intent comes out.

use crate::action::{Action, ActionError, Intent};
use crate::locator::{find_focused, find_tab_group};
use crate::navigator::{self, Resolution};
use crate::tree::Snapshot;
use std::fmt;

/// Why an action resolved to nothing.  None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    NoFocus,
    NotInGroup,
    NoTarget,
    NoSuchTab { index: i64, count: usize },
}

impl fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoOpReason::NoFocus => write!(f, "nothing is focused"),
            NoOpReason::NotInGroup => write!(f, "not inside a tabbed or stacked container"),
            NoOpReason::NoTarget => write!(f, "no tab in that direction"),
            NoOpReason::NoSuchTab { index, count } => {
                write!(f, "there is no tab {} (group has {})", index, count)
            }
        }
    }
}

/// The decision for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Focus(Intent),
    NoOp(NoOpReason),
}

impl From<Resolution<'_>> for Outcome {
    fn from(resolution: Resolution<'_>) -> Self {
        match resolution {
            Resolution::Target(node) => Outcome::Focus(Intent::Container(node.id())),
            Resolution::NoFocus => Outcome::NoOp(NoOpReason::NoFocus),
            Resolution::NotInGroup => Outcome::NoOp(NoOpReason::NotInGroup),
            Resolution::NoTarget => Outcome::NoOp(NoOpReason::NoTarget),
            Resolution::NoSuchTab { index, count } => {
                Outcome::NoOp(NoOpReason::NoSuchTab { index, count })
            }
        }
    }
}

/// A binding that cannot be carried out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("unbound action: {0}")]
    Unbound(String),
    #[error("malformed action: {0}")]
    Malformed(#[from] ActionError),
    #[error("no binding for {0}")]
    NoBinding(String),
}

/// Decide what `action` means for `snapshot`.
///
/// `snapshot` may be `None` for actions that do not need one (see
/// [`Action::needs_snapshot`]); those that do resolve to
/// [`NoOpReason::NoFocus`] without it.
pub fn dispatch(action: &Action, snapshot: Option<&Snapshot>) -> Result<Outcome, DispatchError> {
    let outcome = match action {
        Action::Unbound(name) => return Err(DispatchError::Unbound(name.clone())),
        Action::Switch {
            direction,
            group: false,
        } => Outcome::Focus(Intent::Direction(*direction)),
        Action::Switch {
            direction,
            group: true,
        } => {
            let group = snapshot
                .and_then(find_focused)
                .and_then(|focused| focused.parent())
                .and_then(find_tab_group);
            match group {
                Some(group) => Outcome::Focus(Intent::GroupDirection {
                    group: group.id(),
                    direction: *direction,
                }),
                None => Outcome::Focus(Intent::Direction(*direction)),
            }
        }
        Action::SwitchTab { direction, wrap } => match snapshot {
            Some(snapshot) => navigator::step(snapshot, *direction, *wrap).into(),
            None => Outcome::NoOp(NoOpReason::NoFocus),
        },
        Action::SwitchToTab(n) => match snapshot {
            Some(snapshot) => navigator::select_nth(snapshot, *n).into(),
            None => Outcome::NoOp(NoOpReason::NoFocus),
        },
    };
    Ok(outcome)
}

/// Parse and dispatch a raw binding string in one go.
pub fn dispatch_str(action: &str, snapshot: Option<&Snapshot>) -> Result<Outcome, DispatchError> {
    let action = Action::parse(action)?;
    dispatch(&action, snapshot)
}
