//! Cycling through the children of a tabbed or stacked container.
//!
//! The navigator answers one question: given a snapshot, which sibling
//! should be focused next?  It never falls back to directional focus on its
//! own; callers look at the [`Resolution`] and decide.

use crate::locator::{find_focused, find_tab_group};
use crate::tree::{Node, Snapshot};
use std::fmt;

/// Direction of tab cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabDirection {
    Next,
    Prev,
}

impl fmt::Display for TabDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabDirection::Next => write!(f, "next"),
            TabDirection::Prev => write!(f, "prev"),
        }
    }
}

/// Result of a tab lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Focus this container.
    Target(Node<'a>),
    /// Nothing holds focus.
    NoFocus,
    /// The focus is not inside a tabbed or stacked container.
    NotInGroup,
    /// Inside a group, but there is nowhere to go (edge without wrap, or a
    /// group with fewer than two children).
    NoTarget,
    /// The requested tab number does not exist.
    NoSuchTab { index: i64, count: usize },
}

impl<'a> Resolution<'a> {
    pub fn target(&self) -> Option<Node<'a>> {
        match self {
            Resolution::Target(node) => Some(*node),
            _ => None,
        }
    }
}

/// The focused node and the tab group it sits in.
///
/// The group search starts at the focused node's parent: a focused
/// container is a tab of its parent group, never a group of itself.
fn focus_and_group(snapshot: &Snapshot) -> Result<(Node<'_>, Node<'_>), Resolution<'_>> {
    let focused = find_focused(snapshot).ok_or(Resolution::NoFocus)?;
    let group = focused
        .parent()
        .and_then(find_tab_group)
        .ok_or(Resolution::NotInGroup)?;
    Ok((focused, group))
}

/// Sibling to focus when moving one tab in `direction`.
///
/// `Prev` is the `Next` scan over the reversed child order, so a `Next`
/// followed by a `Prev` (both wrapping) lands where it started.
pub fn step(snapshot: &Snapshot, direction: TabDirection, wrap: bool) -> Resolution<'_> {
    let (focused, group) = match focus_and_group(snapshot) {
        Ok(found) => found,
        Err(resolution) => return resolution,
    };
    if group.child_count() < 2 {
        return Resolution::NoTarget;
    }
    match direction {
        TabDirection::Next => scan(group.children(), focused, wrap),
        TabDirection::Prev => scan(group.children().rev(), focused, wrap),
    }
}

fn scan<'a, I>(children: I, focused: Node<'a>, wrap: bool) -> Resolution<'a>
where
    I: Iterator<Item = Node<'a>>,
{
    let mut first = None;
    let mut previous: Option<Node<'a>> = None;
    for child in children {
        first.get_or_insert(child);
        if previous.is_some_and(|p| p.contains(focused)) {
            return Resolution::Target(child);
        }
        previous = Some(child);
    }
    match (previous, first) {
        (Some(last), Some(first)) if wrap && last.contains(focused) => Resolution::Target(first),
        _ => Resolution::NoTarget,
    }
}

/// The `n`-th child (1-based) of the tab group around the focus.
pub fn select_nth(snapshot: &Snapshot, n: i64) -> Resolution<'_> {
    let (_, group) = match focus_and_group(snapshot) {
        Ok(found) => found,
        Err(resolution) => return resolution,
    };
    let count = group.child_count();
    let target = usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| group.children().nth(i));
    match target {
        Some(node) => Resolution::Target(node),
        None => Resolution::NoSuchTab { index: n, count },
    }
}
