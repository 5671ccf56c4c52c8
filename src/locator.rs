//! Finding the focused container and the tab group around it.
//!
//! Both lookups are pure functions of a [`Snapshot`].  "Not found" is an
//! ordinary outcome (an empty workspace has no focused window, most windows
//! are not inside a tab group), so both return `Option`.

use crate::tree::{Node, Snapshot};

/// Depth-first search for the node holding input focus.
///
/// Returns `None` when nothing is focused.  Should a malformed tree mark
/// several nodes as focused, the first one in pre-order wins.
pub fn find_focused(snapshot: &Snapshot) -> Option<Node<'_>> {
    snapshot.root().descendants().find(|n| n.is_focused())
}

/// Walk from `node` (inclusive) towards the root and return the first
/// container accepted by `predicate`.
pub fn find_enclosing<'a, P>(node: Node<'a>, predicate: P) -> Option<Node<'a>>
where
    P: Fn(&Node<'a>) -> bool,
{
    node.ancestors().find(|n| predicate(n))
}

/// [`find_enclosing`] with the default predicate: a tabbed or stacked
/// container.
pub fn find_tab_group(node: Node<'_>) -> Option<Node<'_>> {
    find_enclosing(node, |n| n.layout().is_tab_group())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Layout, RawNode};

    fn snapshot(raw: RawNode) -> Snapshot {
        Snapshot::from_raw(&raw).unwrap()
    }

    #[test]
    fn finds_nested_focus() {
        let snap = snapshot(RawNode::container(
            1,
            Layout::SplitH,
            vec![
                RawNode::leaf(2),
                RawNode::container(3, Layout::SplitV, vec![RawNode::leaf(4), RawNode::leaf(5).focused()]),
            ],
        ));
        assert_eq!(find_focused(&snap).map(|n| n.id()), Some(5));
    }

    #[test]
    fn finds_floating_focus() {
        let snap = snapshot(
            RawNode::container(1, Layout::SplitH, vec![RawNode::leaf(2)])
                .with_floating(vec![RawNode::leaf(9).focused()]),
        );
        assert_eq!(find_focused(&snap).map(|n| n.id()), Some(9));
    }

    #[test]
    fn no_focus_is_none() {
        let snap = snapshot(RawNode::container(1, Layout::SplitH, vec![RawNode::leaf(2)]));
        assert!(find_focused(&snap).is_none());
    }

    #[test]
    fn empty_tree_has_no_focus() {
        let snap = snapshot(RawNode::container(1, Layout::Other, vec![]));
        assert!(find_focused(&snap).is_none());
    }

    #[test]
    fn first_focused_in_preorder_wins() {
        let snap = snapshot(RawNode::container(
            1,
            Layout::SplitH,
            vec![RawNode::leaf(2).focused(), RawNode::leaf(3).focused()],
        ));
        assert_eq!(find_focused(&snap).map(|n| n.id()), Some(2));
    }

    #[test]
    fn enclosing_finds_nearest_group() {
        let snap = snapshot(RawNode::container(
            1,
            Layout::Tabbed,
            vec![RawNode::container(
                2,
                Layout::SplitV,
                vec![RawNode::container(3, Layout::Stacked, vec![RawNode::leaf(4).focused()])],
            )],
        ));
        let focused = find_focused(&snap).unwrap();
        assert_eq!(find_tab_group(focused).map(|n| n.id()), Some(3));
    }

    #[test]
    fn enclosing_includes_start_node() {
        let snap = snapshot(RawNode::container(1, Layout::Tabbed, vec![RawNode::leaf(2)]));
        assert_eq!(find_tab_group(snap.root()).map(|n| n.id()), Some(1));
    }

    #[test]
    fn enclosing_without_group_is_none() {
        let snap = snapshot(RawNode::container(
            1,
            Layout::SplitH,
            vec![RawNode::container(2, Layout::SplitV, vec![RawNode::leaf(3).focused()])],
        ));
        let focused = find_focused(&snap).unwrap();
        assert!(find_tab_group(focused).is_none());
    }

    #[test]
    fn enclosing_accepts_custom_predicate() {
        let snap = snapshot(RawNode::container(
            1,
            Layout::SplitV,
            vec![RawNode::container(2, Layout::SplitH, vec![RawNode::leaf(3).focused()])],
        ));
        let focused = find_focused(&snap).unwrap();
        let found = find_enclosing(focused, |n| n.layout() == Layout::SplitV);
        assert_eq!(found.map(|n| n.id()), Some(1));
    }
}
