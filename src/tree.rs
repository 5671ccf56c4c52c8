//! Immutable snapshots of the window manager's container tree.
//!
//! A [`Snapshot`] is built once per action from the nested tree the window
//! manager reports (see [`RawNode`]) and then only read.  Nodes live in a
//! flat arena in depth-first pre-order; parent links are arena indices, so a
//! [`Node`] can walk upwards without owning or mutating anything.
//!
//! Navigation code never holds on to a snapshot past a single decision.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Container id as assigned by the window manager (i3's `con_id`).
pub type ConId = i64;

/// How a container arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    SplitH,
    SplitV,
    Tabbed,
    Stacked,
    /// Anything else the window manager reports (`output`, `dockarea`, …).
    #[default]
    #[serde(other)]
    Other,
}

impl Layout {
    /// Whether children of this layout are shown one at a time and can be
    /// cycled through.
    pub fn is_tab_group(self) -> bool {
        matches!(self, Layout::Tabbed | Layout::Stacked)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::SplitH => write!(f, "splith"),
            Layout::SplitV => write!(f, "splitv"),
            Layout::Tabbed => write!(f, "tabbed"),
            Layout::Stacked => write!(f, "stacked"),
            Layout::Other => write!(f, "other"),
        }
    }
}

/// Nested container description, as found in the `GET_TREE` reply.
///
/// Only the fields navigation needs are kept; everything else in the JSON
/// is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: ConId,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub focused: bool,
    /// Tiling children, in tab order.
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub floating_nodes: Vec<RawNode>,
}

impl RawNode {
    /// A window: no children, split layout (as i3 reports leaves).
    pub fn leaf(id: ConId) -> Self {
        Self {
            id,
            layout: Layout::SplitH,
            focused: false,
            nodes: Vec::new(),
            floating_nodes: Vec::new(),
        }
    }

    /// An internal container with the given tiling children.
    pub fn container(id: ConId, layout: Layout, nodes: Vec<RawNode>) -> Self {
        Self {
            id,
            layout,
            focused: false,
            nodes,
            floating_nodes: Vec::new(),
        }
    }

    /// Mark this node as the one holding input focus.
    pub fn focused(mut self) -> Self {
        self.focused = true;
        self
    }

    /// Attach floating children.
    pub fn with_floating(mut self, floating: Vec<RawNode>) -> Self {
        self.floating_nodes = floating;
        self
    }
}

/// The tree reported by the window manager violates the tree contract.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("container id {0} appears more than once")]
    DuplicateId(ConId),
    #[error("tree json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
struct Entry {
    id: ConId,
    layout: Layout,
    focused: bool,
    parent: Option<usize>,
    children: Vec<usize>,
    floating: Vec<usize>,
}

/// A complete, read-only copy of the container tree at one instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    entries: Vec<Entry>,
}

impl Snapshot {
    /// Flatten a nested tree into a snapshot.
    ///
    /// Fails if two containers share an id.
    pub fn from_raw(root: &RawNode) -> Result<Self, SnapshotError> {
        let mut snapshot = Self {
            entries: Vec::new(),
        };
        let mut seen = HashSet::new();
        snapshot.insert(root, None, &mut seen)?;
        Ok(snapshot)
    }

    /// Parse a `GET_TREE` JSON payload.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let root: RawNode = serde_json::from_str(json)?;
        Self::from_raw(&root)
    }

    fn insert(
        &mut self,
        raw: &RawNode,
        parent: Option<usize>,
        seen: &mut HashSet<ConId>,
    ) -> Result<usize, SnapshotError> {
        if !seen.insert(raw.id) {
            return Err(SnapshotError::DuplicateId(raw.id));
        }
        let index = self.entries.len();
        self.entries.push(Entry {
            id: raw.id,
            layout: raw.layout,
            focused: raw.focused,
            parent,
            children: Vec::with_capacity(raw.nodes.len()),
            floating: Vec::with_capacity(raw.floating_nodes.len()),
        });
        for child in &raw.nodes {
            let child_index = self.insert(child, Some(index), seen)?;
            self.entries[index].children.push(child_index);
        }
        for child in &raw.floating_nodes {
            let child_index = self.insert(child, Some(index), seen)?;
            self.entries[index].floating.push(child_index);
        }
        Ok(index)
    }

    /// The root container (i3's `root` node).
    pub fn root(&self) -> Node<'_> {
        Node {
            snapshot: self,
            index: 0,
        }
    }

    /// Look up a container by id.
    pub fn get(&self, id: ConId) -> Option<Node<'_>> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .map(|index| Node {
                snapshot: self,
                index,
            })
    }

    /// Number of containers in the snapshot.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Borrowed view of one container inside a [`Snapshot`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    snapshot: &'a Snapshot,
    index: usize,
}

impl<'a> Node<'a> {
    fn entry(&self) -> &'a Entry {
        &self.snapshot.entries[self.index]
    }

    fn at(&self, index: usize) -> Node<'a> {
        Node {
            snapshot: self.snapshot,
            index,
        }
    }

    pub fn id(&self) -> ConId {
        self.entry().id
    }

    pub fn layout(&self) -> Layout {
        self.entry().layout
    }

    pub fn is_focused(&self) -> bool {
        self.entry().focused
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.entry().parent.map(|index| self.at(index))
    }

    /// Tiling children in tab order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = Node<'a>> + ExactSizeIterator + 'a {
        let snapshot = self.snapshot;
        self.entry()
            .children
            .iter()
            .map(move |&index| Node { snapshot, index })
    }

    pub fn floating(&self) -> impl DoubleEndedIterator<Item = Node<'a>> + ExactSizeIterator + 'a {
        let snapshot = self.snapshot;
        self.entry()
            .floating
            .iter()
            .map(move |&index| Node { snapshot, index })
    }

    pub fn child_count(&self) -> usize {
        self.entry().children.len()
    }

    /// This node followed by each ancestor up to the root.
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors { next: Some(*self) }
    }

    /// Depth-first pre-order walk of this subtree, tiling children before
    /// floating ones.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants { stack: vec![*self] }
    }

    /// Whether `other` is this node or lies anywhere below it.
    pub fn contains(&self, other: Node<'a>) -> bool {
        other.ancestors().any(|n| n == *self)
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.snapshot, other.snapshot) && self.index == other.index
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id())
            .field("layout", &self.layout())
            .field("focused", &self.is_focused())
            .field("children", &self.child_count())
            .finish()
    }
}

/// Iterator returned by [`Node::ancestors`].
pub struct Ancestors<'a> {
    next: Option<Node<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        let node = self.next?;
        self.next = node.parent();
        Some(node)
    }
}

/// Iterator returned by [`Node::descendants`].
pub struct Descendants<'a> {
    stack: Vec<Node<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        let node = self.stack.pop()?;
        // Pushed in reverse so the first tiling child is visited next.
        self.stack.extend(node.floating().rev());
        self.stack.extend(node.children().rev());
        Some(node)
    }
}
