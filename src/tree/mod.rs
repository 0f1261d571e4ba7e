//! Arena-backed block forest and its pure mutators.
//!
//! Blocks are stored in a flat map keyed by [`BlockId`]; containment is kept as ordered
//! id lists. Every mutator takes `&self` and returns a new [`Forest`]. Nodes that a
//! mutation does not touch are shared with the previous version, so a host can detect
//! changes by identity ([`Forest::ptr_eq`], [`Forest::shares_node`]).
//!
//! The pure mutators copy the id map (not the nodes) of a shared forest. The editor
//! session owns its forests and edits them through the in-place forms, which only copy
//! when a host still holds an older version.

use crate::block::{BlockField, BlockId, BlockTag, FieldValue, LogicBlock, apply_field};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod view;

pub use view::BlockView;

/// Where a new block is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentRef {
    Root,
    Block(BlockId),
}

/// What a forest is allowed to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForestRole {
    /// Statement tree: every kind except `PRECONDITION`, nested only under `FOR`.
    Statements,
    /// Precondition list: `PRECONDITION` blocks only, flat.
    Preconditions,
}

#[derive(Debug, Clone)]
struct Node {
    block: LogicBlock,
    parent: Option<BlockId>,
    children: Vec<BlockId>,
}

#[derive(Debug, Clone)]
struct Inner {
    role: ForestRole,
    nodes: AHashMap<BlockId, Arc<Node>>,
    roots: Vec<BlockId>,
}

/// An ordered forest of [`LogicBlock`]s.
#[derive(Debug, Clone)]
pub struct Forest {
    inner: Arc<Inner>,
}

impl Forest {
    pub fn new(role: ForestRole) -> Self {
        Self {
            inner: Arc::new(Inner {
                role,
                nodes: AHashMap::new(),
                roots: Vec::new(),
            }),
        }
    }

    pub fn statements() -> Self {
        Self::new(ForestRole::Statements)
    }

    pub fn preconditions() -> Self {
        Self::new(ForestRole::Preconditions)
    }

    pub fn role(&self) -> ForestRole {
        self.inner.role
    }

    pub fn len(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.nodes.is_empty()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.inner.nodes.contains_key(&id)
    }

    pub fn get(&self, id: BlockId) -> Option<&LogicBlock> {
        self.inner.nodes.get(&id).map(|n| &n.block)
    }

    /// Top-level ids in order.
    pub fn roots(&self) -> &[BlockId] {
        &self.inner.roots
    }

    /// Ordered child ids of `id`. Empty for leaves and unknown ids.
    pub fn children(&self, id: BlockId) -> &[BlockId] {
        self.inner
            .nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: BlockId) -> Option<ParentRef> {
        self.inner
            .nodes
            .get(&id)
            .map(|n| n.parent.map_or(ParentRef::Root, ParentRef::Block))
    }

    /// True when both handles point at the very same version.
    pub fn ptr_eq(a: &Forest, b: &Forest) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// True when `id` is present in both versions and was not touched in between.
    pub fn shares_node(&self, other: &Forest, id: BlockId) -> bool {
        match (self.inner.nodes.get(&id), other.inner.nodes.get(&id)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Depth-first, pre-order walk: `(depth, block)` pairs in document order.
    pub fn walk(&self) -> Vec<(usize, &LogicBlock)> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<(usize, BlockId)> =
            self.inner.roots.iter().rev().map(|id| (0, *id)).collect();
        while let Some((depth, id)) = stack.pop() {
            if let Some(node) = self.inner.nodes.get(&id) {
                out.push((depth, &node.block));
                stack.extend(node.children.iter().rev().map(|c| (depth + 1, *c)));
            }
        }
        out
    }

    /// Whether `kind` may be attached under `parent` in this forest.
    pub fn admits(&self, kind: BlockTag, parent: ParentRef) -> bool {
        match self.inner.role {
            ForestRole::Preconditions => {
                kind == BlockTag::Precondition && parent == ParentRef::Root
            }
            ForestRole::Statements => {
                kind != BlockTag::Precondition
                    && match parent {
                        ParentRef::Root => true,
                        ParentRef::Block(pid) => self.get(pid).is_some_and(|b| b.is_container()),
                    }
            }
        }
    }

    /// Appends `block` at the top level or to the children of `parent`.
    ///
    /// Missing or non-container parents, kinds this forest cannot hold, and ids that are
    /// already present all leave the forest unchanged.
    pub fn add(&self, parent: ParentRef, block: LogicBlock) -> Forest {
        let mut next = self.clone();
        next.push(parent, block);
        next
    }

    /// Replaces a single field of the block `id`, wherever it is nested.
    pub fn update_field(
        &self,
        id: BlockId,
        field: BlockField,
        value: impl Into<FieldValue>,
    ) -> Forest {
        let mut next = self.clone();
        next.set_field(id, field, value.into());
        next
    }

    /// In-place form of [`Forest::add`]. Copies the arena only if it is shared.
    pub(crate) fn push(&mut self, parent: ParentRef, block: LogicBlock) -> bool {
        if self.contains(block.id) {
            log::debug!("add: id {} already present, ignored", block.id);
            return false;
        }
        if !self.admits(block.tag(), parent) {
            log::debug!(
                "add: {} under {:?} not admitted in {:?} forest",
                block.tag(),
                parent,
                self.inner.role
            );
            return false;
        }

        let inner = Arc::make_mut(&mut self.inner);
        let id = block.id;
        let parent_id = match parent {
            ParentRef::Root => {
                inner.roots.push(id);
                None
            }
            ParentRef::Block(pid) => {
                if let Some(node) = inner.nodes.get_mut(&pid) {
                    Arc::make_mut(node).children.push(id);
                }
                Some(pid)
            }
        };
        inner.nodes.insert(
            id,
            Arc::new(Node {
                block,
                parent: parent_id,
                children: Vec::new(),
            }),
        );
        true
    }

    /// In-place form of [`Forest::update_field`].
    pub(crate) fn set_field(&mut self, id: BlockId, field: BlockField, value: FieldValue) -> bool {
        let Some(node) = self.inner.nodes.get(&id) else {
            log::debug!("update_field: id {} not found", id);
            return false;
        };

        let mut kind = node.block.kind.clone();
        if !apply_field(&mut kind, field, value) {
            log::debug!("update_field: {} on {} left {} unchanged", field, node.block.tag(), id);
            return false;
        }

        let inner = Arc::make_mut(&mut self.inner);
        if let Some(node) = inner.nodes.get_mut(&id) {
            Arc::make_mut(node).block.kind = kind;
        }
        true
    }

    /// Removes `id` and, for a `FOR`, its whole subtree.
    pub fn remove(&self, id: BlockId) -> Forest {
        let mut next = self.clone();
        next.detach(id);
        next
    }

    /// Moves `active` to the index of `over` within their shared sibling list.
    ///
    /// Ids that are not siblings (or not present) leave the forest unchanged:
    /// moving a block across nesting levels is not supported.
    pub fn reorder(&self, active: BlockId, over: BlockId) -> Forest {
        let mut next = self.clone();
        next.move_to(active, over);
        next
    }

    /// In-place form of [`Forest::remove`].
    pub(crate) fn detach(&mut self, id: BlockId) -> bool {
        let Some(parent) = self.inner.nodes.get(&id).map(|n| n.parent) else {
            log::debug!("remove: id {} not found", id);
            return false;
        };

        let inner = Arc::make_mut(&mut self.inner);
        match parent {
            None => inner.roots.retain(|r| *r != id),
            Some(pid) => {
                if let Some(node) = inner.nodes.get_mut(&pid) {
                    Arc::make_mut(node).children.retain(|c| *c != id);
                }
            }
        }

        let mut doomed = vec![id];
        while let Some(next) = doomed.pop() {
            if let Some(gone) = inner.nodes.remove(&next) {
                doomed.extend(gone.children.iter().copied());
            }
        }
        true
    }

    /// In-place form of [`Forest::reorder`].
    pub(crate) fn move_to(&mut self, active: BlockId, over: BlockId) -> bool {
        if active == over {
            return false;
        }
        let (Some(a), Some(o)) = (self.inner.nodes.get(&active), self.inner.nodes.get(&over))
        else {
            log::debug!("reorder: {} or {} not found", active, over);
            return false;
        };
        if a.parent != o.parent {
            log::debug!("reorder: {} and {} are not siblings", active, over);
            return false;
        }
        let parent = a.parent;

        let siblings = match parent {
            None => self.roots(),
            Some(pid) => self.children(pid),
        };
        let (Some(from), Some(to)) = (
            siblings.iter().position(|s| *s == active),
            siblings.iter().position(|s| *s == over),
        ) else {
            return false;
        };

        let inner = Arc::make_mut(&mut self.inner);
        let siblings = match parent {
            None => &mut inner.roots,
            Some(pid) => match inner.nodes.get_mut(&pid) {
                Some(node) => &mut Arc::make_mut(node).children,
                None => return false,
            },
        };
        let moved = siblings.remove(from);
        siblings.insert(to, moved);
        true
    }

    /// Compares two forests by shape and content, ignoring block ids.
    pub fn same_structure(&self, other: &Forest) -> bool {
        self.inner.roots.len() == other.inner.roots.len()
            && self
                .inner
                .roots
                .iter()
                .zip(other.inner.roots.iter())
                .all(|(a, b)| self.same_subtree(*a, other, *b))
    }

    fn same_subtree(&self, a: BlockId, other: &Forest, b: BlockId) -> bool {
        let (Some(na), Some(nb)) = (self.inner.nodes.get(&a), other.inner.nodes.get(&b)) else {
            return false;
        };
        na.block.kind == nb.block.kind
            && na.children.len() == nb.children.len()
            && na
                .children
                .iter()
                .zip(nb.children.iter())
                .all(|(ca, cb)| self.same_subtree(*ca, other, *cb))
    }

    /// Nested, read-only projection for rendering hosts.
    pub fn to_views(&self) -> Vec<BlockView> {
        self.inner.roots.iter().filter_map(|id| self.view_of(*id)).collect()
    }

    fn view_of(&self, id: BlockId) -> Option<BlockView> {
        let node = self.inner.nodes.get(&id)?;
        Some(BlockView {
            block: node.block.clone(),
            children: node
                .children
                .iter()
                .filter_map(|c| self.view_of(*c))
                .collect(),
        })
    }

    /// Rebuilds a forest from a projection, keeping ids.
    /// Entries this forest cannot hold (or duplicate ids) are skipped with their subtree.
    pub fn from_views(role: ForestRole, views: &[BlockView]) -> Forest {
        fn attach(forest: &mut Forest, parent: ParentRef, view: &BlockView) {
            if forest.push(parent, view.block.clone()) {
                for child in &view.children {
                    attach(forest, ParentRef::Block(view.block.id), child);
                }
            }
        }

        let mut forest = Forest::new(role);
        for view in views {
            attach(&mut forest, ParentRef::Root, view);
        }
        forest
    }

}

impl Default for Forest {
    fn default() -> Self {
        Self::statements()
    }
}
