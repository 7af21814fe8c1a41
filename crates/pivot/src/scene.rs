//! Node hierarchy with cached world transforms.
//!
//! Nodes live in an arena owned by [`SceneGraph`] and are addressed by
//! generational [`NodeId`] handles. A parent owns its ordered child list;
//! the child's `parent` link is a plain handle used only to walk upward.
//!
//! `world(node) = world(parent) · local(node)`, with `world(root) = local(root)`.
//! Two ways to get it:
//!
//! - [`SceneGraph::world_matrix_uncached`] takes `&self`, walks to the root and
//!   multiplies root-to-node every time.
//! - [`SceneGraph::world_matrix`] takes `&mut self` and serves from a per-node
//!   cache. Any local change, attach or detach marks the node and its whole
//!   subtree dirty; a dirty node is recomputed on the next query.
//!
//! A node that is not dirty always holds the same matrix the uncached walk
//! would produce.
//!
//! The graph has no interior mutability. Share it across threads behind
//! your own lock; the `&self` queries are fine for concurrent readers.

use alloc::{string::String, vec, vec::Vec};
use core::fmt;
use tracing::{debug, trace, warn};

use crate::{Error, Mat4, Result, Scalar, Trs, Vec3};

/// Handle to a node in a [`SceneGraph`].
///
/// Carries the slot generation, so a handle to a removed node is rejected
/// with [`Error::UnknownNode`] even after its slot is reused. A slot is
/// retired once its generation reaches `u32::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[inline]
    pub fn index(self) -> u32 { self.index }

    #[inline]
    pub fn generation(self) -> u32 { self.generation }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "node#{}v{}", self.index, self.generation)
    }
}

/// A scene node: name, local TRS, links and the world cache.
///
/// Fields are read-only from outside; all mutation goes through
/// [`SceneGraph`] so the dirty flags stay correct.
#[derive(Clone, Debug)]
pub struct Node<S> {
    name: String,
    trs: Trs<S>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    world: Mat4<S>,
    dirty: bool,
}

impl<S: Scalar> Node<S> {
    fn new(name: String, trs: Trs<S>) -> Self {
        Self {
            name,
            trs,
            parent: None,
            children: Vec::new(),
            world: Mat4::identity(),
            dirty: true,
        }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn trs(&self) -> &Trs<S> { &self.trs }

    pub fn parent(&self) -> Option<NodeId> { self.parent }

    pub fn children(&self) -> &[NodeId] { &self.children }

    pub fn is_dirty(&self) -> bool { self.dirty }

    /// Cached world matrix, or `None` while the node is dirty.
    pub fn cached_world(&self) -> Option<&Mat4<S>> {
        if self.dirty { None } else { Some(&self.world) }
    }
}

#[derive(Clone, Debug)]
struct Slot<S> {
    generation: u32,
    node: Option<Node<S>>,
}

/// Arena of nodes forming a forest of trees.
#[derive(Clone, Debug)]
pub struct SceneGraph<S> {
    slots: Vec<Slot<S>>,
    free: Vec<u32>,
    len: usize,
}

impl<S: Scalar> Default for SceneGraph<S> {
    fn default() -> Self { Self::new() }
}

impl<S: Scalar> SceneGraph<S> {
    pub fn new() -> Self {
        Self { slots: Vec::new(), free: Vec::new(), len: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity), free: Vec::new(), len: 0 }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub fn contains(&self, id: NodeId) -> bool { self.node(id).is_ok() }

    /// Create a new root node.
    ///
    /// # Panics
    ///
    /// When the arena would need more than `u32::MAX` slots.
    pub fn insert(&mut self, name: impl Into<String>, trs: Trs<S>) -> NodeId {
        let node = Node::new(name.into(), trs);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            let generation = slot.generation;
            self.len += 1;
            return NodeId { index, generation };
        }
        let Ok(index) = u32::try_from(self.slots.len()) else {
            panic!("scene graph slot index overflow");
        };
        self.slots.push(Slot { generation: 0, node: Some(node) });
        self.len += 1;
        NodeId { index, generation: 0 }
    }

    /// Create a node and attach it as the last child of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, name: impl Into<String>, trs: Trs<S>) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.insert(name, trs);
        self.attach(id, parent)?;
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node<S>> {
        match self.slots.get(id.index as usize) {
            Some(Slot { generation, node: Some(node) }) if *generation == id.generation => Ok(node),
            _ => Err(Error::UnknownNode(id)),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<S>> {
        match self.slots.get_mut(id.index as usize) {
            Some(Slot { generation, node: Some(node) }) if *generation == id.generation => Ok(node),
            _ => Err(Error::UnknownNode(id)),
        }
    }

    /// All live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<S>)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node.as_ref().map(|n| (NodeId { index: index as u32, generation: slot.generation }, n))
        })
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter(|(_, n)| n.parent.is_none()).map(|(id, _)| id)
    }

    /// First node with the given name, in slot order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.name == name).map(|(id, _)| id)
    }

    pub fn name(&self, id: NodeId) -> Result<&str> {
        Ok(self.node(id)?.name())
    }

    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    /// Ancestors of `id`, nearest first. Excludes `id`.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut cur = self.node(id)?.parent;
        while let Some(p) = cur {
            out.push(p);
            cur = self.node(p)?.parent;
        }
        Ok(out)
    }

    /// Descendants of `id` in depth-first pre-order, children in insertion
    /// order. Excludes `id`.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id)?.children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.node(n)?.children.iter().rev());
        }
        Ok(out)
    }

    /// Whether `ancestor` lies strictly above `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> Result<bool> {
        self.node(ancestor)?;
        let mut cur = self.node(node)?.parent;
        while let Some(p) = cur {
            if p == ancestor {
                return Ok(true);
            }
            cur = self.node(p)?.parent;
        }
        Ok(false)
    }

    /// Make `child` the last child of `parent`, moving it from its current
    /// parent if it has one.
    ///
    /// Fails with [`Error::Cycle`] when `child` is `parent` or one of its
    /// ancestors; the graph is unchanged in that case.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        self.node(child)?;
        if child == parent || self.is_ancestor(child, parent)? {
            warn!(%child, %parent, "rejected attach: would create a cycle");
            return Err(Error::Cycle { child, parent });
        }
        if let Some(old) = self.unlink(child)? {
            debug!(%child, from = %old, "moving node to new parent");
        }
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        self.mark_dirty(child);
        debug!(%child, %parent, "attached node");
        Ok(())
    }

    /// Detach `id` from its parent. The node and its subtree stay alive as
    /// a new tree rooted at `id`. No-op for a root.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if let Some(parent) = self.unlink(id)? {
            self.mark_dirty(id);
            debug!(node = %id, %parent, "detached node");
        }
        Ok(())
    }

    /// Remove `id` and its whole subtree. Returns the number of nodes
    /// destroyed. Handles to any of them become invalid.
    pub fn remove(&mut self, id: NodeId) -> Result<usize> {
        self.unlink(id)?;
        let mut doomed = self.descendants(id)?;
        doomed.push(id);
        for d in &doomed {
            self.free_slot(*d);
        }
        debug!(node = %id, count = doomed.len(), "removed subtree");
        Ok(doomed.len())
    }

    /// Remove only `id`. Its children become roots with no parent and keep
    /// their local transforms. The returned node has no links.
    pub fn remove_single(&mut self, id: NodeId) -> Result<Node<S>> {
        self.unlink(id)?;
        let children = core::mem::take(&mut self.node_mut(id)?.children);
        for &c in &children {
            self.node_mut(c)?.parent = None;
            self.mark_dirty(c);
        }
        debug!(node = %id, orphans = children.len(), "removed node, children promoted to roots");
        self.free_slot(id).ok_or(Error::UnknownNode(id))
    }

    pub fn trs(&self, id: NodeId) -> Result<Trs<S>> {
        Ok(self.node(id)?.trs)
    }

    /// Replace the local transform and invalidate the subtree's world cache.
    pub fn set_trs(&mut self, id: NodeId, trs: Trs<S>) -> Result<()> {
        self.node_mut(id)?.trs = trs;
        self.mark_dirty(id);
        Ok(())
    }

    /// Edit the local transform in place; invalidates like [`set_trs`](Self::set_trs).
    pub fn update_trs(&mut self, id: NodeId, f: impl FnOnce(&mut Trs<S>)) -> Result<()> {
        f(&mut self.node_mut(id)?.trs);
        self.mark_dirty(id);
        Ok(())
    }

    pub fn local_matrix(&self, id: NodeId) -> Result<Mat4<S>> {
        Ok(self.node(id)?.trs.to_mat4())
    }

    /// World matrix computed from scratch, root to node.
    pub fn world_matrix_uncached(&self, id: NodeId) -> Result<Mat4<S>> {
        let mut world = Mat4::identity();
        for n in self.chain(id)? {
            world = world * self.node(n)?.trs.to_mat4();
        }
        Ok(world)
    }

    /// World matrix through the cache. Recomputes dirty nodes on the path
    /// from the root and clears their flags.
    pub fn world_matrix(&mut self, id: NodeId) -> Result<Mat4<S>> {
        let mut world = Mat4::identity();
        for n in self.chain(id)? {
            let node = self.node_mut(n)?;
            if node.dirty {
                node.world = world * node.trs.to_mat4();
                node.dirty = false;
                trace!(node = %n, "recomputed world matrix");
            }
            world = node.world;
        }
        Ok(world)
    }

    /// World-space origin of the node.
    pub fn world_position(&mut self, id: NodeId) -> Result<Vec3<S>> {
        Ok(self.world_matrix(id)?.translation_vec())
    }

    /// Recompute every dirty node, top-down.
    pub fn update_world_matrices(&mut self) {
        let mut stack: Vec<(NodeId, Mat4<S>)> = self.roots().map(|r| (r, Mat4::identity())).collect();
        let mut recomputed = 0usize;
        while let Some((id, parent_world)) = stack.pop() {
            let Ok(node) = self.node_mut(id) else { continue };
            if node.dirty {
                node.world = parent_world * node.trs.to_mat4();
                node.dirty = false;
                recomputed += 1;
            }
            let world = node.world;
            stack.extend(node.children.iter().map(|&c| (c, world)));
        }
        trace!(recomputed, "flushed world matrices");
    }

    // Path from the root down to `id`, inclusive.
    fn chain(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut chain = self.ancestors(id)?;
        chain.reverse();
        chain.push(id);
        Ok(chain)
    }

    // Clear the parent link on both sides. Returns the old parent.
    fn unlink(&mut self, id: NodeId) -> Result<Option<NodeId>> {
        let old = self.node_mut(id)?.parent.take();
        if let Some(p) = old {
            self.node_mut(p)?.children.retain(|&c| c != id);
        }
        Ok(old)
    }

    // A dirty node's subtree is already dirty, so the walk stops there.
    fn mark_dirty(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Ok(node) = self.node_mut(n) {
                if !node.dirty {
                    node.dirty = true;
                    stack.extend_from_slice(&node.children);
                }
            }
        }
    }

    fn free_slot(&mut self, id: NodeId) -> Option<Node<S>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        // A slot whose generation would wrap is retired, never reused, so
        // old handles cannot alias a new node.
        let next = slot.generation.checked_add(1);
        if let Some(g) = next {
            slot.generation = g;
        }
        self.len -= 1;
        match next {
            Some(_) => self.free.push(id.index),
            None => trace!(index = id.index, "retiring exhausted scene slot"),
        }
        Some(node)
    }
}
