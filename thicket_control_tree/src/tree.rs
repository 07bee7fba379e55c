// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, layout propagation, queries.

use alloc::{string::String, vec, vec::Vec};
use hashbrown::HashSet;
use kurbo::Point;
use smallvec::SmallVec;
use thicket_anchor::{Anchors, Bounds, Margins, Size, resolve};

use crate::damage::Damage;
use crate::types::{
    ControlFlags, ControlId, ControlProps, InputButton, PressedButtons, Property, PropertyChange,
};

/// Retained tree of controls.
///
/// The tree is the single owner of structure: every attach, detach and removal
/// goes through it. Each control has at most one parent, and the children of a
/// control are ordered: later children are drawn on top, hit-tested first, and
/// come later in focus traversal.
///
/// Unlike a batched scene graph, geometry updates apply immediately. Resizing a
/// control resolves the anchors of its direct children, and each child whose
/// size changed resolves its own children in turn. Absolute positions are cached
/// per control and refreshed whenever an ancestor moves or the control is
/// re-parented.
///
/// ## Example
///
/// ```rust
/// use thicket_anchor::{Anchors, Bounds};
/// use thicket_control_tree::{ControlProps, ControlTree};
///
/// let mut tree = ControlTree::new();
/// let panel = tree.insert(
///     None,
///     ControlProps {
///         bounds: Bounds::new(0, 0, 200, 100),
///         ..ControlProps::default()
///     },
/// );
/// let button = tree.insert(
///     Some(panel),
///     ControlProps {
///         bounds: Bounds::new(10, 10, 180, 20),
///         anchors: Anchors::LEFT | Anchors::TOP | Anchors::RIGHT,
///         ..ControlProps::default()
///     },
/// );
///
/// tree.set_bounds(panel, Bounds::new(0, 0, 400, 100));
/// assert_eq!(tree.bounds(button), Some(Bounds::new(10, 10, 380, 20)));
/// ```
pub struct ControlTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// displayed top-level controls, bottom to top
    roots: Vec<ControlId>,
    dirty: Vec<ControlId>,
    changes: Vec<PropertyChange>,
}

impl core::fmt::Debug for ControlTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("ControlTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("roots", &self.roots)
            .field("dirty", &self.dirty.len())
            .finish_non_exhaustive()
    }
}

impl Default for ControlTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Rectangle and parent client extent captured when a control was last placed
/// explicitly. Anchored layout always resolves from here.
#[derive(Clone, Copy, Debug, Default)]
struct Reference {
    bounds: Bounds,
    parent: Size,
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    name: String,
    parent: Option<ControlId>,
    root: ControlId,
    children: Vec<ControlId>,
    client: Option<ControlId>,
    is_client_area: bool,
    bounds: Bounds,
    absolute: Bounds,
    reference: Reference,
    min_size: Size,
    anchors: Anchors,
    margins: Margins,
    client_margins: Margins,
    flags: ControlFlags,
    pressed: PressedButtons,
    dirty: bool,
}

impl Node {
    fn new(id: ControlId, props: ControlProps) -> Self {
        let bounds = clamp_min(props.bounds, props.min_size);
        Self {
            generation: id.1,
            name: props.name,
            parent: None,
            root: id,
            children: Vec::new(),
            client: None,
            is_client_area: false,
            bounds,
            absolute: bounds,
            reference: Reference {
                bounds,
                parent: Size::ZERO,
            },
            min_size: props.min_size,
            anchors: props.anchors,
            margins: props.margins,
            client_margins: Margins::ZERO,
            flags: props.flags,
            pressed: PressedButtons::default(),
            dirty: false,
        }
    }
}

fn clamp_min(bounds: Bounds, min: Size) -> Bounds {
    Bounds::new(
        bounds.x,
        bounds.y,
        bounds.width.max(min.width).max(0),
        bounds.height.max(min.height).max(0),
    )
}

impl ControlTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            dirty: Vec::new(),
            changes: Vec::new(),
        }
    }

    // --- structure ---

    /// Create a detached control.
    ///
    /// A detached control is neither drawn nor hit-tested until it is attached
    /// under a parent with [`ControlTree::attach`] or promoted with
    /// [`ControlTree::add_root`].
    pub fn create(&mut self, props: ControlProps) -> ControlId {
        let idx = match self.free_list.pop() {
            Some(idx) => idx,
            None => {
                self.nodes.push(None);
                self.generations.push(0);
                self.nodes.len() - 1
            }
        };
        let generation = self.generations[idx].saturating_add(1);
        self.generations[idx] = generation;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ControlId uses 32-bit indices by design."
        )]
        let id = ControlId::new(idx as u32, generation);
        self.nodes[idx] = Some(Node::new(id, props));
        self.invalidate(id);
        id
    }

    /// Create a control and attach it under `parent`, or as a displayed root if `None`.
    ///
    /// Children inserted this way go to the parent's client area when it has one.
    pub fn insert(&mut self, parent: Option<ControlId>, props: ControlProps) -> ControlId {
        let id = self.create(props);
        match parent {
            Some(p) => {
                self.attach(p, id, true);
            }
            None => self.add_root(id),
        }
        id
    }

    /// Promote a control to a displayed top-level root, on top of existing roots.
    ///
    /// A control that currently has a parent is detached first.
    pub fn add_root(&mut self, id: ControlId) {
        if !self.is_alive(id) {
            log::warn!("add_root on stale control {id:?}");
            return;
        }
        self.detach(id);
        self.roots.retain(|r| *r != id);
        self.roots.push(id);
        self.invalidate(id);
    }

    /// Attach `child` at the end of `parent`'s children (topmost).
    ///
    /// With `to_client_area`, the child goes under the parent's client area
    /// (see [`ControlTree::make_container`]); without it, or when the parent
    /// has no client area, it becomes a direct child. A child that already has
    /// a parent is detached from it first. Attaching a control under itself or
    /// one of its descendants is refused.
    ///
    /// Returns `true` if the child was attached.
    pub fn attach(&mut self, parent: ControlId, child: ControlId, to_client_area: bool) -> bool {
        self.attach_at(parent, child, to_client_area, None)
    }

    /// Like [`ControlTree::attach`], inserting at `index` in the children list (clamped).
    pub fn attach_at(
        &mut self,
        parent: ControlId,
        child: ControlId,
        to_client_area: bool,
        index: Option<usize>,
    ) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) {
            log::warn!("attach with stale control: parent {parent:?}, child {child:?}");
            return false;
        }
        let target = match self.node(parent).client {
            Some(client) if to_client_area => client,
            _ => parent,
        };
        if self.is_in_subtree(target, child) {
            log::warn!("refusing to attach {child:?} under its own subtree at {target:?}");
            return false;
        }
        if let Some(old) = self.node(child).parent {
            log::debug!("re-parenting {child:?} from {old:?} to {target:?}");
            self.unlink_parent(child, old);
        }
        self.roots.retain(|r| *r != child);
        self.link_parent(child, target, index);
        self.notify(child, Property::Parent);
        self.layout_children(target);
        self.invalidate(child);
        true
    }

    /// Unlink a control from its parent (or from the displayed roots).
    ///
    /// The control and its subtree stay alive as a detached subtree that can be
    /// attached again. Detaching a control that is not attached is a no-op.
    /// Returns `true` if anything changed.
    pub fn detach(&mut self, id: ControlId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
            self.notify(id, Property::Parent);
            return true;
        }
        let before = self.roots.len();
        self.roots.retain(|r| *r != id);
        before != self.roots.len()
    }

    /// Remove a control and its subtree from the tree.
    ///
    /// Children are disposed before their parents. Returns every removed id in
    /// disposal order, so callers can drop side tables keyed by them. Removing a
    /// stale id is a no-op.
    pub fn remove(&mut self, id: ControlId) -> Vec<ControlId> {
        let mut removed = Vec::new();
        if !self.is_alive(id) {
            return removed;
        }
        if let Some(parent) = self.node(id).parent {
            let p = self.node_mut(parent);
            p.children.retain(|c| *c != id);
            if p.client == Some(id) {
                p.client = None;
            }
            self.invalidate(parent);
        }
        self.roots.retain(|r| *r != id);
        self.dispose(id, &mut removed);
        let gone: HashSet<ControlId> = removed.iter().copied().collect();
        self.dirty.retain(|d| !gone.contains(d));
        removed
    }

    /// Give `id` a client area inset by `client_margins` and return it.
    ///
    /// The client area is a structural child holding user content, so chrome
    /// attached without `to_client_area` (scroll bars, title buttons) stays
    /// outside it. It stretches with its container and is transparent to hit
    /// testing: a point inside it that hits no content resolves to the
    /// container. Children attached before the call move into the client area,
    /// keeping their local placement. Calling this again only updates the margins.
    pub fn make_container(&mut self, id: ControlId, client_margins: Margins) -> Option<ControlId> {
        if !self.is_alive(id) {
            return None;
        }
        if let Some(client) = self.node(id).client {
            self.set_client_margins(id, client_margins);
            return Some(client);
        }
        let size = self.node(id).bounds.size();
        let client = self.create(ControlProps {
            name: String::from("client"),
            bounds: Bounds::from_size(size).inset(client_margins),
            anchors: Anchors::ALL,
            ..ControlProps::default()
        });
        self.node_mut(client).is_client_area = true;
        let content = core::mem::take(&mut self.node_mut(id).children);
        self.link_parent(client, id, Some(0));
        let node = self.node_mut(id);
        node.client = Some(client);
        node.client_margins = client_margins;
        for child in content {
            self.link_parent(child, client, None);
            self.notify(child, Property::Parent);
            self.invalidate(child);
        }
        Some(client)
    }

    /// Change the inset of a container's client area.
    ///
    /// The client area is re-placed immediately and its children are laid out
    /// against the new client extent.
    pub fn set_client_margins(&mut self, id: ControlId, margins: Margins) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.client_margins == margins {
            return;
        }
        node.client_margins = margins;
        let size = node.bounds.size();
        if let Some(client) = node.client {
            self.set_bounds(client, Bounds::from_size(size).inset(margins));
        }
        self.notify(id, Property::ClientMargins);
    }

    /// Move a control to the top of its siblings' z-order.
    pub fn bring_to_front(&mut self, id: ControlId) {
        self.restack(id, true);
    }

    /// Move a control to the bottom of its siblings' z-order.
    pub fn send_to_back(&mut self, id: ControlId) {
        self.restack(id, false);
    }

    fn restack(&mut self, id: ControlId, front: bool) {
        if !self.is_alive(id) {
            return;
        }
        let siblings = match self.node(id).parent {
            Some(parent) => &mut self.node_mut(parent).children,
            None if self.roots.contains(&id) => &mut self.roots,
            None => return,
        };
        siblings.retain(|c| *c != id);
        if front {
            siblings.push(id);
        } else {
            siblings.insert(0, id);
        }
        self.invalidate(id);
    }

    // --- geometry ---

    /// Place a control explicitly.
    ///
    /// The rectangle is clamped to the control's minimum size and becomes the
    /// reference for future anchored layout. If the size changed, the
    /// control's children are laid out against it.
    pub fn set_bounds(&mut self, id: ControlId, bounds: Bounds) {
        if !self.is_alive(id) {
            return;
        }
        let parent_size = self.parent_client_size(id);
        let node = self.node_mut(id);
        let bounds = clamp_min(bounds, node.min_size);
        node.reference = Reference {
            bounds,
            parent: parent_size,
        };
        if node.bounds != bounds && self.apply_bounds(id, bounds) {
            self.layout_children(id);
        }
    }

    /// Change the minimum size; the current rectangle grows if needed.
    pub fn set_min_size(&mut self, id: ControlId, min_size: Size) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.min_size == min_size {
            return;
        }
        node.min_size = min_size;
        let clamped = clamp_min(node.bounds, min_size);
        let changed = node.bounds != clamped;
        self.notify(id, Property::MinSize);
        if changed && self.apply_bounds(id, clamped) {
            self.layout_children(id);
        }
    }

    /// Change the anchors. The current placement becomes the new layout reference.
    pub fn set_anchors(&mut self, id: ControlId, anchors: Anchors) {
        if self.node_opt(id).is_none_or(|n| n.anchors == anchors) {
            return;
        }
        self.recapture_reference(id);
        self.node_mut(id).anchors = anchors;
        self.notify(id, Property::Anchors);
    }

    /// Change the margins kept from anchored parent edges.
    pub fn set_margins(&mut self, id: ControlId, margins: Margins) {
        if self.node_opt(id).is_none_or(|n| n.margins == margins) {
            return;
        }
        self.recapture_reference(id);
        self.node_mut(id).margins = margins;
        self.notify(id, Property::Margins);
    }

    fn recapture_reference(&mut self, id: ControlId) {
        let parent = self.parent_client_size(id);
        let node = self.node_mut(id);
        node.reference = Reference {
            bounds: node.bounds,
            parent,
        };
    }

    fn parent_client_size(&self, id: ControlId) -> Size {
        self.node(id)
            .parent
            .map(|p| self.node(p).bounds.size())
            .unwrap_or(Size::ZERO)
    }

    /// Resolve the anchors of every direct child of `id` against its current
    /// size, then recurse into the children whose size changed.
    fn layout_children(&mut self, id: ControlId) {
        let size = self.node(id).bounds.size();
        let children = self.node(id).children.clone();
        let mut resized: SmallVec<[ControlId; 8]> = SmallVec::new();
        for child in children {
            let n = self.node(child);
            let next = if n.reference.parent == size {
                clamp_min(n.reference.bounds, n.min_size)
            } else {
                resolve(
                    n.reference.parent,
                    size,
                    n.anchors,
                    n.margins,
                    n.reference.bounds,
                    n.min_size,
                )
            };
            if next != n.bounds && self.apply_bounds(child, next) {
                resized.push(child);
            }
        }
        for child in resized {
            self.layout_children(child);
        }
    }

    /// Store a new rectangle without touching the layout reference.
    /// Returns whether the size changed.
    fn apply_bounds(&mut self, id: ControlId, bounds: Bounds) -> bool {
        let node = self.node_mut(id);
        let old = node.bounds;
        node.bounds = bounds;
        self.notify(id, Property::Bounds);
        self.invalidate(id);
        self.refresh_absolute(id);
        old.size() != bounds.size()
    }

    /// Recompute the cached absolute rectangles of a subtree.
    fn refresh_absolute(&mut self, id: ControlId) {
        let (ox, oy) = match self.node(id).parent {
            Some(p) => {
                let a = self.node(p).absolute;
                (a.x, a.y)
            }
            None => (0, 0),
        };
        let mut stack = vec![(id, ox, oy)];
        while let Some((id, ox, oy)) = stack.pop() {
            let node = self.node_mut(id);
            node.absolute = node.bounds.translate(ox, oy);
            let abs = node.absolute;
            for &child in node.children.iter().rev() {
                stack.push((child, abs.x, abs.y));
            }
        }
    }

    // --- flags ---

    /// Set the informational name.
    pub fn set_name(&mut self, id: ControlId, name: impl Into<String>) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.name = name.into();
        self.notify(id, Property::Name);
    }

    /// Enable or disable a control (and, effectively, its subtree).
    pub fn set_enabled(&mut self, id: ControlId, enabled: bool) {
        self.set_flag(id, ControlFlags::ENABLED, enabled, Some(Property::Enabled));
    }

    /// Show or hide a control (and, effectively, its subtree).
    pub fn set_visible(&mut self, id: ControlId, visible: bool) {
        self.set_flag(id, ControlFlags::VISIBLE, visible, Some(Property::Visible));
    }

    /// Allow or forbid keyboard focus.
    pub fn set_can_focus(&mut self, id: ControlId, can_focus: bool) {
        self.set_flag(
            id,
            ControlFlags::CAN_FOCUS,
            can_focus,
            Some(Property::CanFocus),
        );
    }

    /// Exclude a control from input (it is still drawn and laid out).
    pub fn set_passive(&mut self, id: ControlId, passive: bool) {
        self.set_flag(id, ControlFlags::PASSIVE, passive, Some(Property::Passive));
    }

    /// Set the checked state of a checkable control.
    pub fn set_checked(&mut self, id: ControlId, checked: bool) {
        self.set_flag(id, ControlFlags::CHECKED, checked, Some(Property::Checked));
    }

    /// Opt a control in or out of double-click recognition.
    pub fn set_double_clicks(&mut self, id: ControlId, enabled: bool) {
        self.set_flag(id, ControlFlags::DOUBLE_CLICKS, enabled, None);
    }

    /// Suspend or resume change notifications for a control.
    ///
    /// While suspended, property changes are applied but not reported, and the
    /// control resolves as disabled. Resuming reports a single
    /// [`Property::Resumed`].
    pub fn set_suspended(&mut self, id: ControlId, suspended: bool) {
        if self.set_flag(id, ControlFlags::SUSPENDED, suspended, None) && !suspended {
            self.notify(id, Property::Resumed);
        }
    }

    /// Set or clear the focused flag. Owned by the input router.
    pub fn set_focused(&mut self, id: ControlId, focused: bool) {
        self.set_flag(id, ControlFlags::FOCUSED, focused, None);
    }

    /// Set or clear the hovered flag. Owned by the input router.
    pub fn set_hovered(&mut self, id: ControlId, hovered: bool) {
        self.set_flag(id, ControlFlags::HOVERED, hovered, None);
    }

    /// Set or clear the inside flag. Owned by the input router.
    pub fn set_inside(&mut self, id: ControlId, inside: bool) {
        self.set_flag(id, ControlFlags::INSIDE, inside, None);
    }

    /// Set the pressed state of one button. Owned by the input router.
    pub fn set_pressed(&mut self, id: ControlId, button: InputButton, pressed: bool) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.pressed.get(button) != pressed {
            node.pressed.set(button, pressed);
            self.invalidate(id);
        }
    }

    fn set_flag(
        &mut self,
        id: ControlId,
        flag: ControlFlags,
        on: bool,
        property: Option<Property>,
    ) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        if node.flags.contains(flag) == on {
            return false;
        }
        node.flags.set(flag, on);
        if let Some(property) = property {
            self.notify(id, property);
        }
        self.invalidate(id);
        true
    }

    fn notify(&mut self, id: ControlId, property: Property) {
        if self
            .node_opt(id)
            .is_some_and(|n| !n.flags.contains(ControlFlags::SUSPENDED))
        {
            self.changes.push(PropertyChange {
                control: id,
                property,
            });
        }
    }

    /// Drain the property change notifications recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<PropertyChange> {
        core::mem::take(&mut self.changes)
    }

    // --- invalidation ---

    /// Mark a control for redraw at the next draw pass.
    ///
    /// Only the control itself is marked; ancestors are not.
    pub fn invalidate(&mut self, id: ControlId) {
        if let Some(node) = self.node_opt_mut(id)
            && !node.dirty
        {
            node.dirty = true;
            self.dirty.push(id);
        }
    }

    /// Whether a control is waiting to be redrawn.
    pub fn is_dirty(&self, id: ControlId) -> bool {
        self.node_opt(id).is_some_and(|n| n.dirty)
    }

    /// Consume the invalidated set.
    pub fn take_damage(&mut self) -> Damage {
        let mut damage = Damage::default();
        for id in core::mem::take(&mut self.dirty) {
            if let Some(node) = self.node_opt_mut(id) {
                node.dirty = false;
                damage.controls.push(id);
                damage.dirty_rects.push(node.absolute.to_rect());
            }
        }
        damage
    }

    // --- queries ---

    /// Return the topmost interactive control under an absolute point.
    ///
    /// Roots and children are searched topmost first, so of two overlapping
    /// siblings the one attached later wins. Invisible, disabled and passive
    /// controls are skipped together with their subtrees, and every control
    /// clips its descendants to its own rectangle.
    pub fn hit_test(&self, point: Point) -> Option<ControlId> {
        self.roots
            .iter()
            .rev()
            .find_map(|&root| self.hit_node(root, point))
    }

    /// Like [`ControlTree::hit_test`], restricted to the subtree rooted at `scope`.
    pub fn hit_test_within(&self, scope: ControlId, point: Point) -> Option<ControlId> {
        if !self.is_alive(scope) || !self.ancestors_allow_input(scope) {
            return None;
        }
        self.hit_node(scope, point)
    }

    fn hit_node(&self, id: ControlId, point: Point) -> Option<ControlId> {
        let node = self.node(id);
        if !node
            .flags
            .contains(ControlFlags::VISIBLE | ControlFlags::ENABLED)
            || node.flags.contains(ControlFlags::PASSIVE)
            || !node.absolute.contains(point)
        {
            return None;
        }
        node.children
            .iter()
            .rev()
            .find_map(|&child| self.hit_node(child, point))
            .or((!node.is_client_area).then_some(id))
    }

    fn ancestors_allow_input(&self, id: ControlId) -> bool {
        let mut current = self.node(id).parent;
        while let Some(p) = current {
            let n = self.node(p);
            if !n.flags.contains(ControlFlags::VISIBLE | ControlFlags::ENABLED) {
                return false;
            }
            current = n.parent;
        }
        true
    }

    /// Whether a control can receive input: it and every ancestor are visible
    /// and enabled, and it is not passive.
    pub fn is_interactive(&self, id: ControlId) -> bool {
        self.node_opt(id).is_some_and(|n| {
            n.flags
                .contains(ControlFlags::VISIBLE | ControlFlags::ENABLED)
                && !n.flags.contains(ControlFlags::PASSIVE)
                && self.ancestors_allow_input(id)
        })
    }

    /// Whether a control and all its ancestors are enabled.
    pub fn is_effectively_enabled(&self, id: ControlId) -> bool {
        self.ancestry_has(id, ControlFlags::ENABLED)
    }

    /// Whether a control and all its ancestors are visible.
    pub fn is_effectively_visible(&self, id: ControlId) -> bool {
        self.ancestry_has(id, ControlFlags::VISIBLE)
    }

    fn ancestry_has(&self, id: ControlId, flag: ControlFlags) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(c) = current {
            let n = self.node(c);
            if !n.flags.contains(flag) {
                return false;
            }
            current = n.parent;
        }
        true
    }

    /// Whether a control can take keyboard focus right now.
    pub fn is_focusable(&self, id: ControlId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(ControlFlags::CAN_FOCUS))
            && self.is_interactive(id)
    }

    /// Returns true if `id` refers to a live control.
    pub fn is_alive(&self, id: ControlId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Whether `id` is `root` or one of its descendants.
    pub fn is_in_subtree(&self, id: ControlId, root: ControlId) -> bool {
        if !self.is_alive(id) || !self.is_alive(root) {
            return false;
        }
        let mut current = Some(id);
        while let Some(c) = current {
            if c == root {
                return true;
            }
            current = self.node(c).parent;
        }
        false
    }

    /// Displayed top-level roots, bottom to top.
    pub fn roots(&self) -> &[ControlId] {
        &self.roots
    }

    /// The top-level ancestor of a control (itself for roots and detached controls).
    pub fn root_of(&self, id: ControlId) -> Option<ControlId> {
        self.node_opt(id).map(|n| n.root)
    }

    /// Returns the parent of a control, or `None` for roots, detached or stale ids.
    pub fn parent_of(&self, id: ControlId) -> Option<ControlId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a control, or an empty slice if it is stale.
    pub fn children_of(&self, id: ControlId) -> &[ControlId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// The client area of a container, if it has one.
    pub fn client_area_of(&self, id: ControlId) -> Option<ControlId> {
        self.node_opt(id).and_then(|n| n.client)
    }

    /// Whether this control is the structural client area of its parent.
    pub fn is_client_area(&self, id: ControlId) -> bool {
        self.node_opt(id).is_some_and(|n| n.is_client_area)
    }

    /// Rectangle in parent client coordinates.
    pub fn bounds(&self, id: ControlId) -> Option<Bounds> {
        self.node_opt(id).map(|n| n.bounds)
    }

    /// Rectangle in absolute (root) coordinates.
    pub fn absolute_bounds(&self, id: ControlId) -> Option<Bounds> {
        self.node_opt(id).map(|n| n.absolute)
    }

    /// Minimum size.
    pub fn min_size(&self, id: ControlId) -> Option<Size> {
        self.node_opt(id).map(|n| n.min_size)
    }

    /// Anchors.
    pub fn anchors(&self, id: ControlId) -> Option<Anchors> {
        self.node_opt(id).map(|n| n.anchors)
    }

    /// Client margins of a container.
    pub fn client_margins(&self, id: ControlId) -> Option<Margins> {
        self.node_opt(id).map(|n| n.client_margins)
    }

    /// Flags of a live control.
    pub fn flags(&self, id: ControlId) -> Option<ControlFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Pressed buttons of a live control.
    pub fn pressed(&self, id: ControlId) -> Option<PressedButtons> {
        self.node_opt(id).map(|n| n.pressed)
    }

    /// Informational name.
    pub fn name(&self, id: ControlId) -> Option<&str> {
        self.node_opt(id).map(|n| n.name.as_str())
    }

    // --- traversal ---

    /// Get the next control in depth-first order (children in z-order).
    ///
    /// Returns `None` past the last control of the tree or for stale ids.
    pub fn next_depth_first(&self, current: ControlId) -> Option<ControlId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first_child) = self.node(current).children.first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    /// Get the previous control in depth-first order.
    pub fn prev_depth_first(&self, current: ControlId) -> Option<ControlId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(prev_sibling) = self.prev_sibling(current) {
            return Some(self.last_in_subtree(prev_sibling));
        }
        self.parent_of(current)
    }

    /// The last control of a subtree in depth-first order.
    pub fn last_in_subtree(&self, id: ControlId) -> ControlId {
        let mut node = id;
        while let Some(&last) = self.children_of(node).last() {
            node = last;
        }
        node
    }

    fn next_sibling(&self, node: ControlId) -> Option<ControlId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn prev_sibling(&self, node: ControlId) -> Option<ControlId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: ControlId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ControlId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: ControlId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ControlId")
    }

    fn node_opt(&self, id: ControlId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ControlId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ControlId, parent: ControlId, index: Option<usize>) {
        let parent_node = self.node_mut(parent);
        match index {
            Some(i) => {
                let i = i.min(parent_node.children.len());
                parent_node.children.insert(i, id);
            }
            None => parent_node.children.push(id),
        }
        let root = parent_node.root;
        let parent_size = parent_node.bounds.size();
        let node = self.node_mut(id);
        node.parent = Some(parent);
        node.reference = Reference {
            bounds: node.bounds,
            parent: parent_size,
        };
        self.set_root(id, root);
        self.refresh_absolute(id);
    }

    fn unlink_parent(&mut self, id: ControlId, parent: ControlId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        if p.client == Some(id) {
            p.client = None;
        }
        self.invalidate(parent);
        self.node_mut(id).parent = None;
        self.set_root(id, id);
        self.refresh_absolute(id);
    }

    fn set_root(&mut self, id: ControlId, root: ControlId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = self.node_mut(id);
            node.root = root;
            stack.extend(node.children.iter().copied());
        }
    }

    fn dispose(&mut self, id: ControlId, removed: &mut Vec<ControlId>) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.dispose(child, removed);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        removed.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn props(x: i32, y: i32, w: i32, h: i32) -> ControlProps {
        ControlProps {
            bounds: Bounds::new(x, y, w, h),
            ..Default::default()
        }
    }

    fn anchored(b: Bounds, anchors: Anchors) -> ControlProps {
        ControlProps {
            bounds: b,
            anchors,
            ..Default::default()
        }
    }

    #[test]
    fn later_sibling_wins_hit_test() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 200, 200));
        let _a = tree.insert(Some(root), props(10, 10, 60, 60));
        let b = tree.insert(Some(root), props(40, 40, 60, 60));

        assert_eq!(tree.hit_test(Point::new(50.0, 50.0)), Some(b));
        assert_eq!(tree.hit_test(Point::new(150.0, 150.0)), Some(root));
        assert_eq!(tree.hit_test(Point::new(250.0, 50.0)), None);
    }

    #[test]
    fn hit_test_returns_deepest_control() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 200, 200));
        let panel = tree.insert(Some(root), props(20, 20, 100, 100));
        let button = tree.insert(Some(panel), props(10, 10, 30, 30));

        assert_eq!(tree.hit_test(Point::new(35.0, 35.0)), Some(button));
        assert_eq!(tree.absolute_bounds(button), Some(Bounds::new(30, 30, 30, 30)));
    }

    #[test]
    fn hit_test_skips_passive_hidden_and_disabled_subtrees() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 100, 100));
        let under = tree.insert(Some(root), props(0, 0, 50, 50));
        let over = tree.insert(Some(root), props(0, 0, 50, 50));
        let inner = tree.insert(Some(over), props(0, 0, 20, 20));
        let p = Point::new(5.0, 5.0);

        assert_eq!(tree.hit_test(p), Some(inner));
        tree.set_passive(over, true);
        assert_eq!(tree.hit_test(p), Some(under));
        tree.set_passive(over, false);
        tree.set_visible(over, false);
        assert_eq!(tree.hit_test(p), Some(under));
        tree.set_visible(over, true);
        tree.set_enabled(over, false);
        assert_eq!(tree.hit_test(p), Some(under));
        assert!(!tree.is_interactive(inner), "disabled ancestor disables the subtree");
    }

    #[test]
    fn scoped_hit_test_ignores_other_roots() {
        let mut tree = ControlTree::new();
        let back = tree.insert(None, props(0, 0, 100, 100));
        let back_child = tree.insert(Some(back), props(0, 0, 50, 50));
        let front = tree.insert(None, props(0, 0, 100, 100));
        let p = Point::new(10.0, 10.0);

        assert_eq!(tree.hit_test(p), Some(front));
        assert_eq!(tree.hit_test_within(back, p), Some(back_child));
        tree.set_enabled(back, false);
        assert_eq!(tree.hit_test_within(back_child, p), None);
    }

    #[test]
    fn children_are_clipped_to_their_parent() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 100, 100));
        let panel = tree.insert(Some(root), props(0, 0, 50, 50));
        let _overflow = tree.insert(Some(panel), props(40, 40, 40, 40));

        assert_eq!(tree.hit_test(Point::new(60.0, 60.0)), Some(root));
    }

    #[test]
    fn client_area_children_offset_and_hit() {
        let mut tree = ControlTree::new();
        let window = tree.insert(None, props(100, 100, 200, 150));
        let client = tree
            .make_container(window, Margins::new(4, 24, 4, 4))
            .unwrap();
        let scrollbar = tree.create(props(184, 24, 12, 122));
        tree.attach(window, scrollbar, false);
        let button = tree.insert(Some(window), props(10, 10, 50, 20));

        assert_eq!(tree.parent_of(button), Some(client));
        assert_eq!(tree.parent_of(scrollbar), Some(window));
        assert_eq!(tree.absolute_bounds(button), Some(Bounds::new(114, 134, 50, 20)));
        assert_eq!(tree.hit_test(Point::new(120.0, 140.0)), Some(button));
        // Empty client space resolves to the container, never to the client area itself.
        assert_eq!(tree.hit_test(Point::new(250.0, 200.0)), Some(window));
        assert_eq!(tree.hit_test(Point::new(290.0, 200.0)), Some(scrollbar));
    }

    #[test]
    fn make_container_moves_existing_children_into_the_client_area() {
        let mut tree = ControlTree::new();
        let window = tree.insert(None, props(100, 100, 200, 150));
        let fill = tree.insert(
            Some(window),
            anchored(Bounds::new(0, 0, 192, 122), Anchors::ALL),
        );
        let label = tree.insert(Some(window), props(10, 10, 50, 20));

        let client = tree
            .make_container(window, Margins::new(4, 24, 4, 4))
            .unwrap();
        assert_eq!(tree.children_of(window), &[client]);
        assert_eq!(tree.children_of(client), &[fill, label]);
        assert_eq!(tree.absolute_bounds(label), Some(Bounds::new(114, 134, 50, 20)));
        assert_eq!(tree.hit_test(Point::new(120.0, 140.0)), Some(label));

        // Layout now follows the client extent, not the container's.
        tree.set_bounds(window, Bounds::new(100, 100, 220, 160));
        assert_eq!(tree.bounds(fill), Some(Bounds::new(0, 0, 212, 132)));
    }

    #[test]
    fn resizing_a_window_lays_out_through_its_client_area() {
        let mut tree = ControlTree::new();
        let window = tree.insert(None, props(0, 0, 200, 100));
        tree.make_container(window, Margins::all(5));
        let fill = tree.insert(
            Some(window),
            anchored(Bounds::new(0, 0, 190, 90), Anchors::ALL),
        );

        tree.set_bounds(window, Bounds::new(0, 0, 300, 150));
        assert_eq!(tree.bounds(fill), Some(Bounds::new(0, 0, 290, 140)));

        tree.set_client_margins(window, Margins::all(10));
        assert_eq!(tree.bounds(fill), Some(Bounds::new(0, 0, 280, 130)));
    }

    #[test]
    fn anchored_layout_matches_documented_scenarios() {
        let mut tree = ControlTree::new();
        let panel = tree.insert(None, props(0, 0, 200, 100));
        let fixed = tree.insert(
            Some(panel),
            anchored(Bounds::new(10, 10, 50, 20), Anchors::LEFT | Anchors::TOP),
        );
        let stretched = tree.insert(
            Some(panel),
            anchored(
                Bounds::new(10, 40, 180, 20),
                Anchors::LEFT | Anchors::RIGHT | Anchors::TOP,
            ),
        );

        tree.set_bounds(panel, Bounds::new(0, 0, 400, 100));
        assert_eq!(tree.bounds(fixed), Some(Bounds::new(10, 10, 50, 20)));
        assert_eq!(tree.bounds(stretched), Some(Bounds::new(10, 40, 380, 20)));
    }

    #[test]
    fn resize_round_trip_is_exact_even_with_rounding() {
        let mut tree = ControlTree::new();
        let panel = tree.insert(None, props(0, 0, 203, 97));
        let mut kids = vec![];
        for bits in 0_u8..16 {
            let b = Bounds::new(11 + i32::from(bits), 7, 33, 13);
            kids.push((
                tree.insert(Some(panel), anchored(b, Anchors::from_bits_truncate(bits))),
                b,
            ));
        }
        tree.set_bounds(panel, Bounds::new(0, 0, 517, 301));
        tree.set_bounds(panel, Bounds::new(0, 0, 0, 0));
        tree.set_bounds(panel, Bounds::new(0, 0, 203, 97));
        for (id, original) in kids {
            assert_eq!(tree.bounds(id), Some(original));
        }
    }

    #[test]
    fn nested_resize_propagates_only_through_resized_children() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 100, 100));
        let stretch = tree.insert(Some(root), anchored(Bounds::new(0, 0, 100, 50), Anchors::ALL));
        let leaf = tree.insert(
            Some(stretch),
            anchored(Bounds::new(60, 0, 40, 10), Anchors::RIGHT | Anchors::TOP),
        );
        tree.take_changes();

        tree.set_bounds(root, Bounds::new(0, 0, 200, 100));
        assert_eq!(tree.bounds(stretch), Some(Bounds::new(0, 0, 200, 50)));
        assert_eq!(tree.bounds(leaf), Some(Bounds::new(160, 0, 40, 10)));
        assert_eq!(tree.absolute_bounds(leaf), Some(Bounds::new(160, 0, 40, 10)));
    }

    #[test]
    fn attach_reparents_instead_of_duplicating() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 300, 300));
        let a = tree.insert(Some(root), props(0, 0, 100, 100));
        let b = tree.insert(Some(root), props(150, 150, 100, 100));
        let child = tree.insert(Some(a), props(10, 10, 10, 10));

        assert!(tree.attach(b, child, true));
        assert!(tree.children_of(a).is_empty());
        assert_eq!(tree.children_of(b), &[child]);
        assert_eq!(tree.absolute_bounds(child), Some(Bounds::new(160, 160, 10, 10)));
        assert_eq!(tree.root_of(child), Some(root));
    }

    #[test]
    fn attach_refuses_cycles() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 100, 100));
        let child = tree.insert(Some(root), props(0, 0, 10, 10));

        assert!(!tree.attach(child, root, false));
        assert!(!tree.attach(child, child, false));
        assert_eq!(tree.parent_of(child), Some(root));
    }

    #[test]
    fn detach_is_a_noop_for_non_members() {
        let mut tree = ControlTree::new();
        let loose = tree.create(props(0, 0, 10, 10));
        assert!(!tree.detach(loose));

        let root = tree.insert(None, props(0, 0, 100, 100));
        let child = tree.insert(Some(root), props(5, 5, 10, 10));
        assert!(tree.detach(child));
        assert!(!tree.detach(child));
        assert!(tree.is_alive(child));
        assert_eq!(tree.root_of(child), Some(child));
        assert_eq!(tree.absolute_bounds(child), Some(Bounds::new(5, 5, 10, 10)));
        assert_eq!(tree.hit_test(Point::new(7.0, 7.0)), Some(root));
    }

    #[test]
    fn remove_disposes_children_first() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 100, 100));
        let panel = tree.insert(Some(root), props(0, 0, 50, 50));
        let a = tree.insert(Some(panel), props(0, 0, 10, 10));
        let b = tree.insert(Some(panel), props(10, 0, 10, 10));

        let removed = tree.remove(panel);
        assert_eq!(removed, vec![a, b, panel]);
        assert!(!tree.is_alive(a));
        assert!(tree.children_of(root).is_empty());

        // Slots are reused with a bumped generation.
        let c = tree.insert(Some(root), props(0, 0, 10, 10));
        assert!(!tree.is_alive(panel));
        assert!(tree.is_alive(c));
        assert!(tree.remove(panel).is_empty());
    }

    #[test]
    fn remove_drops_pending_damage_of_the_subtree() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 100, 100));
        let panel = tree.insert(Some(root), props(0, 0, 50, 50));
        let a = tree.insert(Some(panel), props(0, 0, 10, 10));
        let b = tree.insert(Some(panel), props(10, 0, 10, 10));
        let _ = tree.take_damage();

        tree.set_hovered(a, true);
        tree.set_hovered(b, true);
        tree.remove(panel);
        assert_eq!(tree.take_damage().controls, vec![root]);
    }

    #[test]
    fn invalidation_marks_only_the_control() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 100, 100));
        let child = tree.insert(Some(root), props(0, 0, 10, 10));
        let _ = tree.take_damage();

        tree.set_hovered(child, true);
        assert!(tree.is_dirty(child));
        assert!(!tree.is_dirty(root));

        let damage = tree.take_damage();
        assert_eq!(damage.controls, vec![child]);
        assert!(!tree.is_dirty(child));
        assert!(tree.take_damage().is_empty());
    }

    #[test]
    fn suspended_controls_hold_back_notifications() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 100, 100));
        let _ = tree.take_changes();

        tree.set_suspended(root, true);
        tree.set_bounds(root, Bounds::new(0, 0, 120, 100));
        tree.set_enabled(root, false);
        assert!(tree.take_changes().is_empty());

        tree.set_suspended(root, false);
        assert_eq!(
            tree.take_changes(),
            vec![PropertyChange {
                control: root,
                property: Property::Resumed
            }]
        );
    }

    #[test]
    fn depth_first_traversal_follows_child_order() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 100, 100));
        let a = tree.insert(Some(root), props(0, 0, 10, 10));
        let a1 = tree.insert(Some(a), props(0, 0, 5, 5));
        let b = tree.insert(Some(root), props(0, 0, 10, 10));

        assert_eq!(tree.next_depth_first(root), Some(a));
        assert_eq!(tree.next_depth_first(a), Some(a1));
        assert_eq!(tree.next_depth_first(a1), Some(b));
        assert_eq!(tree.next_depth_first(b), None);
        assert_eq!(tree.prev_depth_first(b), Some(a1));
        assert_eq!(tree.prev_depth_first(a), Some(root));
        assert_eq!(tree.last_in_subtree(root), b);
    }

    #[test]
    fn bring_to_front_changes_hit_order() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 100, 100));
        let a = tree.insert(Some(root), props(0, 0, 50, 50));
        let b = tree.insert(Some(root), props(0, 0, 50, 50));
        let p = Point::new(10.0, 10.0);

        assert_eq!(tree.hit_test(p), Some(b));
        tree.bring_to_front(a);
        assert_eq!(tree.hit_test(p), Some(a));
        tree.send_to_back(a);
        assert_eq!(tree.hit_test(p), Some(b));
    }

    #[test]
    fn min_size_applies_immediately() {
        let mut tree = ControlTree::new();
        let root = tree.insert(None, props(0, 0, 10, 10));
        tree.set_min_size(root, Size::new(40, 5));
        assert_eq!(tree.bounds(root), Some(Bounds::new(0, 0, 40, 10)));
    }
}
