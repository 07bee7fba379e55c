// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The UI context: one owner for the tree, the widgets and all routing state.

use alloc::{boxed::Box, vec::Vec};
use core::time::Duration;
use hashbrown::HashMap;
use kurbo::{Point, Rect};
use thicket_anchor::{Margins, Size};
use thicket_control_tree::{
    ControlFlags, ControlId, ControlProps, ControlTree, Damage, InputButton, PropertyChange,
};
use thicket_event_state::click::ClickState;

use crate::config::UiConfig;
use crate::event::UiEvent;
use crate::menu::Menus;
use crate::modal::ModalStack;
use crate::render::{DrawItem, Renderer, Skin};
use crate::widget::{Capabilities, Request, Widget, WidgetCx};

type Observer = Box<dyn FnMut(&PropertyChange)>;

/// The process-wide UI state.
///
/// Owns the [`ControlTree`], the [`Widget`] strategy of each control, keyboard
/// focus, hover, pointer capture, the modal chain and the open menus. The host
/// constructs one context, feeds it input through `dispatch_*`, calls
/// [`UiContext::update`] and [`UiContext::draw`] once per frame, and drains
/// [`UiEvent`]s with [`UiContext::take_events`].
///
/// Everything runs synchronously on the caller's thread: each call completes
/// all of its effects, including requests queued by widget hooks, before it
/// returns.
pub struct UiContext {
    pub(crate) tree: ControlTree,
    pub(crate) widgets: HashMap<ControlId, Box<dyn Widget>>,
    observers: HashMap<ControlId, Vec<Observer>>,
    pub(crate) config: UiConfig,
    pub(crate) clock: Duration,
    pub(crate) focused: Option<ControlId>,
    pub(crate) hovered: Option<ControlId>,
    pub(crate) capture: Option<(ControlId, InputButton)>,
    pub(crate) pointer: Point,
    pub(crate) click: ClickState<ControlId, InputButton>,
    pub(crate) modals: ModalStack,
    pub(crate) menus: Menus,
    pub(crate) requests: Vec<Request>,
    draining: bool,
    pub(crate) events: Vec<UiEvent>,
}

impl core::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UiContext")
            .field("tree", &self.tree)
            .field("widgets", &self.widgets.len())
            .field("focused", &self.focused)
            .field("hovered", &self.hovered)
            .field("capture", &self.capture)
            .field("modals", &self.modals)
            .field("menus", &self.menus)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl UiContext {
    /// Create a context with an empty tree.
    pub fn new(config: UiConfig) -> Self {
        let click = ClickState::with_thresholds(
            millis(config.double_click_time),
            config.double_click_distance,
        );
        Self {
            tree: ControlTree::new(),
            widgets: HashMap::new(),
            observers: HashMap::new(),
            config,
            clock: Duration::ZERO,
            focused: None,
            hovered: None,
            capture: None,
            pointer: Point::ZERO,
            click,
            modals: ModalStack::default(),
            menus: Menus::default(),
            requests: Vec::new(),
            draining: false,
            events: Vec::new(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: UiConfig) {
        self.click.double_click_time = millis(config.double_click_time);
        self.click.double_click_distance = config.double_click_distance;
        self.config = config;
    }

    /// The control tree.
    pub fn tree(&self) -> &ControlTree {
        &self.tree
    }

    /// The control tree, for direct geometry and flag changes.
    ///
    /// Removing controls through the tree skips the context's bookkeeping;
    /// prefer [`UiContext::remove`].
    pub fn tree_mut(&mut self) -> &mut ControlTree {
        &mut self.tree
    }

    /// Total time fed to [`UiContext::update`].
    pub fn now(&self) -> Duration {
        self.clock
    }

    pub(crate) fn now_ms(&self) -> u64 {
        millis(self.clock)
    }

    /// The control holding keyboard focus.
    pub fn focused(&self) -> Option<ControlId> {
        self.focused
    }

    /// The control under the pointer.
    pub fn hovered(&self) -> Option<ControlId> {
        self.hovered
    }

    /// The control holding pointer capture, and the button that holds it.
    pub fn captured(&self) -> Option<(ControlId, InputButton)> {
        self.capture
    }

    /// Last known pointer position.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Drain the notifications produced since the last call.
    pub fn take_events(&mut self) -> Vec<UiEvent> {
        core::mem::take(&mut self.events)
    }

    // --- controls and widgets ---

    /// Create a plain control under `parent` (into its client area) or as a root.
    pub fn add_control(&mut self, parent: Option<ControlId>, props: ControlProps) -> ControlId {
        let id = self.tree.insert(parent, props);
        self.flush_changes();
        id
    }

    /// Create a control driven by `widget` under `parent` (into its client
    /// area) or as a root.
    ///
    /// Capabilities are applied on creation: focusable kinds get
    /// `CAN_FOCUS`, containers get a client area.
    pub fn add_widget(
        &mut self,
        parent: Option<ControlId>,
        props: ControlProps,
        widget: impl Widget + 'static,
    ) -> ControlId {
        let id = self.create_widget(props, Box::new(widget));
        match parent {
            Some(parent) => {
                self.tree.attach(parent, id, true);
            }
            None => self.tree.add_root(id),
        }
        self.flush_changes();
        id
    }

    /// Create a detached control driven by `widget`.
    pub(crate) fn create_widget(&mut self, props: ControlProps, widget: Box<dyn Widget>) -> ControlId {
        let id = self.tree.create(props);
        self.set_widget(id, widget);
        id
    }

    /// Install or replace the widget of a control.
    pub fn set_widget(&mut self, id: ControlId, widget: Box<dyn Widget>) {
        if !self.tree.is_alive(id) {
            log::warn!("set_widget on stale control {id:?}");
            return;
        }
        let caps = widget.capabilities();
        if caps.contains(Capabilities::CAN_FOCUS) {
            self.tree.set_can_focus(id, true);
        }
        if caps.contains(Capabilities::CONTAINER) {
            self.tree.make_container(id, Margins::ZERO);
        }
        self.widgets.insert(id, widget);
        self.tree.invalidate(id);
    }

    /// The widget of a control.
    pub fn widget(&self, id: ControlId) -> Option<&dyn Widget> {
        self.widgets.get(&id).map(|w| &**w)
    }

    /// Kind name of a control: its widget's kind, or `"Control"`.
    pub fn kind_of(&self, id: ControlId) -> &'static str {
        self.widgets.get(&id).map_or("Control", |w| w.kind())
    }

    /// Capabilities of a control's widget.
    pub fn capabilities(&self, id: ControlId) -> Capabilities {
        self.widgets
            .get(&id)
            .map_or(Capabilities::empty(), |w| w.capabilities())
    }

    /// Apply the skin's geometry hints for the control's kind.
    ///
    /// Only existence is checked: a kind the skin does not know is left alone.
    pub fn apply_skin(&mut self, id: ControlId, skin: &dyn Skin) {
        let Some(hints) = skin.control(self.kind_of(id)) else {
            return;
        };
        if hints.min_size != Size::ZERO {
            self.tree.set_min_size(id, hints.min_size);
        }
        if self.tree.client_area_of(id).is_some() {
            self.tree.set_client_margins(id, hints.client_margins);
        }
        self.flush_changes();
    }

    /// Set the checked state of a checkable control, reporting the change.
    ///
    /// Widgets without [`Capabilities::CHECKABLE`] keep their state; plain
    /// controls accept it.
    pub fn set_checked(&mut self, id: ControlId, checked: bool) {
        if self
            .widgets
            .get(&id)
            .is_some_and(|w| !w.capabilities().contains(Capabilities::CHECKABLE))
        {
            log::debug!("{id:?} is not checkable; ignoring checked = {checked}");
            return;
        }
        if self
            .tree
            .flags(id)
            .is_some_and(|f| f.contains(ControlFlags::CHECKED) != checked)
        {
            self.tree.set_checked(id, checked);
            self.events.push(UiEvent::CheckedChanged {
                control: id,
                checked,
            });
        }
    }

    /// Remove a control and its subtree, with all routing state that referred
    /// to them.
    ///
    /// A removed modal container leaves the modal chain, a removed menu
    /// instance closes its level, and focus inside the removed subtree moves
    /// back to where the modal chain says it belongs.
    pub fn remove(&mut self, id: ControlId) {
        if !self.tree.is_alive(id) {
            return;
        }
        let removed = self.tree.remove(id);
        let mut restore = None;
        for r in &removed {
            self.widgets.remove(r);
            self.observers.remove(r);
            self.click.forget(r);
            if let Some((record, true)) = self.modals.unlink(*r) {
                restore = record.restore_focus;
            }
        }
        if self.hovered.is_some_and(|h| removed.contains(&h)) {
            self.hovered = None;
        }
        if self.capture.is_some_and(|(c, _)| removed.contains(&c)) {
            self.capture = None;
        }
        self.prune_menus();
        if self.focused.is_some_and(|f| removed.contains(&f)) {
            let target = self.restore_target(restore, id);
            self.change_focus(target);
        }
        self.drain_requests();
        self.flush_changes();
    }

    // --- observers ---

    /// Register a callback for property changes of a control.
    ///
    /// Changes are delivered synchronously, in order, at the end of each
    /// context call (or on [`UiContext::flush_changes`] after direct tree
    /// edits). Observers of a removed control are dropped with it.
    pub fn observe(&mut self, id: ControlId, observer: impl FnMut(&PropertyChange) + 'static) {
        self.observers
            .entry(id)
            .or_default()
            .push(Box::new(observer));
    }

    /// Deliver pending property changes to their observers.
    pub fn flush_changes(&mut self) {
        for change in self.tree.take_changes() {
            if let Some(list) = self.observers.get_mut(&change.control) {
                for observer in list.iter_mut() {
                    observer(&change);
                }
            }
        }
    }

    // --- widget hooks ---

    /// Run a widget hook. The widget is taken out of the map for the duration
    /// of the call, so the hook can read the tree while being borrowed mutably.
    pub(crate) fn with_widget<R>(
        &mut self,
        id: ControlId,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetCx<'_>) -> R,
    ) -> Option<R> {
        let mut widget = self.widgets.remove(&id)?;
        let result = {
            let mut cx = WidgetCx {
                tree: &self.tree,
                id,
                focused: self.focused,
                modal: self.modals.top(),
                now: self.clock,
                requests: &mut self.requests,
            };
            f(widget.as_mut(), &mut cx)
        };
        self.widgets.insert(id, widget);
        Some(result)
    }

    /// Apply queued widget requests until none are left.
    pub(crate) fn drain_requests(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;
        while !self.requests.is_empty() {
            for request in core::mem::take(&mut self.requests) {
                self.apply_request(request);
            }
        }
        self.draining = false;
    }

    fn apply_request(&mut self, request: Request) {
        log::trace!("applying {request:?}");
        match request {
            Request::SetChecked(id, checked) => self.set_checked(id, checked),
            Request::CheckExclusive(id) => {
                if let Some(parent) = self.tree.parent_of(id) {
                    let siblings: Vec<ControlId> = self.tree.children_of(parent).to_vec();
                    for sibling in siblings {
                        if sibling != id && self.capabilities(sibling).contains(Capabilities::RADIO)
                        {
                            self.set_checked(sibling, false);
                        }
                    }
                }
                self.set_checked(id, true);
            }
            Request::CloseModal(container, result) => {
                self.pop_modal(container, result);
            }
            Request::CloseEnclosingModal(id, result) => {
                let mut current = Some(id);
                while let Some(c) = current {
                    if self.modals.contains(c) {
                        self.pop_modal(c, result);
                        return;
                    }
                    current = self.tree.parent_of(c);
                }
                log::debug!("{id:?} is not inside a modal; nothing to close");
            }
            Request::Focus(target) => {
                self.focus(target);
            }
            Request::Emit(event) => self.events.push(event),
        }
    }

    // --- frame ---

    /// Advance the frame.
    ///
    /// Walks the visible controls top-down calling [`Widget::update`], drives
    /// the menu refresh timers, and drops focus, hover or capture held by
    /// controls that stopped being interactive.
    pub fn update(&mut self, elapsed: Duration) {
        self.clock += elapsed;

        let mut order = Vec::new();
        for &root in self.tree.roots() {
            self.collect_visible(root, &mut order);
        }
        for id in order {
            self.with_widget(id, |w, cx| w.update(cx, elapsed));
        }

        self.update_menus(elapsed);

        if self.focused.is_some_and(|f| !self.tree.is_focusable(f)) {
            log::debug!("focused control is no longer focusable");
            self.change_focus(None);
        }
        if self.hovered.is_some_and(|h| !self.tree.is_interactive(h)) {
            self.set_hover(None);
        }
        if self.capture.is_some_and(|(c, _)| !self.tree.is_interactive(c)) {
            self.cancel_capture();
        }

        self.drain_requests();
        self.flush_changes();
    }

    fn collect_visible(&self, id: ControlId, out: &mut Vec<ControlId>) {
        if !self
            .tree
            .flags(id)
            .is_some_and(|f| f.contains(ControlFlags::VISIBLE))
        {
            return;
        }
        out.push(id);
        for &child in self.tree.children_of(id) {
            self.collect_visible(child, out);
        }
    }

    /// Draw every visible control, bottom to top, and consume the damage.
    ///
    /// Geometry is not touched: the returned [`Damage`] lists what was
    /// invalidated since the previous draw, and every item reports whether it
    /// is part of it.
    pub fn draw(&mut self, renderer: &mut dyn Renderer, skin: &dyn Skin) -> Damage {
        let damage = self.tree.take_damage();
        for &root in self.tree.roots() {
            self.draw_subtree(root, None, &damage, renderer, skin);
        }
        damage
    }

    fn draw_subtree(
        &self,
        id: ControlId,
        parent_clip: Option<Rect>,
        damage: &Damage,
        renderer: &mut dyn Renderer,
        skin: &dyn Skin,
    ) {
        let (Some(flags), Some(bounds)) = (self.tree.flags(id), self.tree.absolute_bounds(id))
        else {
            return;
        };
        if !flags.contains(ControlFlags::VISIBLE) {
            return;
        }
        let rect = bounds.to_rect();
        let clip = parent_clip.map_or(rect, |c| c.intersect(rect));

        if !self.tree.is_client_area(id) {
            let kind = self.kind_of(id);
            let item = DrawItem {
                control: id,
                kind,
                name: self.tree.name(id).unwrap_or_default(),
                rect,
                clip,
                state: self
                    .tree
                    .state(id, self.config.design_mode)
                    .unwrap_or(thicket_control_tree::ControlState::Disabled),
                checked: flags.contains(ControlFlags::CHECKED),
                layer: skin.control(kind).map(|s| s.layer),
                damaged: damage.controls.contains(&id),
            };
            match self.widgets.get(&id) {
                Some(widget) => widget.draw(&item, renderer),
                None => renderer.draw_control(&item),
            }
            self.draw_menu_items(id, clip, renderer);
        }

        for &child in self.tree.children_of(id) {
            self.draw_subtree(child, Some(clip), damage, renderer, skin);
        }
    }

    /// Tear the context down: remove every root and clear all routing state.
    pub fn shutdown(&mut self) {
        let roots = self.tree.roots().to_vec();
        for root in roots.into_iter().rev() {
            self.remove(root);
        }
        self.change_focus(None);
        self.tree = ControlTree::new();
        self.widgets.clear();
        self.observers.clear();
        self.hovered = None;
        self.capture = None;
        self.click.clear();
        self.modals.clear();
        self.menus.clear();
        self.requests.clear();
    }
}
