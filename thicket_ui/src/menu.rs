// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascading menus.
//!
//! A menu pairs a persistent tree of [`MenuItem`]s with a chain of transient
//! instances: level 0 is the menu's own control (a menu bar or a popup list)
//! and every deeper level is a submenu control spawned next to the selected
//! item of the level above. Only one chain is open per menu, so selecting a
//! different item at some level first disposes everything below it.
//!
//! Dismissing a menu disposes its submenu controls and clears the selection
//! of level 0. The item tree is never touched by navigation.

use alloc::{boxed::Box, string::String, vec::Vec};
use core::time::Duration;
use hashbrown::HashMap;
use kurbo::{Point, Rect};
use smallvec::SmallVec;
use thicket_anchor::{Bounds, Size};
use thicket_control_tree::{ControlId, ControlProps};

use crate::config::UiConfig;
use crate::context::UiContext;
use crate::dispatch::Outcome;
use crate::event::{Key, PadButton, UiEvent};
use crate::input::Routed;
use crate::render::{MenuItemDraw, Renderer, SkinLayer};
use crate::widget::{Capabilities, Widget};

/// Identifier of a menu within a [`UiContext`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(u32);

/// Layout direction of a menu's top level. Submenus are always vertical.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items side by side, like a menu bar.
    Horizontal,
    /// Items stacked, like a popup list.
    #[default]
    Vertical,
}

/// One entry of a menu's item tree.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuItem {
    /// Display text.
    pub text: String,
    /// Disabled items can be highlighted but not activated or opened.
    pub enabled: bool,
    /// Optional icon layer.
    pub icon: Option<SkinLayer>,
    /// Items of the submenu this item opens.
    pub children: Vec<MenuItem>,
    /// Leave a separator gap before this item.
    pub separated: bool,
}

impl MenuItem {
    /// An enabled leaf item.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            enabled: true,
            icon: None,
            children: Vec::new(),
            separated: false,
        }
    }

    /// This item with a submenu.
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// This item with one more submenu entry.
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// This item, disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// This item, preceded by a separator.
    pub fn separated(mut self) -> Self {
        self.separated = true;
        self
    }

    /// This item with an icon.
    pub fn with_icon(mut self, icon: SkinLayer) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Whether the item opens a submenu.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// One open level of a menu.
#[derive(Clone, Debug)]
struct MenuInstance {
    control: ControlId,
    /// Indices leading from the top level to this level's item list.
    path: SmallVec<[usize; 4]>,
    selected: Option<usize>,
    /// The instance that spawned this one.
    parent: Option<ControlId>,
    /// Level 0 of the chain.
    root: ControlId,
}

#[derive(Clone, Debug)]
struct Menu {
    items: Vec<MenuItem>,
    orientation: Orientation,
    chain: Vec<MenuInstance>,
    refresh: Duration,
}

impl Menu {
    fn orientation_at(&self, level: usize) -> Orientation {
        if level == 0 {
            self.orientation
        } else {
            Orientation::Vertical
        }
    }

    fn is_open(&self) -> bool {
        self.chain.len() > 1 || self.chain.first().is_some_and(|i| i.selected.is_some())
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Menus {
    map: HashMap<MenuId, Menu>,
    next: u32,
}

impl Menus {
    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}

/// Widget of menu instance controls.
#[derive(Clone, Debug)]
struct MenuPanel {
    kind: &'static str,
}

impl Widget for MenuPanel {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CAN_FOCUS
    }
}

fn items_at<'a>(mut items: &'a [MenuItem], path: &[usize]) -> Option<&'a [MenuItem]> {
    for &index in path {
        items = &items.get(index)?.children;
    }
    Some(items)
}

/// Absolute rectangles of `items` laid out from the origin of `frame`.
pub(crate) fn item_rects(
    items: &[MenuItem],
    orientation: Orientation,
    frame: Bounds,
    config: &UiConfig,
) -> Vec<Bounds> {
    let mut offset = 0;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if item.separated && i > 0 {
            offset += config.menu_separator_height;
        }
        match orientation {
            Orientation::Vertical => {
                out.push(Bounds::new(
                    frame.x,
                    frame.y + offset,
                    frame.width,
                    config.menu_item_height,
                ));
                offset += config.menu_item_height;
            }
            Orientation::Horizontal => {
                out.push(Bounds::new(
                    frame.x + offset,
                    frame.y,
                    config.menu_bar_item_width,
                    frame.height,
                ));
                offset += config.menu_bar_item_width;
            }
        }
    }
    out
}

fn list_size(items: &[MenuItem], config: &UiConfig) -> Size {
    let height = item_rects(
        items,
        Orientation::Vertical,
        Bounds::ZERO,
        config,
    )
    .last()
    .map_or(0, |r| r.bottom());
    Size::new(config.menu_width, height)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Nav {
    Next,
    Prev,
    First,
    Last,
    Descend,
    Activate,
    Back,
    Close,
}

fn nav_for(input: Routed, orientation: Orientation, level: usize) -> Option<Nav> {
    use Orientation::{Horizontal, Vertical};
    let back = if level > 0 { Nav::Back } else { Nav::Close };
    let nav = match input {
        Routed::Key(e) if e.pressed => match (e.key, orientation) {
            (Key::Down, Vertical) | (Key::Right, Horizontal) => Nav::Next,
            (Key::Up, Vertical) | (Key::Left, Horizontal) => Nav::Prev,
            (Key::Right, Vertical) | (Key::Down, Horizontal) => Nav::Descend,
            (Key::Left, Vertical) if level > 0 => Nav::Back,
            (Key::Home, _) => Nav::First,
            (Key::End, _) => Nav::Last,
            (Key::Enter | Key::Space, _) => Nav::Activate,
            (Key::Escape, _) => back,
            _ => return None,
        },
        Routed::Pad(e) if e.pressed => match (e.button, orientation) {
            (PadButton::Down, Vertical) | (PadButton::Right, Horizontal) => Nav::Next,
            (PadButton::Up, Vertical) | (PadButton::Left, Horizontal) => Nav::Prev,
            (PadButton::Right, Vertical) | (PadButton::Down, Horizontal) => Nav::Descend,
            (PadButton::Left, Vertical) if level > 0 => Nav::Back,
            (PadButton::A, _) => Nav::Activate,
            (PadButton::B, _) => back,
            _ => return None,
        },
        _ => return None,
    };
    Some(nav)
}

impl UiContext {
    /// Create a menu over `items` with a level-0 control at `bounds`, under
    /// `parent` (into its client area) or as a root.
    ///
    /// Submenus are spawned under the top-level ancestor of that control, or
    /// as separate roots when the menu control is itself a root.
    pub fn create_menu(
        &mut self,
        parent: Option<ControlId>,
        bounds: Bounds,
        orientation: Orientation,
        items: Vec<MenuItem>,
    ) -> MenuId {
        let kind = match orientation {
            Orientation::Horizontal => "MenuBar",
            Orientation::Vertical => "Menu",
        };
        let control = self.create_widget(
            ControlProps {
                name: String::from(kind),
                bounds,
                ..ControlProps::default()
            },
            Box::new(MenuPanel { kind }),
        );
        self.tree.set_double_clicks(control, false);
        match parent {
            Some(parent) => {
                self.tree.attach(parent, control, true);
            }
            None => self.tree.add_root(control),
        }

        let id = MenuId(self.menus.next);
        self.menus.next += 1;
        self.menus.map.insert(
            id,
            Menu {
                items,
                orientation,
                chain: alloc::vec![MenuInstance {
                    control,
                    path: SmallVec::new(),
                    selected: None,
                    parent: None,
                    root: control,
                }],
                refresh: Duration::ZERO,
            },
        );
        self.flush_changes();
        id
    }

    /// The item tree of a menu.
    pub fn menu_items(&self, menu: MenuId) -> Option<&[MenuItem]> {
        self.menus.map.get(&menu).map(|m| m.items.as_slice())
    }

    /// Edit the item tree of a menu.
    ///
    /// Open levels pick the edit up at the next refresh tick: selections are
    /// clamped and levels whose item no longer exists are closed.
    pub fn menu_items_mut(&mut self, menu: MenuId) -> Option<&mut Vec<MenuItem>> {
        self.menus.map.get_mut(&menu).map(|m| &mut m.items)
    }

    /// The level-0 control of a menu.
    pub fn menu_control(&self, menu: MenuId) -> Option<ControlId> {
        self.menus
            .map
            .get(&menu)
            .and_then(|m| m.chain.first())
            .map(|i| i.control)
    }

    /// Controls of the open levels, from level 0 down.
    pub fn menu_instances(&self, menu: MenuId) -> Vec<ControlId> {
        self.menus
            .map
            .get(&menu)
            .map(|m| m.chain.iter().map(|i| i.control).collect())
            .unwrap_or_default()
    }

    /// Selected item index of an open level.
    pub fn menu_selection(&self, menu: MenuId, level: usize) -> Option<usize> {
        self.menus.map.get(&menu)?.chain.get(level)?.selected
    }

    /// The menu and level a control is an instance of.
    pub fn menu_of(&self, control: ControlId) -> Option<(MenuId, usize)> {
        self.menus.map.iter().find_map(|(id, m)| {
            m.chain
                .iter()
                .position(|i| i.control == control)
                .map(|level| (*id, level))
        })
    }

    pub(crate) fn is_submenu(&self, control: ControlId) -> bool {
        self.menu_of(control).is_some_and(|(_, level)| level > 0)
    }

    /// Select an item of an open level, as hovering it would.
    ///
    /// Indices past the end are clamped to the last item. Selecting an
    /// enabled item with children opens its submenu.
    pub fn select_menu_item(&mut self, menu: MenuId, level: usize, index: Option<usize>) {
        let Some(count) = self.level_items(menu, level).map(<[MenuItem]>::len) else {
            return;
        };
        let index = index.and_then(|i| {
            let last = count.checked_sub(1)?;
            if i > last {
                log::debug!("clamping menu selection {i} to {last}");
            }
            Some(i.min(last))
        });
        self.select(menu, level, index);
        self.drain_requests();
        self.flush_changes();
    }

    /// Close every submenu of a menu and clear its top-level selection.
    pub fn dismiss_menu(&mut self, menu: MenuId) {
        self.close_levels(menu, 1);
        if let Some(m) = self.menus.map.get_mut(&menu)
            && let Some(top) = m.chain.first_mut()
            && top.selected.take().is_some()
        {
            let control = top.control;
            self.tree.invalidate(control);
        }
    }

    /// Remove a menu together with its controls.
    pub fn remove_menu(&mut self, menu: MenuId) {
        if let Some(control) = self.menu_control(menu) {
            self.close_levels(menu, 1);
            self.remove(control);
        }
        self.menus.map.remove(&menu);
    }

    fn level_items(&self, menu: MenuId, level: usize) -> Option<&[MenuItem]> {
        let m = self.menus.map.get(&menu)?;
        items_at(&m.items, &m.chain.get(level)?.path)
    }

    fn level_rects(&self, menu: MenuId, level: usize) -> Vec<Bounds> {
        let Some(m) = self.menus.map.get(&menu) else {
            return Vec::new();
        };
        let (Some(instance), Some(items)) = (
            m.chain.get(level),
            self.level_items(menu, level),
        ) else {
            return Vec::new();
        };
        let Some(frame) = self.tree.absolute_bounds(instance.control) else {
            return Vec::new();
        };
        item_rects(items, m.orientation_at(level), frame, &self.config)
    }

    fn item_at(&self, menu: MenuId, level: usize, p: Point) -> Option<usize> {
        self.level_rects(menu, level)
            .iter()
            .position(|r| r.contains(p))
    }

    /// Change the selection of a level. Deeper levels are disposed first,
    /// then the new selection's submenu is opened if it has one. Selecting the
    /// current item again reopens its submenu if it was closed.
    fn select(&mut self, menu: MenuId, level: usize, index: Option<usize>) {
        let Some(m) = self.menus.map.get(&menu) else {
            return;
        };
        let Some(instance) = m.chain.get(level) else {
            return;
        };
        if instance.selected == index {
            if index.is_some() {
                self.spawn_submenu(menu, level);
            }
            return;
        }
        let control = instance.control;
        self.close_levels(menu, level + 1);
        if let Some(m) = self.menus.map.get_mut(&menu)
            && let Some(instance) = m.chain.get_mut(level)
        {
            instance.selected = index;
        }
        self.tree.invalidate(control);
        if index.is_some() {
            self.spawn_submenu(menu, level);
        }
    }

    /// Open the submenu of the selected item of `level`, if it is enabled and
    /// has children and nothing is open below `level` yet.
    fn spawn_submenu(&mut self, menu: MenuId, level: usize) -> Option<ControlId> {
        let m = self.menus.map.get(&menu)?;
        if m.chain.len() != level + 1 {
            return None;
        }
        let instance = m.chain.get(level)?;
        let selected = instance.selected?;
        let items = items_at(&m.items, &instance.path)?;
        let item = items.get(selected)?;
        if !item.enabled || !item.has_children() {
            return None;
        }
        let frame = self.tree.absolute_bounds(instance.control)?;
        let anchor = *item_rects(items, m.orientation_at(level), frame, &self.config)
            .get(selected)?;
        let (x, y) = match m.orientation_at(level) {
            Orientation::Vertical => (anchor.right(), anchor.y),
            Orientation::Horizontal => (anchor.x, anchor.bottom()),
        };
        let size = list_size(&item.children, &self.config);
        let mut path = instance.path.clone();
        path.push(selected);
        let parent = instance.control;
        let root = instance.root;
        let host = self.menu_host(root)?;

        let control = self.create_widget(
            ControlProps {
                name: String::from("Menu"),
                ..ControlProps::default()
            },
            Box::new(MenuPanel { kind: "Menu" }),
        );
        self.tree.set_double_clicks(control, false);
        if host == root {
            self.tree.add_root(control);
            self.tree
                .set_bounds(control, Bounds::new(x, y, size.width, size.height));
        } else {
            let origin = self.tree.absolute_bounds(host).unwrap_or_default();
            self.tree.set_bounds(
                control,
                Bounds::new(x - origin.x, y - origin.y, size.width, size.height),
            );
            self.tree.attach(host, control, false);
        }

        if let Some(m) = self.menus.map.get_mut(&menu) {
            m.chain.push(MenuInstance {
                control,
                path,
                selected: None,
                parent: Some(parent),
                root,
            });
        }
        log::trace!("menu {menu:?} opened level {} as {control:?}", level + 1);
        self.events.push(UiEvent::MenuOpened { menu, control });
        Some(control)
    }

    /// Where submenus of the menu rooted at `root` attach: the innermost
    /// modal container holding it, else its top-level root.
    fn menu_host(&self, root: ControlId) -> Option<ControlId> {
        let mut current = Some(root);
        while let Some(id) = current {
            if self.modals.contains(id) {
                return Some(id);
            }
            current = self.tree.parent_of(id);
        }
        self.tree.root_of(root)
    }

    /// Dispose levels `from..` (never level 0), deepest first. Focus inside a
    /// disposed level moves to the level that spawned it.
    fn close_levels(&mut self, menu: MenuId, from: usize) {
        let from = from.max(1);
        loop {
            let Some(m) = self.menus.map.get_mut(&menu) else {
                return;
            };
            if m.chain.len() <= from {
                return;
            }
            let Some(instance) = m.chain.pop() else {
                return;
            };
            if let Some(focused) = self.focused
                && self.tree.is_in_subtree(focused, instance.control)
            {
                let back = instance.parent.filter(|p| self.tree.is_focusable(*p));
                self.change_focus(back);
            }
            self.remove(instance.control);
            log::trace!("menu {menu:?} closed {:?}", instance.control);
            self.events.push(UiEvent::MenuClosed {
                menu,
                control: instance.control,
            });
        }
    }

    fn activate(&mut self, menu: MenuId, level: usize, index: usize) {
        let Some(m) = self.menus.map.get(&menu) else {
            return;
        };
        let Some(instance) = m.chain.get(level) else {
            return;
        };
        let mut path: Vec<usize> = instance.path.to_vec();
        path.push(index);
        self.dismiss_menu(menu);
        self.events.push(UiEvent::MenuItemActivated { menu, path });
    }

    // --- routing hooks ---

    /// Hovering an item selects it.
    pub(crate) fn menu_pointer_move(&mut self, hit: ControlId, p: Point) {
        if let Some((menu, level)) = self.menu_of(hit)
            && let Some(index) = self.item_at(menu, level, p)
        {
            self.select(menu, level, Some(index));
        }
    }

    /// A primary click on an instance: leaves activate, parents open.
    pub(crate) fn menu_click(&mut self, control: ControlId, p: Point) {
        let Some((menu, level)) = self.menu_of(control) else {
            return;
        };
        let Some(index) = self.item_at(menu, level, p) else {
            return;
        };
        let Some(item) = self.level_items(menu, level).and_then(|items| items.get(index)) else {
            return;
        };
        if !item.enabled {
            log::trace!("click on disabled menu item {index}");
            return;
        }
        if item.has_children() {
            self.select(menu, level, Some(index));
        } else {
            self.activate(menu, level, index);
        }
    }

    /// Keyboard and game-pad navigation for a menu instance in the focus chain.
    ///
    /// Returns `None` when `control` is not a menu instance or the input is not
    /// a navigation input, so the rest of the chain still sees it.
    pub(crate) fn menu_routed(&mut self, control: ControlId, input: Routed) -> Option<Outcome> {
        let (menu, level) = self.menu_of(control)?;
        let orientation = self.menus.map.get(&menu)?.orientation_at(level);
        let nav = nav_for(input, orientation, level)?;
        let count = self.level_items(menu, level).map_or(0, <[MenuItem]>::len);
        let selected = self.menu_selection(menu, level);
        log::trace!("menu {menu:?} level {level}: {nav:?}");

        match nav {
            Nav::Next | Nav::Prev | Nav::First | Nav::Last => {
                if let Some(last) = count.checked_sub(1) {
                    let next = match (nav, selected) {
                        (Nav::First, _) | (Nav::Next, None) => 0,
                        (Nav::Last, _) | (Nav::Prev, None) => last,
                        (Nav::Next, Some(i)) if i < last => i + 1,
                        (Nav::Next, Some(_)) => 0,
                        (Nav::Prev, Some(i)) if i > 0 => i - 1,
                        (Nav::Prev, Some(_)) => last,
                        _ => return Some(Outcome::Stop),
                    };
                    self.select(menu, level, Some(next));
                }
            }
            Nav::Descend => self.descend(menu, level),
            Nav::Activate => match selected {
                Some(index) => {
                    let item = self
                        .level_items(menu, level)
                        .and_then(|items| items.get(index))
                        .map(|item| (item.enabled, item.has_children()));
                    match item {
                        Some((true, true)) => self.descend(menu, level),
                        Some((true, false)) => self.activate(menu, level, index),
                        _ => {}
                    }
                }
                None if count > 0 => self.select(menu, level, Some(0)),
                None => {}
            },
            Nav::Back => self.close_levels(menu, level),
            Nav::Close => self.dismiss_menu(menu),
        }
        Some(Outcome::Stop)
    }

    /// Open the selected item's submenu, select its first item and focus it.
    fn descend(&mut self, menu: MenuId, level: usize) {
        if self.menu_selection(menu, level).is_none() {
            self.select(menu, level, Some(0));
        }
        self.spawn_submenu(menu, level);
        let Some(child) = self
            .menus
            .map
            .get(&menu)
            .and_then(|m| m.chain.get(level + 1))
            .map(|i| i.control)
        else {
            return;
        };
        if self.level_items(menu, level + 1).is_some_and(|items| !items.is_empty()) {
            self.select(menu, level + 1, Some(0));
        }
        if self.tree.is_focusable(child) {
            self.change_focus(Some(child));
        }
    }

    /// Dismiss open menus whose chain does not contain `hit`.
    pub(crate) fn dismiss_menus_not_hit(&mut self, hit: Option<ControlId>) {
        let outside: Vec<MenuId> = self
            .menus
            .map
            .iter()
            .filter(|(_, m)| m.is_open())
            .filter(|(_, m)| {
                hit.is_none_or(|h| {
                    !m.chain
                        .iter()
                        .any(|i| self.tree.is_in_subtree(h, i.control))
                })
            })
            .map(|(id, _)| *id)
            .collect();
        for menu in outside {
            log::debug!("pointer down outside menu {menu:?}; dismissing");
            self.dismiss_menu(menu);
        }
    }

    /// Dismiss open menus whose top level lies outside `container`.
    pub(crate) fn dismiss_menus_outside_scope(&mut self, container: ControlId) {
        let outside: Vec<MenuId> = self
            .menus
            .map
            .iter()
            .filter(|(_, m)| m.is_open())
            .filter(|(_, m)| {
                m.chain
                    .first()
                    .is_none_or(|i| !self.tree.is_in_subtree(i.control, container))
            })
            .map(|(id, _)| *id)
            .collect();
        for menu in outside {
            self.dismiss_menu(menu);
        }
    }

    pub(crate) fn dismiss_all_menus(&mut self) {
        let open: Vec<MenuId> = self
            .menus
            .map
            .iter()
            .filter(|(_, m)| m.is_open())
            .map(|(id, _)| *id)
            .collect();
        for menu in open {
            self.dismiss_menu(menu);
        }
    }

    /// Keep open chains consistent with a focus move.
    ///
    /// Moving deeper (or sideways) keeps everything, moving back up closes the
    /// levels below the new focus, and leaving the chain dismisses the menu.
    pub(crate) fn menus_focus_changed(&mut self, old: Option<ControlId>, new: Option<ControlId>) {
        let Some(old) = old else {
            return;
        };
        let Some((menu, old_level)) = self.menu_of(old) else {
            return;
        };
        match new.and_then(|n| self.menu_of(n)) {
            Some((new_menu, new_level)) if new_menu == menu => {
                if new_level < old_level {
                    self.close_levels(menu, new_level + 1);
                }
            }
            _ => {
                log::debug!("focus left menu {menu:?}; dismissing");
                self.dismiss_menu(menu);
            }
        }
    }

    /// Drop menus whose top-level control was removed, and close levels whose
    /// control was removed.
    pub(crate) fn prune_menus(&mut self) {
        let ids: Vec<MenuId> = self.menus.map.keys().copied().collect();
        for menu in ids {
            let Some(m) = self.menus.map.get(&menu) else {
                continue;
            };
            let dead = m
                .chain
                .iter()
                .position(|i| !self.tree.is_alive(i.control));
            match dead {
                Some(0) => {
                    if let Some(m) = self.menus.map.remove(&menu) {
                        for instance in m.chain.into_iter().skip(1).rev() {
                            self.remove(instance.control);
                            self.events.push(UiEvent::MenuClosed {
                                menu,
                                control: instance.control,
                            });
                        }
                    }
                }
                Some(level) => self.close_levels(menu, level),
                None => {}
            }
        }
    }

    /// Advance the refresh timers and re-validate open levels against the
    /// item tree.
    pub(crate) fn update_menus(&mut self, elapsed: Duration) {
        let interval = self.config.menu_refresh_interval;
        let mut due = Vec::new();
        for (id, m) in &mut self.menus.map {
            m.refresh += elapsed;
            if m.refresh >= interval {
                m.refresh = Duration::ZERO;
                due.push(*id);
            }
        }
        for menu in due {
            self.refresh_menu(menu);
        }
    }

    fn refresh_menu(&mut self, menu: MenuId) {
        let mut level = 0;
        loop {
            let Some(m) = self.menus.map.get_mut(&menu) else {
                return;
            };
            if level >= m.chain.len() {
                return;
            }
            let Some(count) = items_at(&m.items, &m.chain[level].path).map(<[MenuItem]>::len)
            else {
                self.close_levels(menu, level);
                return;
            };
            let instance = &mut m.chain[level];
            if let Some(selected) = instance.selected
                && selected >= count
            {
                let clamped = count.checked_sub(1);
                log::debug!("menu {menu:?} level {level}: clamping selection to {clamped:?}");
                instance.selected = clamped;
                let control = instance.control;
                self.tree.invalidate(control);
            }

            if level > 0 {
                self.fit_instance(menu, level);
            }

            // The next level must still hang off the selected, openable item.
            let Some(m) = self.menus.map.get(&menu) else {
                return;
            };
            if let Some(next) = m.chain.get(level + 1) {
                let instance = &m.chain[level];
                let openable = instance.selected.is_some_and(|s| {
                    items_at(&m.items, &instance.path)
                        .and_then(|items| items.get(s))
                        .is_some_and(|item| item.enabled && item.has_children())
                });
                let expected = instance.selected.is_some_and(|s| {
                    next.path.len() == instance.path.len() + 1
                        && next.path.last() == Some(&s)
                });
                if !(openable && expected) {
                    self.close_levels(menu, level + 1);
                    return;
                }
            }
            level += 1;
        }
    }

    /// Resize a submenu control to its item list.
    fn fit_instance(&mut self, menu: MenuId, level: usize) {
        let Some(control) = self
            .menus
            .map
            .get(&menu)
            .and_then(|m| m.chain.get(level))
            .map(|i| i.control)
        else {
            return;
        };
        let Some(size) = self
            .level_items(menu, level)
            .map(|items| list_size(items, &self.config))
        else {
            return;
        };
        if let Some(bounds) = self.tree.bounds(control)
            && bounds.size() != size
        {
            self.tree.set_bounds(
                control,
                Bounds::new(bounds.x, bounds.y, size.width, size.height),
            );
        }
    }

    /// Hand the items of a menu instance to the backend.
    pub(crate) fn draw_menu_items(&self, control: ControlId, clip: Rect, renderer: &mut dyn Renderer) {
        let Some((menu, level)) = self.menu_of(control) else {
            return;
        };
        let (Some(items), selected) = (
            self.level_items(menu, level),
            self.menu_selection(menu, level),
        ) else {
            return;
        };
        for (index, (item, rect)) in items
            .iter()
            .zip(self.level_rects(menu, level))
            .enumerate()
        {
            renderer.draw_menu_item(&MenuItemDraw {
                menu,
                control,
                index,
                item,
                rect: rect.to_rect(),
                clip,
                selected: selected == Some(index),
            });
        }
    }
}
