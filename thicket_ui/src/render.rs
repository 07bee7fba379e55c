// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interfaces to the rendering backend and the skin descriptor.
//!
//! The core never produces pixels. During [`UiContext::draw`](crate::UiContext::draw)
//! it hands the backend one [`DrawItem`] per visible control, bottom to top,
//! carrying the absolute rectangle, the clip, the resolved state and an opaque
//! skin layer reference.

use kurbo::Rect;
use thicket_anchor::{Margins, Size};
use thicket_control_tree::{ControlId, ControlState};

use crate::menu::{MenuId, MenuItem};

/// Opaque reference to a drawable layer owned by the skin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SkinLayer(pub u32);

/// Skin data for one control kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SkinControl {
    /// Layer drawn for controls of this kind.
    pub layer: SkinLayer,
    /// Inset of the client area of containers of this kind.
    pub client_margins: Margins,
    /// Minimum size of controls of this kind.
    pub min_size: Size,
}

/// Maps control kind names to skin data.
pub trait Skin {
    /// Skin data for `kind`, if the skin defines it.
    fn control(&self, kind: &str) -> Option<SkinControl>;
}

/// A skin that defines nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoSkin;

impl Skin for NoSkin {
    fn control(&self, _kind: &str) -> Option<SkinControl> {
        None
    }
}

/// One control to draw.
#[derive(Copy, Clone, Debug)]
pub struct DrawItem<'a> {
    /// The control.
    pub control: ControlId,
    /// Widget kind, `"Control"` for controls without a widget.
    pub kind: &'a str,
    /// Informational name.
    pub name: &'a str,
    /// Absolute rectangle.
    pub rect: Rect,
    /// Absolute clip: the rectangle intersected with every ancestor's.
    pub clip: Rect,
    /// Resolved visual state.
    pub state: ControlState,
    /// Checked flag, for checkable kinds.
    pub checked: bool,
    /// Skin layer for the kind, if the skin has one.
    pub layer: Option<SkinLayer>,
    /// The control was invalidated since the previous draw.
    pub damaged: bool,
}

/// One item of an open menu instance.
#[derive(Copy, Clone, Debug)]
pub struct MenuItemDraw<'a> {
    /// The menu.
    pub menu: MenuId,
    /// The menu instance control drawing the item.
    pub control: ControlId,
    /// Index of the item within its level.
    pub index: usize,
    /// The item.
    pub item: &'a MenuItem,
    /// Absolute rectangle of the item.
    pub rect: Rect,
    /// Absolute clip of the instance.
    pub clip: Rect,
    /// The item is the instance's selection.
    pub selected: bool,
}

/// The rendering backend.
pub trait Renderer {
    /// Draw a control.
    fn draw_control(&mut self, item: &DrawItem<'_>);

    /// Draw a menu item on top of its instance control.
    fn draw_menu_item(&mut self, item: &MenuItemDraw<'_>) {
        let _ = item;
    }
}
