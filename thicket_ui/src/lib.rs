// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket UI: the context that turns a control tree into a working toolkit.
//!
//! A [`UiContext`] owns one [`ControlTree`](thicket_control_tree::ControlTree)
//! and everything that routes through it:
//! - widgets: a [`Widget`] strategy per control, with [`Capabilities`] instead
//!   of a class hierarchy,
//! - input: pointer hover, capture and clicks; keyboard and game-pad events
//!   travelling up the focus chain; Tab and d-pad traversal,
//! - modal containers: a chain of modal targets that scope all input,
//! - cascading menus: a persistent [`MenuItem`] tree with transient submenu
//!   instances,
//! - the host loop: [`UiContext::update`], [`UiContext::draw`] and
//!   [`UiEvent`]s drained with [`UiContext::take_events`].
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use thicket_anchor::Bounds;
//! use thicket_control_tree::{ControlProps, InputButton};
//! use thicket_ui::{
//!     Button, DialogResult, PointerButton, PointerEvent, UiContext, UiEvent, Window,
//! };
//!
//! let mut cx = UiContext::default();
//! let dialog = cx.add_widget(
//!     None,
//!     ControlProps {
//!         bounds: Bounds::new(0, 0, 200, 100),
//!         ..ControlProps::default()
//!     },
//!     Window::default(),
//! );
//! let ok = cx.add_widget(
//!     Some(dialog),
//!     ControlProps {
//!         bounds: Bounds::new(10, 60, 80, 24),
//!         ..ControlProps::default()
//!     },
//!     Button::with_result(DialogResult::Ok),
//! );
//!
//! cx.push_modal(dialog);
//! assert_eq!(cx.focused(), Some(ok));
//!
//! let at = Point::new(20.0, 70.0);
//! cx.dispatch_pointer(PointerEvent::Down(PointerButton::Left, at));
//! cx.dispatch_pointer(PointerEvent::Up(PointerButton::Left, at));
//!
//! let events = cx.take_events();
//! assert!(events.contains(&UiEvent::Click { control: ok, button: InputButton::Left }));
//! assert!(events.contains(&UiEvent::ModalClosed {
//!     container: dialog,
//!     result: DialogResult::Ok,
//! }));
//! assert_eq!(cx.modal(), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod context;
mod dispatch;
mod event;
mod focus;
mod input;
mod layout;
mod menu;
mod modal;
mod render;
mod widget;
mod widgets;

pub use config::UiConfig;
pub use context::UiContext;
pub use dispatch::Outcome;
pub use event::{
    DialogResult, Key, KeyEvent, Modifiers, PadButton, PadEvent, PointerButton, PointerEvent,
    UiEvent,
};
pub use layout::{LayoutNode, PropValue, StandardWidgets, WidgetFactory};
pub use menu::{MenuId, MenuItem, Orientation};
pub use modal::ModalRecord;
pub use render::{DrawItem, MenuItemDraw, NoSkin, Renderer, Skin, SkinControl, SkinLayer};
pub use widget::{Capabilities, Closing, Disposal, Request, Widget, WidgetCx};
pub use widgets::{Button, CheckBox, Panel, RadioButton, Window};
