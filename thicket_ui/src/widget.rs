// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The widget strategy seam.
//!
//! Every control is the same tree node; what differs between a button, a check
//! box and a window is a [`Widget`] strategy stored next to the node. A widget
//! declares [`Capabilities`], reacts to routed input, and draws itself. It
//! never mutates the context directly: hooks receive a [`WidgetCx`] with a
//! read-only view of the tree and queue [`Request`]s, which the context
//! applies right after the hook returns.

use alloc::vec::Vec;
use core::time::Duration;
use kurbo::Point;
use thicket_control_tree::{ControlFlags, ControlId, ControlTree, InputButton};

use crate::dispatch::Outcome;
use crate::event::{DialogResult, KeyEvent, PadEvent, UiEvent};
use crate::render::{DrawItem, Renderer};

bitflags::bitflags! {
    /// What a widget kind can do.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Takes keyboard focus when clicked or traversed to.
        const CAN_FOCUS = 0b0_0001;
        /// Activation buttons (Space, Enter, pad A) press and click it.
        const PRESSABLE = 0b0_0010;
        /// Carries a checked state.
        const CHECKABLE = 0b0_0100;
        /// Checking it unchecks its radio siblings.
        const RADIO     = 0b0_1000;
        /// Gets a client area for user content.
        const CONTAINER = 0b1_0000;
    }
}

/// Verdict of [`Widget::closing`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Closing {
    /// Let the modal close.
    Proceed,
    /// Keep it open.
    Cancel,
}

/// Verdict of [`Widget::closed`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Disposal {
    /// Keep the hidden container for reuse.
    Keep,
    /// Remove the container and its subtree.
    Dispose,
}

/// A side effect requested by a widget hook.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    /// Set the checked state of a control.
    SetChecked(ControlId, bool),
    /// Check a control and uncheck its radio siblings.
    CheckExclusive(ControlId),
    /// Close a modal container with a result.
    CloseModal(ControlId, DialogResult),
    /// Close the innermost modal container holding a control.
    CloseEnclosingModal(ControlId, DialogResult),
    /// Move keyboard focus.
    Focus(Option<ControlId>),
    /// Hand an event to the host.
    Emit(UiEvent),
}

/// What a widget hook sees of the context.
pub struct WidgetCx<'a> {
    pub(crate) tree: &'a ControlTree,
    pub(crate) id: ControlId,
    pub(crate) focused: Option<ControlId>,
    pub(crate) modal: Option<ControlId>,
    pub(crate) now: Duration,
    pub(crate) requests: &'a mut Vec<Request>,
}

impl core::fmt::Debug for WidgetCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WidgetCx")
            .field("id", &self.id)
            .field("focused", &self.focused)
            .field("modal", &self.modal)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl WidgetCx<'_> {
    /// The control this hook runs for.
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// Read-only view of the tree.
    pub fn tree(&self) -> &ControlTree {
        self.tree
    }

    /// Flags of this control.
    pub fn flags(&self) -> ControlFlags {
        self.tree.flags(self.id).unwrap_or_else(ControlFlags::empty)
    }

    /// The focused control.
    pub fn focused(&self) -> Option<ControlId> {
        self.focused
    }

    /// The current modal target.
    pub fn modal(&self) -> Option<ControlId> {
        self.modal
    }

    /// Whether this control is the current modal target.
    pub fn is_modal(&self) -> bool {
        self.modal == Some(self.id)
    }

    /// Context clock: total elapsed time fed to `update`.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue a side effect.
    pub fn request(&mut self, request: Request) {
        self.requests.push(request);
    }
}

/// Per-kind behavior of a control.
///
/// All hooks have defaults, so a widget only implements what its kind needs.
pub trait Widget {
    /// Kind name, used to look up skin data (`"Button"`, `"Window"`, ...).
    fn kind(&self) -> &'static str;

    /// What this kind can do. Read when the widget is installed.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// A click from the pointer or from an activation button.
    fn on_click(&mut self, cx: &mut WidgetCx<'_>, button: InputButton) {
        let _ = (cx, button);
    }

    /// The second click of a quick pair, delivered instead of a second click.
    fn on_double_click(&mut self, cx: &mut WidgetCx<'_>, button: InputButton) {
        let _ = (cx, button);
    }

    /// Pointer movement while this control is hovered or holds the capture.
    fn on_pointer_move(&mut self, cx: &mut WidgetCx<'_>, position: Point, inside: bool) {
        let _ = (cx, position, inside);
    }

    /// A key event travelling up the focus chain.
    fn on_key(&mut self, cx: &mut WidgetCx<'_>, event: &KeyEvent) -> Outcome {
        let _ = (cx, event);
        Outcome::Continue
    }

    /// A game-pad event travelling up the focus chain.
    fn on_pad(&mut self, cx: &mut WidgetCx<'_>, event: &PadEvent) -> Outcome {
        let _ = (cx, event);
        Outcome::Continue
    }

    /// Per-frame update.
    fn update(&mut self, cx: &mut WidgetCx<'_>, elapsed: Duration) {
        let _ = (cx, elapsed);
    }

    /// Draw this control. The default hands the item straight to the backend.
    fn draw(&self, item: &DrawItem<'_>, renderer: &mut dyn Renderer) {
        renderer.draw_control(item);
    }

    /// The control is about to stop being modal.
    fn closing(&mut self, cx: &mut WidgetCx<'_>, result: DialogResult) -> Closing {
        let _ = (cx, result);
        Closing::Proceed
    }

    /// The control stopped being modal and is hidden.
    fn closed(&mut self, cx: &mut WidgetCx<'_>, result: DialogResult) -> Disposal {
        let _ = (cx, result);
        Disposal::Keep
    }
}
