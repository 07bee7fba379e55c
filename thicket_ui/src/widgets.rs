// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Standard widget kinds.

use thicket_control_tree::{ControlFlags, InputButton};

use crate::dispatch::Outcome;
use crate::event::{DialogResult, Key, KeyEvent};
use crate::widget::{Capabilities, Disposal, Request, Widget, WidgetCx};

fn is_primary(button: InputButton) -> bool {
    button == InputButton::Left || button.is_activation()
}

/// A push button.
///
/// With a result set, clicking it closes the modal container holding it.
#[derive(Clone, Debug, Default)]
pub struct Button {
    /// Result to close the enclosing modal with.
    pub result: Option<DialogResult>,
}

impl Button {
    /// A plain button.
    pub fn new() -> Self {
        Self::default()
    }

    /// A dialog button closing its modal with `result`.
    pub fn with_result(result: DialogResult) -> Self {
        Self {
            result: Some(result),
        }
    }
}

impl Widget for Button {
    fn kind(&self) -> &'static str {
        "Button"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CAN_FOCUS | Capabilities::PRESSABLE
    }

    fn on_click(&mut self, cx: &mut WidgetCx<'_>, button: InputButton) {
        if let Some(result) = self.result
            && is_primary(button)
        {
            let id = cx.id();
            cx.request(Request::CloseEnclosingModal(id, result));
        }
    }
}

/// A two-state check box.
#[derive(Clone, Debug, Default)]
pub struct CheckBox;

impl Widget for CheckBox {
    fn kind(&self) -> &'static str {
        "CheckBox"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CAN_FOCUS | Capabilities::PRESSABLE | Capabilities::CHECKABLE
    }

    fn on_click(&mut self, cx: &mut WidgetCx<'_>, button: InputButton) {
        if is_primary(button) {
            let checked = cx.flags().contains(ControlFlags::CHECKED);
            let id = cx.id();
            cx.request(Request::SetChecked(id, !checked));
        }
    }
}

/// A radio button; checking one unchecks its radio siblings.
#[derive(Clone, Debug, Default)]
pub struct RadioButton;

impl Widget for RadioButton {
    fn kind(&self) -> &'static str {
        "RadioButton"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CAN_FOCUS
            | Capabilities::PRESSABLE
            | Capabilities::CHECKABLE
            | Capabilities::RADIO
    }

    fn on_click(&mut self, cx: &mut WidgetCx<'_>, button: InputButton) {
        if is_primary(button) {
            let id = cx.id();
            cx.request(Request::CheckExclusive(id));
        }
    }
}

/// A plain container.
#[derive(Clone, Debug, Default)]
pub struct Panel;

impl Widget for Panel {
    fn kind(&self) -> &'static str {
        "Panel"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CONTAINER
    }
}

/// A top-level container usable as a modal dialog.
///
/// While modal, Escape closes it with [`DialogResult::Cancel`] and Enter with
/// [`Window::default_result`], unless the focused control handled the key.
#[derive(Clone, Debug)]
pub struct Window {
    /// Result used by the Enter accelerator.
    pub default_result: DialogResult,
    /// Remove the window once it has closed.
    pub dispose_on_close: bool,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            default_result: DialogResult::Ok,
            dispose_on_close: false,
        }
    }
}

impl Widget for Window {
    fn kind(&self) -> &'static str {
        "Window"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CONTAINER
    }

    fn on_key(&mut self, cx: &mut WidgetCx<'_>, event: &KeyEvent) -> Outcome {
        if !event.pressed || !cx.is_modal() {
            return Outcome::Continue;
        }
        let result = match event.key {
            Key::Escape => DialogResult::Cancel,
            Key::Enter => self.default_result,
            _ => return Outcome::Continue,
        };
        let id = cx.id();
        cx.request(Request::CloseModal(id, result));
        Outcome::Stop
    }

    fn closed(&mut self, _cx: &mut WidgetCx<'_>, _result: DialogResult) -> Disposal {
        if self.dispose_on_close {
            Disposal::Dispose
        } else {
            Disposal::Keep
        }
    }
}
