// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events fed in by the host and notifications handed back to it.

use alloc::vec::Vec;
use kurbo::Point;
use thicket_control_tree::{ControlId, InputButton};

use crate::menu::MenuId;

/// A pointing device button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Middle button.
    Middle,
    /// First extra button.
    X1,
    /// Second extra button.
    X2,
}

impl From<PointerButton> for InputButton {
    fn from(button: PointerButton) -> Self {
        match button {
            PointerButton::Left => Self::Left,
            PointerButton::Right => Self::Right,
            PointerButton::Middle => Self::Middle,
            PointerButton::X1 => Self::X1,
            PointerButton::X2 => Self::X2,
        }
    }
}

/// Pointer input in host surface coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// The pointer moved.
    Move(Point),
    /// A button went down.
    Down(PointerButton, Point),
    /// A button went up.
    Up(PointerButton, Point),
    /// The pointer left the host surface.
    Leave,
}

/// Keys the core reacts to. Everything else is still delivered to widgets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Focus traversal.
    Tab,
    /// Activation, dialog default, menu descend.
    Enter,
    /// Activation.
    Space,
    /// Dialog cancel, menu close.
    Escape,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// A character key.
    Char(char),
    /// Any other key, by host scan code.
    Other(u32),
}

bitflags::bitflags! {
    /// Keyboard modifiers held during a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b001;
        /// Control.
        const CTRL  = 0b010;
        /// Alt.
        const ALT   = 0b100;
    }
}

/// A key going down or up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// `true` on press, `false` on release.
    pub pressed: bool,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub const fn press(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            pressed: true,
        }
    }

    /// A key release without modifiers.
    pub const fn release(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            pressed: false,
        }
    }

    /// The same event with `modifiers` held.
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A game-pad button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PadButton {
    /// Confirm.
    A,
    /// Back; routed like Escape when nothing handles it.
    B,
    /// X.
    X,
    /// Y.
    Y,
    /// D-pad up.
    Up,
    /// D-pad down.
    Down,
    /// D-pad left.
    Left,
    /// D-pad right.
    Right,
    /// Start.
    Start,
    /// Back / select.
    Back,
}

impl PadButton {
    /// The pressed slot this button owns on a control, if any.
    pub const fn slot(self) -> Option<InputButton> {
        match self {
            Self::A => Some(InputButton::PadA),
            Self::B => Some(InputButton::PadB),
            Self::X => Some(InputButton::PadX),
            Self::Y => Some(InputButton::PadY),
            _ => None,
        }
    }
}

/// A game-pad button going down or up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PadEvent {
    /// The button.
    pub button: PadButton,
    /// `true` on press, `false` on release.
    pub pressed: bool,
}

impl PadEvent {
    /// A button press.
    pub const fn press(button: PadButton) -> Self {
        Self {
            button,
            pressed: true,
        }
    }

    /// A button release.
    pub const fn release(button: PadButton) -> Self {
        Self {
            button,
            pressed: false,
        }
    }
}

/// Result code carried by a closing modal container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DialogResult {
    /// No result yet.
    #[default]
    None,
    /// Accepted.
    Ok,
    /// Dismissed.
    Cancel,
    /// Answered yes.
    Yes,
    /// Answered no.
    No,
    /// Application-defined code.
    Custom(u32),
}

/// Notifications produced by the context, drained with
/// [`UiContext::take_events`](crate::UiContext::take_events).
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// The pointer entered a control.
    PointerEnter(ControlId),
    /// The pointer left a control.
    PointerLeave(ControlId),
    /// Focus left a control (`None`: nothing was focused). Always followed by
    /// [`UiEvent::FocusGained`].
    FocusLost(Option<ControlId>),
    /// Focus arrived at a control (`None`: nothing is focused now).
    FocusGained(Option<ControlId>),
    /// A control was clicked, by pointer or by an activation button.
    Click {
        /// Clicked control.
        control: ControlId,
        /// Button that produced the click.
        button: InputButton,
    },
    /// The second click of a quick pair.
    DoubleClick {
        /// Clicked control.
        control: ControlId,
        /// Button that produced the click.
        button: InputButton,
    },
    /// A checkable control changed state.
    CheckedChanged {
        /// The control.
        control: ControlId,
        /// New state.
        checked: bool,
    },
    /// A container became the modal target.
    ModalOpened(ControlId),
    /// A modal container finished closing.
    ModalClosed {
        /// The container.
        container: ControlId,
        /// Its result code.
        result: DialogResult,
    },
    /// A submenu instance was spawned.
    MenuOpened {
        /// The menu.
        menu: MenuId,
        /// The submenu control.
        control: ControlId,
    },
    /// A submenu instance was disposed.
    MenuClosed {
        /// The menu.
        menu: MenuId,
        /// The disposed submenu control.
        control: ControlId,
    },
    /// A leaf menu item was chosen.
    MenuItemActivated {
        /// The menu.
        menu: MenuId,
        /// Index path of the item from the top level.
        path: Vec<usize>,
    },
}
