// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the control tree: identifiers, flags, buttons and change notifications.

use alloc::string::String;
use thicket_anchor::{Anchors, Bounds, Margins, Size};

/// Identifier for a control in the tree (generational).
///
/// Ids are plain handles: holding one never keeps a control alive, and an id
/// whose control was removed is detected as stale rather than aliasing a newer
/// control that reuses the slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub(crate) u32, pub(crate) u32);

impl ControlId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Interaction flags of a control.
    ///
    /// `ENABLED`, `VISIBLE`, `CAN_FOCUS`, `PASSIVE`, `SUSPENDED`, `CHECKED` and
    /// `DOUBLE_CLICKS` are configuration. `FOCUSED`, `HOVERED` and `INSIDE` are
    /// owned by the input router.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u16 {
        /// Accepts input. A disabled ancestor disables the whole subtree.
        const ENABLED       = 0b0000_0000_0001;
        /// Drawn and hit-tested. A hidden ancestor hides the whole subtree.
        const VISIBLE       = 0b0000_0000_0010;
        /// May become the keyboard focus.
        const CAN_FOCUS     = 0b0000_0000_0100;
        /// Never receives input; still drawn and laid out.
        const PASSIVE       = 0b0000_0000_1000;
        /// Change notifications are held back while batch-mutating.
        const SUSPENDED     = 0b0000_0001_0000;
        /// Holds the keyboard focus.
        const FOCUSED       = 0b0000_0010_0000;
        /// The pointer hovers this control.
        const HOVERED       = 0b0000_0100_0000;
        /// The pointer was geometrically inside at the last sample.
        const INSIDE        = 0b0000_1000_0000;
        /// Checked state of checkable widgets.
        const CHECKED       = 0b0001_0000_0000;
        /// Two quick clicks are reported as a double click.
        const DOUBLE_CLICKS = 0b0010_0000_0000;
    }
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self::ENABLED | Self::VISIBLE | Self::DOUBLE_CLICKS
    }
}

/// Buttons that can hold a control pressed.
///
/// Pointer buttons, the keyboard activation key and game-pad actions each get
/// their own slot so overlapping input sources never clobber each other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputButton {
    /// Primary pointer button.
    Left,
    /// Secondary pointer button.
    Right,
    /// Middle pointer button.
    Middle,
    /// First extra pointer button.
    X1,
    /// Second extra pointer button.
    X2,
    /// Keyboard activation (Space or Enter on the focused control).
    Keyboard,
    /// Game-pad A.
    PadA,
    /// Game-pad B.
    PadB,
    /// Game-pad X.
    PadX,
    /// Game-pad Y.
    PadY,
}

impl InputButton {
    /// Number of distinct buttons.
    pub const COUNT: usize = 10;

    /// Every button, in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Left,
        Self::Right,
        Self::Middle,
        Self::X1,
        Self::X2,
        Self::Keyboard,
        Self::PadA,
        Self::PadB,
        Self::PadX,
        Self::PadY,
    ];

    /// Buttons that activate the focused control.
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Keyboard | Self::PadA)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Per-button pressed state of a control.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PressedButtons([bool; InputButton::COUNT]);

impl PressedButtons {
    /// Whether `button` is held on this control.
    pub const fn get(&self, button: InputButton) -> bool {
        self.0[button.slot()]
    }

    /// Set the state of one button.
    pub fn set(&mut self, button: InputButton, pressed: bool) {
        self.0[button.slot()] = pressed;
    }

    /// Whether any button is held.
    pub fn any(&self) -> bool {
        self.0.iter().any(|p| *p)
    }

    /// Whether any activation button is held.
    pub fn activation(&self) -> bool {
        InputButton::ALL
            .iter()
            .any(|b| b.is_activation() && self.get(*b))
    }
}

/// Initial data for a new control.
#[derive(Clone, Debug)]
pub struct ControlProps {
    /// Informational name; not required to be unique.
    pub name: String,
    /// Rectangle in the parent's client coordinates.
    pub bounds: Bounds,
    /// Minimum extent; applied after anchored layout.
    pub min_size: Size,
    /// Parent edges followed on resize.
    pub anchors: Anchors,
    /// Minimum distance kept from anchored parent edges.
    pub margins: Margins,
    /// Configuration flags.
    pub flags: ControlFlags,
}

impl Default for ControlProps {
    fn default() -> Self {
        Self {
            name: String::new(),
            bounds: Bounds::ZERO,
            min_size: Size::ZERO,
            anchors: Anchors::default(),
            margins: Margins::ZERO,
            flags: ControlFlags::default(),
        }
    }
}

/// A property whose change is reported through the change channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Name changed.
    Name,
    /// Rectangle changed, explicitly or through anchored layout.
    Bounds,
    /// Minimum size changed.
    MinSize,
    /// Anchors changed.
    Anchors,
    /// Margins changed.
    Margins,
    /// Client margins changed.
    ClientMargins,
    /// Enabled flag changed.
    Enabled,
    /// Visible flag changed.
    Visible,
    /// Can-focus flag changed.
    CanFocus,
    /// Passive flag changed.
    Passive,
    /// Checked flag changed.
    Checked,
    /// Parent changed (attach, detach or move between containers).
    Parent,
    /// The control left suspension; any subset of its properties may have changed.
    Resumed,
}

/// A property change notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyChange {
    /// The control whose property changed.
    pub control: ControlId,
    /// The property.
    pub property: Property,
}
