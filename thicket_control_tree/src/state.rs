// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual state derived from interaction flags.

use crate::tree::ControlTree;
use crate::types::{ControlFlags, ControlId, InputButton, PressedButtons};

/// The discrete state a control is drawn in.
///
/// Derived on demand from flags; never stored. Several input sources (pointer,
/// keyboard focus, game-pad activation) may set overlapping flags within one
/// frame, so the result depends only on the flags and not on event order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ControlState {
    /// Normal, interactive.
    Enabled,
    /// Pointer over the control.
    Hovered,
    /// Held down by the pointer or an activation button.
    Pressed,
    /// Holds the keyboard focus.
    Focused,
    /// Not interactive.
    Disabled,
}

impl ControlState {
    /// Resolve a state from flags and pressed buttons.
    ///
    /// Rules, first match wins:
    /// 1. `design_mode` gives [`ControlState::Enabled`].
    /// 2. Suspended or not enabled gives [`ControlState::Disabled`].
    /// 3. Left button held while inside, or focused while an activation
    ///    button is held, gives [`ControlState::Pressed`].
    /// 4. Hovered and inside gives [`ControlState::Hovered`].
    /// 5. Focused but not inside, hovered but not inside, or focused, hovered
    ///    and inside with nothing held gives [`ControlState::Focused`].
    /// 6. Otherwise [`ControlState::Enabled`].
    ///
    /// The third clause of rule 5 can never fire because rule 4 already
    /// matched; it is kept so the table reads the same as the documented
    /// precedence. A focused control under the pointer therefore draws as
    /// hovered.
    ///
    /// ```
    /// use thicket_control_tree::{ControlFlags, ControlState, PressedButtons};
    ///
    /// let flags = ControlFlags::default() | ControlFlags::FOCUSED;
    /// assert_eq!(
    ///     ControlState::resolve(flags, PressedButtons::default(), false),
    ///     ControlState::Focused
    /// );
    /// assert_eq!(
    ///     ControlState::resolve(flags, PressedButtons::default(), true),
    ///     ControlState::Enabled
    /// );
    /// ```
    pub fn resolve(flags: ControlFlags, pressed: PressedButtons, design_mode: bool) -> Self {
        if design_mode {
            return Self::Enabled;
        }
        if flags.contains(ControlFlags::SUSPENDED) || !flags.contains(ControlFlags::ENABLED) {
            return Self::Disabled;
        }

        let focused = flags.contains(ControlFlags::FOCUSED);
        let hovered = flags.contains(ControlFlags::HOVERED);
        let inside = flags.contains(ControlFlags::INSIDE);

        if (pressed.get(InputButton::Left) && inside) || (focused && pressed.activation()) {
            return Self::Pressed;
        }
        if hovered && inside {
            return Self::Hovered;
        }
        if (focused && !inside)
            || (hovered && !inside)
            || (focused && hovered && inside && !pressed.any())
        {
            return Self::Focused;
        }
        Self::Enabled
    }
}

impl ControlTree {
    /// Resolve the visual state of a control.
    ///
    /// Uses the effective enabled flag, so a control under a disabled ancestor
    /// resolves as [`ControlState::Disabled`]. Returns `None` for stale ids.
    pub fn state(&self, id: ControlId, design_mode: bool) -> Option<ControlState> {
        let mut flags = self.flags(id)?;
        flags.set(ControlFlags::ENABLED, self.is_effectively_enabled(id));
        Some(ControlState::resolve(flags, self.pressed(id)?, design_mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ControlProps;
    use thicket_anchor::Bounds;

    fn flags(extra: ControlFlags) -> ControlFlags {
        ControlFlags::default() | extra
    }

    fn pressed(buttons: &[InputButton]) -> PressedButtons {
        let mut p = PressedButtons::default();
        for b in buttons {
            p.set(*b, true);
        }
        p
    }

    #[test]
    fn design_mode_wins_over_everything() {
        let f = ControlFlags::SUSPENDED | ControlFlags::FOCUSED;
        assert_eq!(
            ControlState::resolve(f, pressed(&[InputButton::Left]), true),
            ControlState::Enabled
        );
    }

    #[test]
    fn suspended_or_disabled_resolve_disabled() {
        let p = pressed(&[InputButton::Left]);
        let inside = flags(ControlFlags::INSIDE);
        assert_eq!(
            ControlState::resolve(inside | ControlFlags::SUSPENDED, p, false),
            ControlState::Disabled
        );
        assert_eq!(
            ControlState::resolve(inside - ControlFlags::ENABLED, p, false),
            ControlState::Disabled
        );
    }

    #[test]
    fn pointer_press_needs_the_pointer_inside() {
        let p = pressed(&[InputButton::Left]);
        assert_eq!(
            ControlState::resolve(flags(ControlFlags::INSIDE), p, false),
            ControlState::Pressed
        );
        assert_eq!(
            ControlState::resolve(flags(ControlFlags::empty()), p, false),
            ControlState::Enabled
        );
        // Right button never presses visually.
        assert_eq!(
            ControlState::resolve(
                flags(ControlFlags::INSIDE | ControlFlags::HOVERED),
                pressed(&[InputButton::Right]),
                false
            ),
            ControlState::Hovered
        );
    }

    #[test]
    fn activation_press_needs_focus() {
        for button in [InputButton::Keyboard, InputButton::PadA] {
            assert_eq!(
                ControlState::resolve(flags(ControlFlags::FOCUSED), pressed(&[button]), false),
                ControlState::Pressed
            );
            assert_eq!(
                ControlState::resolve(flags(ControlFlags::empty()), pressed(&[button]), false),
                ControlState::Enabled
            );
        }
    }

    #[test]
    fn hover_and_focus_precedence() {
        let none = PressedButtons::default();
        let hovered_inside = flags(ControlFlags::HOVERED | ControlFlags::INSIDE);
        assert_eq!(
            ControlState::resolve(hovered_inside, none, false),
            ControlState::Hovered
        );
        assert_eq!(
            ControlState::resolve(hovered_inside | ControlFlags::FOCUSED, none, false),
            ControlState::Hovered,
            "a focused control under the pointer draws hovered"
        );
        assert_eq!(
            ControlState::resolve(flags(ControlFlags::FOCUSED), none, false),
            ControlState::Focused
        );
        assert_eq!(
            ControlState::resolve(flags(ControlFlags::HOVERED), none, false),
            ControlState::Focused,
            "hovered without inside resolves as focused"
        );
        assert_eq!(
            ControlState::resolve(flags(ControlFlags::INSIDE), none, false),
            ControlState::Enabled
        );
    }

    #[test]
    fn tree_state_follows_disabled_ancestors() {
        let mut tree = ControlTree::new();
        let panel = tree.insert(
            None,
            ControlProps {
                bounds: Bounds::new(0, 0, 100, 100),
                ..Default::default()
            },
        );
        let button = tree.insert(
            Some(panel),
            ControlProps {
                bounds: Bounds::new(10, 10, 50, 20),
                ..Default::default()
            },
        );
        tree.set_hovered(button, true);
        tree.set_inside(button, true);
        assert_eq!(tree.state(button, false), Some(ControlState::Hovered));

        tree.set_enabled(panel, false);
        assert_eq!(tree.state(button, false), Some(ControlState::Disabled));
        assert_eq!(tree.state(button, true), Some(ControlState::Enabled));

        tree.remove(panel);
        assert_eq!(tree.state(button, false), None);
    }
}
