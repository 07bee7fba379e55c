// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input routing: pointer hover and capture, keyboard and game-pad focus
//! chains, activation buttons and focus traversal.
//!
//! Every entry point is scoped by the modal chain first. Pointer hits outside
//! the current modal target resolve to nothing, and focused input whose target
//! lies outside it is dropped.

use alloc::vec::Vec;
use kurbo::Point;
use thicket_control_tree::{ControlFlags, ControlId, InputButton};
use thicket_event_state::click::ClickResult;

use crate::context::UiContext;
use crate::dispatch::{self, Outcome};
use crate::event::{Key, KeyEvent, Modifiers, PadButton, PadEvent, PointerEvent, UiEvent};
use crate::focus;
use crate::widget::Capabilities;

/// Keyboard or game-pad input travelling up the focus chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Routed {
    Key(KeyEvent),
    Pad(PadEvent),
}

impl Routed {
    fn pressed(self) -> bool {
        match self {
            Self::Key(e) => e.pressed,
            Self::Pad(e) => e.pressed,
        }
    }

    /// Direction of focus traversal this input asks for, if any.
    fn traversal(self) -> Option<bool> {
        match self {
            Self::Key(e) if e.pressed && e.key == Key::Tab => {
                Some(!e.modifiers.contains(Modifiers::SHIFT))
            }
            Self::Pad(e) if e.pressed => match e.button {
                PadButton::Down | PadButton::Right => Some(true),
                PadButton::Up | PadButton::Left => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// The pressed slot an activation input owns.
    fn activation_slot(self) -> Option<InputButton> {
        match self {
            Self::Key(e) if matches!(e.key, Key::Space | Key::Enter) => Some(InputButton::Keyboard),
            Self::Pad(e) => e.button.slot().filter(|slot| slot.is_activation()),
            _ => None,
        }
    }
}

impl UiContext {
    /// Feed a pointer event.
    pub fn dispatch_pointer(&mut self, event: PointerEvent) {
        if self.config.design_mode {
            return;
        }
        match event {
            PointerEvent::Move(p) => self.pointer_move(p),
            PointerEvent::Down(button, p) => self.pointer_down(button.into(), p),
            PointerEvent::Up(button, p) => self.pointer_up(button.into(), p),
            PointerEvent::Leave => {
                self.set_hover(None);
                if let Some((captured, _)) = self.capture {
                    self.tree.set_inside(captured, false);
                }
            }
        }
        self.drain_requests();
        self.flush_changes();
    }

    /// Feed a key event. It goes to the focused control, then up its ancestors.
    pub fn dispatch_key(&mut self, event: KeyEvent) {
        if self.config.design_mode {
            return;
        }
        self.route_focused(Routed::Key(event));
        self.drain_requests();
        self.flush_changes();
    }

    /// Feed a game-pad event. It goes to the focused control, then up its ancestors.
    pub fn dispatch_pad(&mut self, event: PadEvent) {
        if self.config.design_mode {
            return;
        }
        self.route_focused(Routed::Pad(event));
        self.drain_requests();
        self.flush_changes();
    }

    /// Move keyboard focus.
    ///
    /// `None` clears focus. A control that cannot take focus right now, or that
    /// lies outside the current modal target, is refused. Returns whether the
    /// request was accepted.
    pub fn focus(&mut self, target: Option<ControlId>) -> bool {
        if let Some(id) = target
            && !(self.tree.is_focusable(id) && self.in_scope(id))
        {
            log::debug!("refusing focus for {id:?}");
            return false;
        }
        self.change_focus(target);
        self.drain_requests();
        self.flush_changes();
        true
    }

    /// Whether input may reach `id` under the current modal target.
    pub(crate) fn in_scope(&self, id: ControlId) -> bool {
        self.modals
            .top()
            .is_none_or(|top| self.tree.is_in_subtree(id, top))
    }

    fn scoped_hit(&self, p: Point) -> Option<ControlId> {
        self.tree.hit_test(p).filter(|hit| self.in_scope(*hit))
    }

    fn pointer_inside(&self, id: ControlId, p: Point) -> bool {
        self.tree.absolute_bounds(id).is_some_and(|b| b.contains(p))
            && self.tree.is_interactive(id)
            && self.in_scope(id)
    }

    // --- pointer ---

    fn pointer_move(&mut self, p: Point) {
        self.pointer = p;
        if let Some((captured, button)) = self.capture {
            let inside = self.pointer_inside(captured, p);
            self.set_hover(inside.then_some(captured));
            self.tree.set_inside(captured, inside);
            if let Some(target) = self.click.on_move(button, p) {
                log::trace!("press on {target:?} wandered off; no double click");
            }
            self.with_widget(captured, |w, cx| w.on_pointer_move(cx, p, inside));
            return;
        }
        let hit = self.scoped_hit(p);
        self.set_hover(hit);
        if let Some(hit) = hit {
            self.with_widget(hit, |w, cx| w.on_pointer_move(cx, p, true));
            self.menu_pointer_move(hit, p);
        }
    }

    /// Move hover to `new`, with at most one leave and one enter.
    pub(crate) fn set_hover(&mut self, new: Option<ControlId>) {
        if self.hovered == new {
            return;
        }
        if let Some(old) = self.hovered.take() {
            self.tree.set_hovered(old, false);
            self.tree.set_inside(old, false);
            self.events.push(UiEvent::PointerLeave(old));
        }
        if let Some(id) = new {
            self.tree.set_hovered(id, true);
            self.tree.set_inside(id, true);
            self.events.push(UiEvent::PointerEnter(id));
        }
        self.hovered = new;
    }

    fn pointer_down(&mut self, button: InputButton, p: Point) {
        self.pointer = p;
        if let Some((captured, held)) = self.capture {
            log::trace!("ignoring {button:?} down while {captured:?} holds {held:?}");
            return;
        }
        let hit = self.scoped_hit(p);
        self.set_hover(hit);
        self.dismiss_menus_not_hit(hit);
        let Some(target) = hit.filter(|h| self.tree.is_alive(*h)) else {
            return;
        };
        self.tree.set_pressed(target, button, true);
        if self.tree.is_focusable(target) {
            self.change_focus(Some(target));
        }
        self.capture = Some((target, button));
        self.click.on_down(button, target, p, self.now_ms());
    }

    fn pointer_up(&mut self, button: InputButton, p: Point) {
        self.pointer = p;
        let Some((target, held)) = self.capture else {
            return;
        };
        if held != button {
            return;
        }
        self.capture = None;
        self.tree.set_pressed(target, button, false);

        let inside = self.pointer_inside(target, p);
        let allow_double = self
            .tree
            .flags(target)
            .is_some_and(|f| f.contains(ControlFlags::DOUBLE_CLICKS));
        match self
            .click
            .on_up(button, inside, p, self.now_ms(), allow_double)
        {
            ClickResult::Click(id) => self.deliver_click(id, button, Some(p)),
            ClickResult::DoubleClick(id) => {
                self.events.push(UiEvent::DoubleClick {
                    control: id,
                    button,
                });
                self.with_widget(id, |w, cx| w.on_double_click(cx, button));
                self.drain_requests();
            }
            ClickResult::Suppressed(id) => {
                log::trace!("release outside {id:?}; no click");
            }
        }

        let hit = self.scoped_hit(p);
        self.set_hover(hit);
    }

    /// Drop the pointer capture without a click.
    pub(crate) fn cancel_capture(&mut self) {
        if let Some((target, button)) = self.capture.take() {
            self.tree.set_pressed(target, button, false);
            self.click.cancel(button);
            if self.hovered != Some(target) {
                self.tree.set_inside(target, false);
            }
        }
    }

    fn deliver_click(&mut self, id: ControlId, button: InputButton, at: Option<Point>) {
        self.events.push(UiEvent::Click {
            control: id,
            button,
        });
        if self.menu_of(id).is_some() {
            if let Some(p) = at
                && button == InputButton::Left
            {
                self.menu_click(id, p);
            }
            return;
        }
        self.with_widget(id, |w, cx| w.on_click(cx, button));
        self.drain_requests();
    }

    // --- focused input ---

    pub(crate) fn route_focused(&mut self, input: Routed) {
        // Without focus, an active modal container still sees keyboard input.
        let Some(target) = self.focused.or_else(|| self.modals.top()) else {
            if let Some(forward) = input.traversal() {
                self.move_focus(forward);
            }
            return;
        };
        if !self.in_scope(target) || !self.tree.is_interactive(target) {
            log::debug!("dropping {input:?}: {target:?} cannot take input");
            return;
        }

        let chain = self.focus_chain(target);
        let stopped = dispatch::run(&chain, &mut (), |&id, _| {
            self.handle_routed(id, target, input)
        });
        match stopped {
            Some(id) => log::trace!("{input:?} handled by {id:?}"),
            None => self.default_action(input),
        }
    }

    /// The focused control and its ancestors up to the modal target, without
    /// client areas.
    fn focus_chain(&self, target: ControlId) -> Vec<ControlId> {
        let stop = self.modals.top();
        let mut chain = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            if !self.tree.is_client_area(id) {
                chain.push(id);
            }
            if Some(id) == stop {
                break;
            }
            current = self.tree.parent_of(id);
        }
        chain
    }

    fn handle_routed(&mut self, id: ControlId, target: ControlId, input: Routed) -> Outcome {
        if !self.tree.is_alive(id) {
            return Outcome::Stop;
        }
        if let Some(outcome) = self.menu_routed(id, input) {
            return outcome;
        }
        let outcome = self
            .with_widget(id, |w, cx| match input {
                Routed::Key(e) => w.on_key(cx, &e),
                Routed::Pad(e) => w.on_pad(cx, &e),
            })
            .unwrap_or(Outcome::Continue);
        self.drain_requests();
        if outcome == Outcome::Stop {
            return Outcome::Stop;
        }
        if id == target && self.tree.is_alive(target) {
            return self.activation(target, input);
        }
        Outcome::Continue
    }

    /// Space, Enter and pad A press the focused control; the release clicks it.
    fn activation(&mut self, target: ControlId, input: Routed) -> Outcome {
        let Some(slot) = input.activation_slot() else {
            return Outcome::Continue;
        };
        if !self.capabilities(target).contains(Capabilities::PRESSABLE) {
            return Outcome::Continue;
        }
        if input.pressed() {
            self.tree.set_pressed(target, slot, true);
            return Outcome::Stop;
        }
        if self.tree.pressed(target).is_some_and(|p| p.get(slot)) {
            self.tree.set_pressed(target, slot, false);
            self.deliver_click(target, slot, None);
            return Outcome::Stop;
        }
        Outcome::Continue
    }

    fn default_action(&mut self, input: Routed) {
        if let Some(forward) = input.traversal() {
            self.move_focus(forward);
            return;
        }
        match input {
            Routed::Key(e) if e.pressed && e.key == Key::Escape => self.dismiss_all_menus(),
            Routed::Pad(e) if e.button == PadButton::B => {
                let key = if e.pressed {
                    KeyEvent::press(Key::Escape)
                } else {
                    KeyEvent::release(Key::Escape)
                };
                self.route_focused(Routed::Key(key));
            }
            _ => {}
        }
    }

    /// Step focus through the active scope in traversal order, wrapping.
    ///
    /// The scope is the modal target, else the focused control's root, else
    /// the topmost root.
    fn move_focus(&mut self, forward: bool) {
        let scope = self
            .modals
            .top()
            .or_else(|| self.focused.and_then(|f| self.tree.root_of(f)))
            .or_else(|| self.tree.roots().last().copied());
        let Some(scope) = scope else {
            return;
        };
        let candidates = focus::candidates(&self.tree, scope, |id| !self.is_submenu(id));
        if let Some(next) = focus::step_linear(&candidates, self.focused, forward) {
            self.change_focus(Some(next));
        }
    }

    /// Move focus, emitting the lost/gained pair.
    pub(crate) fn change_focus(&mut self, new: Option<ControlId>) {
        if self.focused == new {
            return;
        }
        let old = self.focused;
        if let Some(old) = old {
            self.tree.set_focused(old, false);
        }
        self.events.push(UiEvent::FocusLost(old));
        self.focused = new;
        if let Some(new) = new {
            self.tree.set_focused(new, true);
        }
        self.events.push(UiEvent::FocusGained(new));
        self.menus_focus_changed(old, new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::event::PointerButton;
    use crate::widget::{Widget, WidgetCx};
    use crate::widgets::{Button, CheckBox, Panel};
    use alloc::rc::Rc;
    use core::cell::RefCell;
    use thicket_anchor::Bounds;
    use thicket_control_tree::{ControlProps, ControlState, PressedButtons};

    fn props(x: i32, y: i32, w: i32, h: i32) -> ControlProps {
        ControlProps {
            bounds: Bounds::new(x, y, w, h),
            ..Default::default()
        }
    }

    fn down(cx: &mut UiContext, x: f64, y: f64) {
        cx.dispatch_pointer(PointerEvent::Down(PointerButton::Left, Point::new(x, y)));
    }

    fn up(cx: &mut UiContext, x: f64, y: f64) {
        cx.dispatch_pointer(PointerEvent::Up(PointerButton::Left, Point::new(x, y)));
    }

    fn moved(cx: &mut UiContext, x: f64, y: f64) {
        cx.dispatch_pointer(PointerEvent::Move(Point::new(x, y)));
    }

    fn clicks(events: &[UiEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, UiEvent::Click { .. }))
            .count()
    }

    /// Records pointer moves it receives.
    #[derive(Default)]
    struct Tracker {
        moves: Rc<RefCell<Vec<(Point, bool)>>>,
    }

    impl Widget for Tracker {
        fn kind(&self) -> &'static str {
            "Tracker"
        }

        fn on_pointer_move(&mut self, _cx: &mut WidgetCx<'_>, position: Point, inside: bool) {
            self.moves.borrow_mut().push((position, inside));
        }
    }

    #[test]
    fn hover_transitions_fire_once_per_move() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 100, 100), Panel);
        let a = cx.add_widget(Some(root), props(0, 0, 40, 40), Button::new());
        let b = cx.add_widget(Some(root), props(50, 0, 40, 40), Button::new());

        moved(&mut cx, 10.0, 10.0);
        assert_eq!(cx.take_events(), [UiEvent::PointerEnter(a)]);
        moved(&mut cx, 12.0, 10.0);
        assert!(cx.take_events().is_empty());
        moved(&mut cx, 60.0, 10.0);
        assert_eq!(
            cx.take_events(),
            [UiEvent::PointerLeave(a), UiEvent::PointerEnter(b)]
        );
        assert_eq!(cx.tree().state(b, false), Some(ControlState::Hovered));
        assert_eq!(cx.tree().state(a, false), Some(ControlState::Enabled));

        cx.dispatch_pointer(PointerEvent::Leave);
        assert_eq!(cx.take_events(), [UiEvent::PointerLeave(b)]);
        assert_eq!(cx.hovered(), None);
    }

    #[test]
    fn capture_keeps_moves_and_suppresses_release_outside() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        let tracker = Tracker::default();
        let moves = tracker.moves.clone();
        let a = cx.add_widget(Some(root), props(0, 0, 40, 40), tracker);
        let b = cx.add_widget(Some(root), props(100, 0, 40, 40), Button::new());

        down(&mut cx, 10.0, 10.0);
        assert_eq!(cx.captured(), Some((a, InputButton::Left)));
        assert_eq!(cx.tree().state(a, false), Some(ControlState::Pressed));

        moved(&mut cx, 110.0, 10.0);
        assert_eq!(moves.borrow().last(), Some(&(Point::new(110.0, 10.0), false)));
        assert_ne!(cx.hovered(), Some(b), "hit testing is bypassed under capture");
        assert_eq!(cx.tree().state(a, false), Some(ControlState::Enabled));

        up(&mut cx, 110.0, 10.0);
        assert_eq!(cx.captured(), None);
        assert_eq!(clicks(&cx.take_events()), 0);
        assert_eq!(cx.hovered(), Some(b));
    }

    #[test]
    fn release_inside_after_wandering_still_clicks() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        let a = cx.add_widget(Some(root), props(0, 0, 40, 40), Button::new());

        down(&mut cx, 10.0, 10.0);
        moved(&mut cx, 150.0, 10.0);
        moved(&mut cx, 20.0, 10.0);
        assert_eq!(cx.hovered(), Some(a));
        up(&mut cx, 20.0, 10.0);
        assert!(cx.take_events().contains(&UiEvent::Click {
            control: a,
            button: InputButton::Left
        }));
    }

    #[test]
    fn quick_second_click_is_a_double_click() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        let a = cx.add_widget(Some(root), props(0, 0, 40, 40), Button::new());

        down(&mut cx, 10.0, 10.0);
        up(&mut cx, 10.0, 10.0);
        cx.update(core::time::Duration::from_millis(100));
        down(&mut cx, 11.0, 10.0);
        up(&mut cx, 11.0, 10.0);

        let events = cx.take_events();
        assert_eq!(clicks(&events), 1);
        assert!(events.contains(&UiEvent::DoubleClick {
            control: a,
            button: InputButton::Left
        }));

        // Too slow.
        cx.update(core::time::Duration::from_millis(600));
        down(&mut cx, 10.0, 10.0);
        up(&mut cx, 10.0, 10.0);
        assert_eq!(clicks(&cx.take_events()), 1);

        // Opted out.
        cx.tree_mut().set_double_clicks(a, false);
        down(&mut cx, 10.0, 10.0);
        up(&mut cx, 10.0, 10.0);
        let events = cx.take_events();
        assert_eq!(clicks(&events), 1);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, UiEvent::DoubleClick { .. }))
        );
    }

    #[test]
    fn clicking_focuses_focusable_controls_with_a_pair() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        let a = cx.add_widget(Some(root), props(0, 0, 40, 40), Button::new());
        let b = cx.add_widget(Some(root), props(50, 0, 40, 40), Button::new());
        let label = cx.add_control(Some(root), props(100, 0, 40, 40));

        down(&mut cx, 10.0, 10.0);
        up(&mut cx, 10.0, 10.0);
        down(&mut cx, 60.0, 10.0);
        up(&mut cx, 60.0, 10.0);
        let focus: Vec<UiEvent> = cx
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, UiEvent::FocusLost(_) | UiEvent::FocusGained(_)))
            .collect();
        assert_eq!(
            focus,
            [
                UiEvent::FocusLost(None),
                UiEvent::FocusGained(Some(a)),
                UiEvent::FocusLost(Some(a)),
                UiEvent::FocusGained(Some(b)),
            ]
        );

        down(&mut cx, 110.0, 10.0);
        assert_eq!(cx.focused(), Some(b), "plain controls do not take focus");
        up(&mut cx, 110.0, 10.0);
        assert_eq!(cx.hovered(), Some(label));
    }

    #[test]
    fn disabled_and_passive_controls_are_not_hit() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        let a = cx.add_widget(Some(root), props(0, 0, 40, 40), Button::new());
        let overlay = cx.add_control(Some(root), props(0, 0, 40, 40));
        cx.tree_mut().set_passive(overlay, true);

        moved(&mut cx, 10.0, 10.0);
        assert_eq!(cx.hovered(), Some(a));
        cx.tree_mut().set_enabled(a, false);
        moved(&mut cx, 11.0, 10.0);
        assert_eq!(cx.hovered(), Some(root));
    }

    #[test]
    fn tab_wraps_within_the_root() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        let a = cx.add_widget(Some(root), props(0, 0, 40, 20), Button::new());
        let inner = cx.add_widget(Some(root), props(0, 30, 100, 60), Panel);
        let b = cx.add_widget(Some(inner), props(0, 0, 40, 20), CheckBox);
        let c = cx.add_widget(Some(root), props(150, 0, 40, 20), Button::new());
        let other = cx.add_widget(None, props(300, 0, 100, 100), Panel);
        cx.add_widget(Some(other), props(0, 0, 40, 20), Button::new());

        cx.focus(Some(a));
        let tab = KeyEvent::press(Key::Tab);
        cx.dispatch_key(tab);
        assert_eq!(cx.focused(), Some(b));
        cx.dispatch_key(tab);
        assert_eq!(cx.focused(), Some(c));
        cx.dispatch_key(tab);
        assert_eq!(cx.focused(), Some(a), "wraps to the first control of the root");
        cx.dispatch_key(tab.with_modifiers(Modifiers::SHIFT));
        assert_eq!(cx.focused(), Some(c));

        cx.dispatch_pad(PadEvent::press(PadButton::Up));
        assert_eq!(cx.focused(), Some(b));
    }

    #[test]
    fn tab_without_focus_enters_the_topmost_root() {
        let mut cx = UiContext::default();
        let first = cx.add_widget(None, props(0, 0, 100, 100), Panel);
        cx.add_widget(Some(first), props(0, 0, 10, 10), Button::new());
        let second = cx.add_widget(None, props(0, 0, 100, 100), Panel);
        let target = cx.add_widget(Some(second), props(0, 0, 10, 10), Button::new());

        cx.dispatch_key(KeyEvent::press(Key::Tab));
        assert_eq!(cx.focused(), Some(target));
    }

    #[test]
    fn activation_buttons_click_with_their_own_slots() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        let check = cx.add_widget(Some(root), props(0, 0, 40, 20), CheckBox);
        cx.focus(Some(check));
        cx.take_events();

        cx.dispatch_key(KeyEvent::press(Key::Space));
        assert_eq!(cx.tree().state(check, false), Some(ControlState::Pressed));
        cx.dispatch_key(KeyEvent::release(Key::Space));
        assert!(cx.tree().flags(check).unwrap().contains(ControlFlags::CHECKED));

        cx.dispatch_pad(PadEvent::press(PadButton::A));
        assert!(cx.tree().pressed(check).unwrap().get(InputButton::PadA));
        assert!(!cx.tree().pressed(check).unwrap().get(InputButton::Keyboard));
        cx.dispatch_pad(PadEvent::release(PadButton::A));
        assert!(!cx.tree().flags(check).unwrap().contains(ControlFlags::CHECKED));

        // Pad X owns a slot but does not activate.
        cx.dispatch_pad(PadEvent::press(PadButton::X));
        assert_eq!(cx.tree().pressed(check), Some(PressedButtons::default()));
        cx.dispatch_pad(PadEvent::release(PadButton::X));

        let events = cx.take_events();
        assert_eq!(clicks(&events), 2);
        assert!(events.contains(&UiEvent::CheckedChanged {
            control: check,
            checked: true
        }));

        // A release without a press is not a click.
        cx.dispatch_key(KeyEvent::release(Key::Enter));
        assert_eq!(clicks(&cx.take_events()), 0);
    }

    /// Stops every key it sees.
    struct Swallow;

    impl Widget for Swallow {
        fn kind(&self) -> &'static str {
            "Swallow"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::CONTAINER
        }

        fn on_key(&mut self, _cx: &mut WidgetCx<'_>, _event: &KeyEvent) -> Outcome {
            Outcome::Stop
        }
    }

    #[test]
    fn ancestors_see_unhandled_keys_and_can_stop_them() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        let a = cx.add_widget(Some(root), props(0, 0, 40, 20), Button::new());
        let box_ = cx.add_widget(Some(root), props(0, 30, 100, 60), Swallow);
        let b = cx.add_widget(Some(box_), props(0, 0, 40, 20), Button::new());

        cx.focus(Some(b));
        cx.dispatch_key(KeyEvent::press(Key::Tab));
        assert_eq!(cx.focused(), Some(b), "the container swallowed Tab");

        cx.focus(Some(a));
        cx.dispatch_key(KeyEvent::press(Key::Tab));
        assert_eq!(cx.focused(), Some(b));
    }

    #[test]
    fn focus_can_be_cleared_and_refuses_unfocusable_targets() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        let a = cx.add_widget(Some(root), props(0, 0, 40, 20), Button::new());
        cx.focus(Some(a));
        cx.take_events();

        assert!(!cx.focus(Some(root)));
        assert!(cx.focus(None));
        assert_eq!(
            cx.take_events(),
            [UiEvent::FocusLost(Some(a)), UiEvent::FocusGained(None)]
        );
        assert!(!cx.tree().flags(a).unwrap().contains(ControlFlags::FOCUSED));
    }

    #[test]
    fn design_mode_ignores_input() {
        let mut cx = UiContext::new(UiConfig {
            design_mode: true,
            ..UiConfig::default()
        });
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        cx.add_widget(Some(root), props(0, 0, 40, 20), Button::new());
        down(&mut cx, 10.0, 10.0);
        up(&mut cx, 10.0, 10.0);
        cx.dispatch_key(KeyEvent::press(Key::Tab));
        assert!(cx.take_events().is_empty());
        assert_eq!(cx.focused(), None);
    }

    #[test]
    fn removing_the_captured_control_releases_capture() {
        let mut cx = UiContext::default();
        let root = cx.add_widget(None, props(0, 0, 200, 100), Panel);
        let a = cx.add_widget(Some(root), props(0, 0, 40, 20), Button::new());
        down(&mut cx, 10.0, 10.0);
        cx.remove(a);
        assert_eq!(cx.captured(), None);
        up(&mut cx, 10.0, 10.0);
        assert_eq!(clicks(&cx.take_events()), 0);
    }
}
