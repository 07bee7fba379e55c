// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click and double-click recognition.
//!
//! A click is a press and release of the same button on the same target with
//! the release landing inside that target. The caller decides what "inside"
//! means: with pointer capture the release always goes to the pressed target,
//! so the recognizer only needs to know whether the pointer is still over it.
//!
//! Two clicks of the same button on the same target turn into a double click
//! when the second one is released within [`ClickState::double_click_time`]
//! of the first, and was pressed within [`ClickState::double_click_distance`]
//! of where the first one was released. After a double click the sequence
//! starts over, so a third quick click is a plain click again.
//!
//! ## Usage
//!
//! ```
//! use kurbo::Point;
//! use thicket_event_state::click::{ClickResult, ClickState};
//!
//! let mut state: ClickState<u32, u8> = ClickState::new();
//! let at = Point::new(10.0, 20.0);
//!
//! state.on_down(0, 42, at, 1000);
//! assert_eq!(state.on_up(0, true, at, 1050, true), ClickResult::Click(42));
//!
//! state.on_down(0, 42, at, 1200);
//! assert_eq!(state.on_up(0, true, at, 1250, true), ClickResult::DoubleClick(42));
//! ```
//!
//! A release outside the pressed target is not a click:
//!
//! ```
//! # use kurbo::Point;
//! # use thicket_event_state::click::{ClickResult, ClickState};
//! let mut state: ClickState<u32, u8> = ClickState::new();
//! state.on_down(0, 42, Point::new(10.0, 20.0), 1000);
//! assert_eq!(
//!     state.on_up(0, false, Point::new(300.0, 20.0), 1050, true),
//!     ClickResult::Suppressed(Some(42))
//! );
//! ```

use alloc::collections::BTreeMap;
use kurbo::Point;

/// Click recognizer keyed by button.
///
/// `K` identifies targets, `B` identifies buttons. Each button tracks at most
/// one press at a time. Timestamps are milliseconds on any monotonic clock
/// the caller likes.
#[derive(Clone, Debug)]
pub struct ClickState<K, B> {
    presses: BTreeMap<B, Press<K, B>>,
    /// Maximum time in milliseconds between the first and second release of a double click.
    pub double_click_time: u64,
    /// Maximum distance between the first release and the second press of a double click.
    pub double_click_distance: f64,
    last_click: Option<Click<K, B>>,
}

/// An active press.
#[derive(Clone, Debug)]
pub struct Press<K, B> {
    /// The target that received the down event.
    pub target: K,
    /// The pressed button.
    pub button: B,
    /// Position of the down event.
    pub down_position: Point,
    /// Timestamp of the down event.
    pub down_time: u64,
    /// The pointer wandered further than the double-click distance since the down event.
    pub moved_too_far: bool,
}

/// A recognized click, kept to pair with the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct Click<K, B> {
    /// Clicked target.
    pub target: K,
    /// Clicked button.
    pub button: B,
    /// Position of the release.
    pub position: Point,
    /// Timestamp of the release.
    pub time: u64,
}

/// Outcome of a release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// A single click on the target.
    Click(K),
    /// The second click of a quick pair on the same target.
    DoubleClick(K),
    /// No click: there was no matching press, or the release happened outside.
    /// Carries the pressed target when there was one.
    Suppressed(Option<K>),
}

impl<K: PartialEq + Clone, B: Ord + Copy> ClickState<K, B> {
    /// Create a recognizer with a 500 ms, 4 px double-click window.
    pub fn new() -> Self {
        Self::with_thresholds(500, 4.0)
    }

    /// Create a recognizer with an explicit double-click window.
    pub fn with_thresholds(double_click_time: u64, double_click_distance: f64) -> Self {
        Self {
            presses: BTreeMap::new(),
            double_click_time,
            double_click_distance,
            last_click: None,
        }
    }

    /// Record a press of `button` on `target`, replacing any press of the same button.
    pub fn on_down(&mut self, button: B, target: K, position: Point, timestamp: u64) {
        self.presses.insert(
            button,
            Press {
                target,
                button,
                down_position: position,
                down_time: timestamp,
                moved_too_far: false,
            },
        );
    }

    /// Track movement while `button` is held.
    ///
    /// Returns the pressed target the first time the pointer strays further
    /// than the double-click distance from the down position. Such a press can
    /// still produce a click, but never a double click.
    pub fn on_move(&mut self, button: B, position: Point) -> Option<K> {
        let limit = self.double_click_distance;
        let press = self.presses.get_mut(&button)?;
        if press.moved_too_far || within(press.down_position, position, limit) {
            return None;
        }
        press.moved_too_far = true;
        Some(press.target.clone())
    }

    /// Resolve the release of `button`.
    ///
    /// `inside` tells whether the pointer is still over the pressed target.
    /// With `allow_double` false the release is always a single click, which
    /// is how targets opt out of double clicks.
    pub fn on_up(
        &mut self,
        button: B,
        inside: bool,
        position: Point,
        timestamp: u64,
        allow_double: bool,
    ) -> ClickResult<K> {
        let Some(press) = self.presses.remove(&button) else {
            return ClickResult::Suppressed(None);
        };

        if !inside {
            self.last_click = None;
            return ClickResult::Suppressed(Some(press.target));
        }

        let pairs = allow_double
            && !press.moved_too_far
            && self.last_click.as_ref().is_some_and(|last| {
                last.target == press.target
                    && last.button == button
                    && timestamp.saturating_sub(last.time) <= self.double_click_time
                    && within(last.position, press.down_position, self.double_click_distance)
            });

        if pairs {
            self.last_click = None;
            return ClickResult::DoubleClick(press.target);
        }

        self.last_click = Some(Click {
            target: press.target.clone(),
            button,
            position,
            time: timestamp,
        });
        ClickResult::Click(press.target)
    }

    /// Drop the press of `button` without producing a click.
    ///
    /// Returns whether a press was active.
    pub fn cancel(&mut self, button: B) -> bool {
        self.presses.remove(&button).is_some()
    }

    /// Whether `button` is currently held.
    pub fn is_pressed(&self, button: B) -> bool {
        self.presses.contains_key(&button)
    }

    /// Whether any active press targets `query_target`.
    pub fn has_active_press(&self, query_target: &K) -> bool {
        self.presses
            .values()
            .any(|press| press.target == *query_target)
    }

    /// Forget a target: cancel its presses and stop pairing clicks with it.
    ///
    /// Call this when the target is destroyed.
    pub fn forget(&mut self, target: &K) {
        self.presses.retain(|_, press| press.target != *target);
        if self.last_click.as_ref().is_some_and(|c| c.target == *target) {
            self.last_click = None;
        }
    }

    /// Clear all presses and the click history.
    pub fn clear(&mut self) {
        self.presses.clear();
        self.last_click = None;
    }

    /// The active press of `button`, if any.
    pub fn get_press(&self, button: B) -> Option<&Press<K, B>> {
        self.presses.get(&button)
    }

    /// All active presses, in button order.
    pub fn presses(&self) -> impl Iterator<Item = &Press<K, B>> {
        self.presses.values()
    }

    /// The last single click still waiting to pair into a double click.
    pub fn last_click(&self) -> Option<&Click<K, B>> {
        self.last_click.as_ref()
    }
}

impl<K: PartialEq + Clone, B: Ord + Copy> Default for ClickState<K, B> {
    fn default() -> Self {
        Self::new()
    }
}

fn within(a: Point, b: Point, limit: f64) -> bool {
    (b - a).hypot2() <= limit * limit
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: u8 = 0;
    const RIGHT: u8 = 1;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn release_inside_generates_click() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(LEFT, 42, p(10.0, 20.0), 1000);
        assert!(state.is_pressed(LEFT));

        let result = state.on_up(LEFT, true, p(12.0, 22.0), 1050, true);
        assert_eq!(result, ClickResult::Click(42));
        assert!(!state.is_pressed(LEFT));
    }

    #[test]
    fn release_outside_is_suppressed() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(LEFT, 42, p(10.0, 20.0), 1000);
        let result = state.on_up(LEFT, false, p(500.0, 20.0), 1050, true);
        assert_eq!(result, ClickResult::Suppressed(Some(42)));
    }

    #[test]
    fn release_without_press_is_suppressed() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        assert_eq!(
            state.on_up(LEFT, true, p(0.0, 0.0), 10, true),
            ClickResult::Suppressed(None)
        );
    }

    #[test]
    fn buttons_are_tracked_independently() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(LEFT, 1, p(0.0, 0.0), 0);
        state.on_down(RIGHT, 2, p(0.0, 0.0), 5);

        assert_eq!(
            state.on_up(RIGHT, true, p(0.0, 0.0), 10, true),
            ClickResult::Click(2)
        );
        assert!(state.is_pressed(LEFT));
        assert_eq!(
            state.on_up(LEFT, true, p(0.0, 0.0), 20, true),
            ClickResult::Click(1)
        );
    }

    #[test]
    fn quick_second_click_is_a_double_click() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(LEFT, 7, p(10.0, 10.0), 0);
        assert_eq!(state.on_up(LEFT, true, p(10.0, 10.0), 40, true), ClickResult::Click(7));
        state.on_down(LEFT, 7, p(11.0, 12.0), 200);
        assert_eq!(
            state.on_up(LEFT, true, p(11.0, 12.0), 240, true),
            ClickResult::DoubleClick(7)
        );
        // The pair is consumed; a third click starts over.
        state.on_down(LEFT, 7, p(11.0, 12.0), 300);
        assert_eq!(state.on_up(LEFT, true, p(11.0, 12.0), 340, true), ClickResult::Click(7));
    }

    #[test]
    fn slow_second_click_is_single() {
        let mut state: ClickState<u32, u8> = ClickState::with_thresholds(300, 4.0);
        state.on_down(LEFT, 7, p(0.0, 0.0), 0);
        state.on_up(LEFT, true, p(0.0, 0.0), 10, true);
        state.on_down(LEFT, 7, p(0.0, 0.0), 400);
        assert_eq!(state.on_up(LEFT, true, p(0.0, 0.0), 410, true), ClickResult::Click(7));
    }

    #[test]
    fn distant_second_click_is_single() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(LEFT, 7, p(0.0, 0.0), 0);
        state.on_up(LEFT, true, p(0.0, 0.0), 10, true);
        state.on_down(LEFT, 7, p(20.0, 0.0), 50);
        assert_eq!(state.on_up(LEFT, true, p(20.0, 0.0), 60, true), ClickResult::Click(7));
    }

    #[test]
    fn wandering_press_cannot_complete_a_double_click() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(LEFT, 7, p(0.0, 0.0), 0);
        state.on_up(LEFT, true, p(0.0, 0.0), 10, true);
        state.on_down(LEFT, 7, p(0.0, 0.0), 50);
        assert_eq!(state.on_move(LEFT, p(2.0, 2.0)), None);
        assert_eq!(state.on_move(LEFT, p(30.0, 0.0)), Some(7));
        assert_eq!(state.on_move(LEFT, p(40.0, 0.0)), None, "reported once");
        assert_eq!(state.on_up(LEFT, true, p(0.0, 0.0), 60, true), ClickResult::Click(7));
    }

    #[test]
    fn different_targets_or_buttons_do_not_pair() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(LEFT, 1, p(0.0, 0.0), 0);
        state.on_up(LEFT, true, p(0.0, 0.0), 10, true);
        state.on_down(LEFT, 2, p(0.0, 0.0), 20);
        assert_eq!(state.on_up(LEFT, true, p(0.0, 0.0), 30, true), ClickResult::Click(2));
        state.on_down(RIGHT, 2, p(0.0, 0.0), 40);
        assert_eq!(state.on_up(RIGHT, true, p(0.0, 0.0), 50, true), ClickResult::Click(2));
    }

    #[test]
    fn opting_out_of_double_clicks() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(LEFT, 7, p(0.0, 0.0), 0);
        state.on_up(LEFT, true, p(0.0, 0.0), 10, false);
        state.on_down(LEFT, 7, p(0.0, 0.0), 20);
        assert_eq!(state.on_up(LEFT, true, p(0.0, 0.0), 30, false), ClickResult::Click(7));
    }

    #[test]
    fn forget_and_cancel() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(LEFT, 7, p(0.0, 0.0), 0);
        assert!(state.has_active_press(&7));
        state.forget(&7);
        assert!(!state.has_active_press(&7));
        assert!(!state.cancel(LEFT));

        state.on_down(LEFT, 8, p(0.0, 0.0), 0);
        assert!(state.cancel(LEFT));
        assert_eq!(state.last_click(), None);
    }
}
