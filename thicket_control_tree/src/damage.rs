// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary types returned from [`crate::ControlTree::take_damage`].

use alloc::vec::Vec;
use kurbo::Rect;

use crate::types::ControlId;

/// Controls invalidated since the last draw pass.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// Invalidated controls, in invalidation order.
    pub controls: Vec<ControlId>,
    /// Absolute rectangles of `controls` at the time the damage was taken.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Whether nothing needs repainting.
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}
