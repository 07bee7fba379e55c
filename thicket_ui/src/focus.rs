// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear focus traversal within a scope.

use alloc::vec::Vec;
use thicket_control_tree::{ControlId, ControlTree};

/// Focusable controls of the subtree rooted at `scope`, in depth-first child
/// order (the traversal order), filtered by `include`.
pub(crate) fn candidates(
    tree: &ControlTree,
    scope: ControlId,
    mut include: impl FnMut(ControlId) -> bool,
) -> Vec<ControlId> {
    let mut out = Vec::new();
    let mut current = Some(scope);
    while let Some(id) = current {
        if !tree.is_in_subtree(id, scope) {
            break;
        }
        if tree.is_focusable(id) && include(id) {
            out.push(id);
        }
        current = tree.next_depth_first(id);
    }
    out
}

/// Step through `candidates` from `origin`, wrapping at both ends.
///
/// An origin that is not a candidate (or none at all) starts from the first
/// candidate going forward and from the last going backward.
pub(crate) fn step_linear<K: Copy + Eq>(
    candidates: &[K],
    origin: Option<K>,
    forward: bool,
) -> Option<K> {
    let last = candidates.len().checked_sub(1)?;
    let origin_pos = origin.and_then(|o| candidates.iter().position(|c| *c == o));
    let next = match (origin_pos, forward) {
        (Some(pos), true) if pos < last => pos + 1,
        (Some(_), true) | (None, true) => 0,
        (Some(pos), false) if pos > 0 => pos - 1,
        (Some(_), false) | (None, false) => last,
    };
    Some(candidates[next])
}
