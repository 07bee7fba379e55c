// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler chain walking for keyboard and game-pad input.
//!
//! Focused input is delivered to the focused control first and then to each
//! ancestor in turn, so dialog-level shortcuts see whatever the focused
//! control did not handle. [`run`] walks such a chain and stops at the first
//! handler returning [`Outcome::Stop`].

/// Whether propagation continues after a handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Pass the event on to the next handler.
    Continue,
    /// The event is handled; later handlers do not see it.
    Stop,
}

/// Walk `chain` in order, calling `handler` for each entry until one returns
/// [`Outcome::Stop`].
///
/// Returns the entry that stopped propagation, if any.
pub(crate) fn run<'a, K, E>(
    chain: &'a [K],
    event: &mut E,
    mut handler: impl FnMut(&K, &mut E) -> Outcome,
) -> Option<&'a K> {
    for entry in chain {
        match handler(entry, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(entry),
        }
    }
    None
}
