// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Anchor: integer control geometry and anchor-based resize resolution.
//!
//! A control's rectangle is stored relative to its parent's client area. When the
//! parent's client area changes size, [`resolve`] computes the control's new
//! rectangle from its [`Anchors`], its [`Margins`] and its minimum [`Size`].
//!
//! - Anchored to one edge of an axis: the distance to that edge is held.
//! - Anchored to both edges: the control stretches with the parent.
//! - Anchored to neither: the control keeps its size and its position scales
//!   with the parent, so it floats proportionally instead of sticking to the origin.
//!
//! The resolver is a pure function. Keeping a reference rectangle per control and
//! always resolving from it (as `thicket_control_tree` does) makes resize round
//! trips exact even when proportional positions round.
//!
//! ```
//! use thicket_anchor::{Anchors, Bounds, Margins, Size, resolve};
//!
//! let ok_button = Bounds::new(140, 70, 50, 20);
//! let moved = resolve(
//!     Size::new(200, 100),
//!     Size::new(320, 140),
//!     Anchors::RIGHT | Anchors::BOTTOM,
//!     Margins::ZERO,
//!     ok_button,
//!     Size::ZERO,
//! );
//! assert_eq!(moved, Bounds::new(260, 110, 50, 20));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod resolve;
mod types;

pub use resolve::resolve;
pub use types::{Anchors, Bounds, Margins, Size};
