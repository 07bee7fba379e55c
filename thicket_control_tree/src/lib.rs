// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Control Tree: the retained tree of interactive controls.
//!
//! This crate owns the composition graph of a widget toolkit and everything
//! that follows from it:
//! - structure: create, attach (optionally into a container's client area),
//!   detach, remove, and z-order,
//! - geometry: rectangles in parent client coordinates, cached absolute
//!   rectangles, and immediate anchored relayout when a parent resizes,
//! - hit testing: topmost interactive control under a point, honoring
//!   clipping, passive controls, and hidden or disabled subtrees,
//! - interaction flags and the [`ControlState`] derived from them,
//! - invalidation ([`Damage`]) and property-change notifications.
//!
//! It does not route input, draw, or own widget behavior. Those live one
//! level up, in `thicket_ui`, which mutates the tree only through the
//! operations here.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use thicket_anchor::{Bounds, Margins};
//! use thicket_control_tree::{ControlProps, ControlTree};
//!
//! let mut tree = ControlTree::new();
//! let window = tree.insert(
//!     None,
//!     ControlProps {
//!         bounds: Bounds::new(50, 50, 200, 120),
//!         ..ControlProps::default()
//!     },
//! );
//! tree.make_container(window, Margins::new(2, 20, 2, 2));
//! let ok = tree.insert(
//!     Some(window),
//!     ControlProps {
//!         bounds: Bounds::new(10, 10, 60, 24),
//!         ..ControlProps::default()
//!     },
//! );
//!
//! assert_eq!(tree.absolute_bounds(ok), Some(Bounds::new(62, 80, 60, 24)));
//! assert_eq!(tree.hit_test(Point::new(65.0, 85.0)), Some(ok));
//! assert_eq!(tree.root_of(ok), Some(window));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod state;
mod tree;
mod types;

pub use damage::Damage;
pub use state::ControlState;
pub use tree::ControlTree;
pub use types::{
    ControlFlags, ControlId, ControlProps, InputButton, PressedButtons, Property, PropertyChange,
};
