// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Event State: small state machines for pointer interaction.
//!
//! - [`click`]: click and double-click recognition per button, with a
//!   configurable double-click window.
//!
//! These helpers hold no references into a control tree. Targets are plain
//! copyable keys, so the router can feed them tree ids directly and drop them
//! when a control goes away.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod click;
