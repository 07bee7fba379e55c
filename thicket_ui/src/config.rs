// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context configuration.

use core::time::Duration;

/// Tunables of a [`UiContext`](crate::UiContext).
///
/// Read once at construction; the double-click window can be changed later
/// through [`UiContext::set_config`](crate::UiContext::set_config).
#[derive(Clone, Debug, PartialEq)]
pub struct UiConfig {
    /// Longest gap between two releases that still pairs into a double click.
    pub double_click_time: Duration,
    /// Furthest the second press may land from the first release, in pixels.
    pub double_click_distance: f64,
    /// Height of one item in a vertical menu.
    pub menu_item_height: i32,
    /// Width of one item in a horizontal menu bar.
    pub menu_bar_item_width: i32,
    /// Width of a spawned submenu.
    pub menu_width: i32,
    /// Extra space before an item flagged as separated.
    pub menu_separator_height: i32,
    /// How often open menus re-validate their selection against the item tree.
    pub menu_refresh_interval: Duration,
    /// Editor preview: every control resolves as enabled and input is ignored.
    pub design_mode: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            double_click_time: Duration::from_millis(500),
            double_click_distance: 4.0,
            menu_item_height: 20,
            menu_bar_item_width: 64,
            menu_width: 160,
            menu_separator_height: 6,
            menu_refresh_interval: Duration::from_millis(250),
            design_mode: false,
        }
    }
}
