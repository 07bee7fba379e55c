// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The anchor resolver.

use crate::types::{Anchors, Bounds, Margins, Size};

/// Compute a control's rectangle after its parent's client area changed size.
///
/// - `old_parent` / `new_parent`: the parent's client extent before and after
///   the change. Child rectangles live in client-local coordinates, so only the
///   extents matter.
/// - `anchors`: which parent edges the control follows.
/// - `margins`: the minimum distance the control keeps from each anchored edge.
/// - `current`: the control's rectangle relative to `old_parent`.
/// - `min_size`: the control's minimum extent.
///
/// Per axis (left/right shown, top/bottom is identical):
///
/// | Anchored     | Result                                                   |
/// |--------------|----------------------------------------------------------|
/// | left         | position and width unchanged                             |
/// | right        | width unchanged, distance to the right edge unchanged    |
/// | left + right | left edge fixed, width absorbs the parent's change       |
/// | neither      | width unchanged, position scales with the parent's size  |
///
/// Minimum-size clamping is applied after the anchor math. A degenerate
/// (zero-size) new parent collapses the child to zero extent at the parent
/// origin on that axis, still subject to the minimum size.
///
/// ```
/// use thicket_anchor::{Anchors, Bounds, Margins, Size, resolve};
///
/// let button = Bounds::new(10, 10, 180, 20);
/// let resized = resolve(
///     Size::new(200, 100),
///     Size::new(400, 100),
///     Anchors::LEFT | Anchors::RIGHT | Anchors::TOP,
///     Margins::ZERO,
///     button,
///     Size::ZERO,
/// );
/// assert_eq!(resized, Bounds::new(10, 10, 380, 20));
/// ```
pub fn resolve(
    old_parent: Size,
    new_parent: Size,
    anchors: Anchors,
    margins: Margins,
    current: Bounds,
    min_size: Size,
) -> Bounds {
    let (x, width) = resolve_axis(
        Span {
            old_extent: old_parent.width,
            new_extent: new_parent.width,
            pos: current.x,
            len: current.width,
            near: anchors.contains(Anchors::LEFT),
            far: anchors.contains(Anchors::RIGHT),
            margin_near: margins.left,
            margin_far: margins.right,
        },
        min_size.width,
    );
    let (y, height) = resolve_axis(
        Span {
            old_extent: old_parent.height,
            new_extent: new_parent.height,
            pos: current.y,
            len: current.height,
            near: anchors.contains(Anchors::TOP),
            far: anchors.contains(Anchors::BOTTOM),
            margin_near: margins.top,
            margin_far: margins.bottom,
        },
        min_size.height,
    );
    Bounds::new(x, y, width, height)
}

/// One axis of a resize problem.
#[derive(Copy, Clone, Debug)]
struct Span {
    old_extent: i32,
    new_extent: i32,
    pos: i32,
    len: i32,
    near: bool,
    far: bool,
    margin_near: i32,
    margin_far: i32,
}

fn resolve_axis(span: Span, min_len: i32) -> (i32, i32) {
    let min_len = min_len.max(0);
    if span.new_extent <= 0 {
        return (0, min_len);
    }

    let far_dist = (span.old_extent - (span.pos + span.len)).max(span.margin_far);
    let (pos, len) = match (span.near, span.far) {
        (true, false) => (span.pos.max(span.margin_near), span.len),
        (false, true) => (span.new_extent - far_dist - span.len, span.len),
        (true, true) => {
            let near_dist = span.pos.max(span.margin_near);
            (near_dist, span.new_extent - near_dist - far_dist)
        }
        (false, false) => (scale(span.pos, span.old_extent, span.new_extent), span.len),
    };

    (pos, len.max(0).max(min_len))
}

/// `pos * new / old`, rounded half up; identity when `old` is degenerate.
fn scale(pos: i32, old: i32, new: i32) -> i32 {
    if old <= 0 {
        return pos;
    }
    let (pos, old, new) = (i64::from(pos), i64::from(old), i64::from(new));
    let scaled = (2 * pos * new + old).div_euclid(2 * old);
    i32::try_from(scaled).unwrap_or(if scaled < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: Size = Size::new(200, 100);
    const WIDE: Size = Size::new(400, 100);

    fn all_anchor_sets() -> impl Iterator<Item = Anchors> {
        (0_u8..16).map(Anchors::from_bits_truncate)
    }

    #[test]
    fn left_top_keeps_fixed_origin() {
        let button = Bounds::new(10, 10, 50, 20);
        let out = resolve(
            PANEL,
            WIDE,
            Anchors::LEFT | Anchors::TOP,
            Margins::ZERO,
            button,
            Size::ZERO,
        );
        assert_eq!(out, Bounds::new(10, 10, 50, 20));
    }

    #[test]
    fn left_right_stretches_keeping_both_margins() {
        let button = Bounds::new(10, 10, 180, 20);
        let out = resolve(
            PANEL,
            WIDE,
            Anchors::LEFT | Anchors::RIGHT | Anchors::TOP,
            Margins::ZERO,
            button,
            Size::ZERO,
        );
        assert_eq!(out, Bounds::new(10, 10, 380, 20));
        assert_eq!(WIDE.width - out.right(), 10, "right margin must be held");
    }

    #[test]
    fn right_only_follows_the_far_edge() {
        let button = Bounds::new(140, 10, 50, 20);
        let out = resolve(
            PANEL,
            WIDE,
            Anchors::RIGHT | Anchors::TOP,
            Margins::ZERO,
            button,
            Size::ZERO,
        );
        assert_eq!(out, Bounds::new(340, 10, 50, 20));
    }

    #[test]
    fn unanchored_axis_scales_proportionally() {
        let button = Bounds::new(50, 10, 20, 20);
        let out = resolve(
            PANEL,
            WIDE,
            Anchors::TOP,
            Margins::ZERO,
            button,
            Size::ZERO,
        );
        assert_eq!(out.x, 100, "x should double with the parent width");
        assert_eq!(out.width, 20, "width is kept");
    }

    #[test]
    fn vertical_axis_is_independent() {
        let panel = Size::new(200, 100);
        let tall = Size::new(200, 300);
        let out = resolve(
            panel,
            tall,
            Anchors::LEFT | Anchors::BOTTOM,
            Margins::ZERO,
            Bounds::new(10, 70, 50, 20),
            Size::ZERO,
        );
        assert_eq!(out, Bounds::new(10, 270, 50, 20));
    }

    #[test]
    fn resize_and_back_is_identity_for_every_anchor_set() {
        let start = Bounds::new(12, 8, 60, 30);
        for anchors in all_anchor_sets() {
            let grown = resolve(PANEL, WIDE, anchors, Margins::ZERO, start, Size::ZERO);
            let back = resolve(WIDE, PANEL, anchors, Margins::ZERO, grown, Size::ZERO);
            assert_eq!(back, start, "round trip failed for {anchors:?}");
        }
    }

    #[test]
    fn min_size_clamps_after_anchor_math() {
        let out = resolve(
            PANEL,
            Size::new(60, 100),
            Anchors::LEFT | Anchors::RIGHT,
            Margins::ZERO,
            Bounds::new(10, 0, 180, 20),
            Size::new(70, 0),
        );
        // Anchor math yields 60 - 10 - 10 = 40; the clamp raises it afterwards.
        assert_eq!(out.width, 70);
        assert_eq!(out.x, 10);
    }

    #[test]
    fn degenerate_parent_collapses_children() {
        let out = resolve(
            PANEL,
            Size::new(0, 0),
            Anchors::ALL,
            Margins::ZERO,
            Bounds::new(10, 10, 50, 20),
            Size::new(4, 0),
        );
        assert_eq!(out, Bounds::new(0, 0, 4, 0));
    }

    #[test]
    fn degenerate_old_parent_does_not_divide_by_zero() {
        let out = resolve(
            Size::ZERO,
            PANEL,
            Anchors::empty(),
            Margins::ZERO,
            Bounds::new(10, 10, 50, 20),
            Size::ZERO,
        );
        assert_eq!(out, Bounds::new(10, 10, 50, 20));
    }

    #[test]
    fn margins_keep_distance_from_anchored_edges() {
        let out = resolve(
            PANEL,
            WIDE,
            Anchors::LEFT | Anchors::RIGHT,
            Margins::new(16, 0, 16, 0),
            Bounds::new(10, 0, 180, 20),
            Size::ZERO,
        );
        assert_eq!(out.x, 16);
        assert_eq!(out.right(), WIDE.width - 16);
    }
}
