// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative layout descriptions.
//!
//! A [`LayoutNode`] tree names a widget kind, a rectangle, anchors, a list of
//! named properties and nested children. [`UiContext::build_layout`] turns it
//! into exactly the create, attach and setter calls code would issue, using a
//! [`WidgetFactory`] to map kind names to widgets.
//!
//! ```
//! use thicket_anchor::{Anchors, Bounds};
//! use thicket_ui::{LayoutNode, PropValue, StandardWidgets, UiContext};
//!
//! let dialog = LayoutNode::new("Window", Bounds::new(0, 0, 200, 100))
//!     .property("client_margin", PropValue::Int(4))
//!     .child(
//!         LayoutNode::new("Button", Bounds::new(10, 60, 80, 20))
//!             .named("ok")
//!             .anchored(Anchors::LEFT | Anchors::BOTTOM)
//!             .property("result", PropValue::Text("ok".into())),
//!     );
//!
//! let mut cx = UiContext::default();
//! let window = cx.build_layout(None, &dialog, &mut StandardWidgets, None).unwrap();
//! let client = cx.tree().client_area_of(window).unwrap();
//! let ok = cx.tree().children_of(client)[0];
//! assert_eq!(cx.tree().name(ok), Some("ok"));
//! assert_eq!(cx.kind_of(ok), "Button");
//! ```

use alloc::{boxed::Box, string::String, vec::Vec};
use thicket_anchor::{Anchors, Bounds, Margins, Size};
use thicket_control_tree::{ControlId, ControlProps};

use crate::context::UiContext;
use crate::event::DialogResult;
use crate::render::Skin;
use crate::widget::Widget;
use crate::widgets::{Button, CheckBox, Panel, RadioButton, Window};

/// Value of a named layout property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropValue {
    /// A flag.
    Bool(bool),
    /// A number.
    Int(i32),
    /// A string.
    Text(String),
}

/// One node of a declarative layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    /// Widget kind, `"Control"` for a plain control.
    pub kind: String,
    /// Informational name.
    pub name: String,
    /// Rectangle in the parent's client coordinates.
    pub bounds: Bounds,
    /// Anchors.
    pub anchors: Anchors,
    /// Named properties, applied in order.
    pub properties: Vec<(String, PropValue)>,
    /// Nested nodes, attached to this node's client area.
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    /// A node of `kind` at `bounds`, anchored left and top.
    pub fn new(kind: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            kind: kind.into(),
            name: String::new(),
            bounds,
            anchors: Anchors::LEFT | Anchors::TOP,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// This node with a name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// This node with different anchors.
    pub fn anchored(mut self, anchors: Anchors) -> Self {
        self.anchors = anchors;
        self
    }

    /// This node with one more property.
    pub fn property(mut self, key: impl Into<String>, value: PropValue) -> Self {
        self.properties.push((key.into(), value));
        self
    }

    /// This node with one more child.
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    fn int(&self, key: &str) -> Option<i32> {
        self.properties.iter().find_map(|(k, v)| match v {
            PropValue::Int(i) if k == key => Some(*i),
            _ => None,
        })
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.properties.iter().find_map(|(k, v)| match v {
            PropValue::Text(s) if k == key => Some(s.as_str()),
            _ => None,
        })
    }
}

/// Maps layout kinds to widgets.
pub trait WidgetFactory {
    /// A widget for `node`, or `None` if the kind is unknown.
    fn create(&mut self, node: &LayoutNode) -> Option<Box<dyn Widget>>;
}

/// Factory for the standard widget kinds.
///
/// Understands `Button` (with an optional `result` property: `ok`, `cancel`,
/// `yes`, `no` or a number), `CheckBox`, `RadioButton`, `Panel` and `Window`
/// (with an optional `default_result` property and a `dispose_on_close`
/// flag).
#[derive(Copy, Clone, Debug, Default)]
pub struct StandardWidgets;

fn parse_result(value: &str) -> Option<DialogResult> {
    match value {
        "ok" => Some(DialogResult::Ok),
        "cancel" => Some(DialogResult::Cancel),
        "yes" => Some(DialogResult::Yes),
        "no" => Some(DialogResult::No),
        other => other.parse().ok().map(DialogResult::Custom),
    }
}

impl WidgetFactory for StandardWidgets {
    fn create(&mut self, node: &LayoutNode) -> Option<Box<dyn Widget>> {
        let widget: Box<dyn Widget> = match node.kind.as_str() {
            "Button" => Box::new(Button {
                result: node.text("result").and_then(parse_result),
            }),
            "CheckBox" => Box::new(CheckBox),
            "RadioButton" => Box::new(RadioButton),
            "Panel" => Box::new(Panel),
            "Window" => {
                let mut window = Window::default();
                if let Some(result) = node.text("default_result").and_then(parse_result) {
                    window.default_result = result;
                }
                window.dispose_on_close = node
                    .properties
                    .iter()
                    .any(|(k, v)| k == "dispose_on_close" && *v == PropValue::Bool(true));
                Box::new(window)
            }
            _ => return None,
        };
        Some(widget)
    }
}

impl UiContext {
    /// Build the controls described by `node` under `parent` (into its client
    /// area) or as a root, and return the control made for `node`.
    ///
    /// Unknown kinds are skipped together with their subtree. When a skin is
    /// given, its geometry hints are applied to every created control before
    /// the node's own properties.
    pub fn build_layout(
        &mut self,
        parent: Option<ControlId>,
        node: &LayoutNode,
        factory: &mut dyn WidgetFactory,
        skin: Option<&dyn Skin>,
    ) -> Option<ControlId> {
        let props = ControlProps {
            name: node.name.clone(),
            bounds: node.bounds,
            anchors: node.anchors,
            ..ControlProps::default()
        };
        let id = if node.kind == "Control" {
            self.tree.create(props)
        } else {
            let Some(widget) = factory.create(node) else {
                log::warn!("unknown layout kind {:?}; skipping its subtree", node.kind);
                return None;
            };
            self.create_widget(props, widget)
        };
        match parent {
            Some(parent) => {
                self.tree.attach(parent, id, true);
            }
            None => self.tree.add_root(id),
        }
        if let Some(skin) = skin {
            self.apply_skin(id, skin);
        }
        self.apply_properties(id, node);

        for child in &node.children {
            self.build_layout(Some(id), child, factory, skin);
        }
        self.flush_changes();
        Some(id)
    }

    fn apply_properties(&mut self, id: ControlId, node: &LayoutNode) {
        for (key, value) in &node.properties {
            match (key.as_str(), value) {
                ("enabled", PropValue::Bool(on)) => self.tree.set_enabled(id, *on),
                ("visible", PropValue::Bool(on)) => self.tree.set_visible(id, *on),
                ("can_focus", PropValue::Bool(on)) => self.tree.set_can_focus(id, *on),
                ("passive", PropValue::Bool(on)) => self.tree.set_passive(id, *on),
                ("double_clicks", PropValue::Bool(on)) => self.tree.set_double_clicks(id, *on),
                ("checked", PropValue::Bool(on)) => self.tree.set_checked(id, *on),
                ("margin", PropValue::Int(m)) => self.tree.set_margins(id, Margins::all(*m)),
                ("client_margin", PropValue::Int(m)) => {
                    if self.tree.client_area_of(id).is_some() {
                        self.tree.set_client_margins(id, Margins::all(*m));
                    } else {
                        log::debug!("{:?} has no client area; ignoring client_margin", node.kind);
                    }
                }
                ("min_width" | "min_height", PropValue::Int(_)) => {}
                ("result" | "default_result" | "dispose_on_close", _) => {}
                _ => log::debug!("ignoring layout property {key:?} on {:?}", node.kind),
            }
        }
        let min = Size::new(
            node.int("min_width").unwrap_or(0),
            node.int("min_height").unwrap_or(0),
        );
        if min != Size::ZERO {
            let current = self.tree.min_size(id).unwrap_or_default();
            self.tree.set_min_size(
                id,
                Size::new(min.width.max(current.width), min.height.max(current.height)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Key, KeyEvent, UiEvent};
    use thicket_control_tree::ControlFlags;

    fn dialog() -> LayoutNode {
        LayoutNode::new("Window", Bounds::new(0, 0, 200, 100))
            .named("dialog")
            .property("client_margin", PropValue::Int(5))
            .property("default_result", PropValue::Text("yes".into()))
            .child(
                LayoutNode::new("CheckBox", Bounds::new(10, 10, 80, 20))
                    .property("checked", PropValue::Bool(true)),
            )
            .child(
                LayoutNode::new("Button", Bounds::new(10, 60, 80, 20))
                    .property("result", PropValue::Text("7".into()))
                    .property("min_width", PropValue::Int(100)),
            )
            .child(
                LayoutNode::new("Slider", Bounds::new(0, 0, 10, 10))
                    .child(LayoutNode::new("Button", Bounds::new(0, 0, 10, 10))),
            )
            .child(
                LayoutNode::new("Control", Bounds::new(0, 0, 190, 5))
                    .property("passive", PropValue::Bool(true))
                    .property("colour", PropValue::Text("red".into())),
            )
    }

    #[test]
    fn builds_the_same_tree_as_code() {
        let mut cx = UiContext::default();
        let window = cx
            .build_layout(None, &dialog(), &mut StandardWidgets, None)
            .unwrap();
        let client = cx.tree().client_area_of(window).unwrap();
        assert_eq!(cx.tree().bounds(client), Some(Bounds::new(5, 5, 190, 90)));

        let children = cx.tree().children_of(client).to_vec();
        assert_eq!(children.len(), 3, "the unknown kind and its subtree are skipped");
        let [check, button, strip] = children[..] else {
            unreachable!()
        };
        assert!(cx.tree().flags(check).unwrap().contains(ControlFlags::CHECKED));
        assert_eq!(cx.tree().bounds(button), Some(Bounds::new(10, 60, 100, 20)));
        assert_eq!(cx.kind_of(strip), "Control");
        assert!(cx.tree().flags(strip).unwrap().contains(ControlFlags::PASSIVE));
        assert!(cx.tree().is_focusable(button));
        assert_eq!(cx.tree().name(window), Some("dialog"));
    }

    #[test]
    fn built_dialogs_behave_like_coded_ones() {
        let mut cx = UiContext::default();
        let window = cx
            .build_layout(None, &dialog(), &mut StandardWidgets, None)
            .unwrap();
        cx.push_modal(window);
        let check = cx.focused().unwrap();
        assert_eq!(cx.kind_of(check), "CheckBox");

        cx.dispatch_key(KeyEvent::press(Key::Tab));
        cx.dispatch_key(KeyEvent::press(Key::Space));
        cx.dispatch_key(KeyEvent::release(Key::Space));
        assert!(cx.take_events().contains(&UiEvent::ModalClosed {
            container: window,
            result: DialogResult::Custom(7)
        }));
    }

    #[test]
    fn result_names_parse() {
        assert_eq!(parse_result("cancel"), Some(DialogResult::Cancel));
        assert_eq!(parse_result("12"), Some(DialogResult::Custom(12)));
        assert_eq!(parse_result("maybe"), None);
    }
}
