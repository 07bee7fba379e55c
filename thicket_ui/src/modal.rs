// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modal containers.
//!
//! At most one container is the modal target. Each modal record remembers the
//! container it preempted, forming a chain back to "no modal". While a modal is
//! active, keyboard and game-pad input only reaches controls inside it, and
//! pointer hits outside it are inert.

use alloc::vec::Vec;
use thicket_control_tree::ControlId;

use crate::context::UiContext;
use crate::event::{DialogResult, UiEvent};
use crate::focus;
use crate::widget::{Closing, Disposal};

/// One entry of the modal chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalRecord {
    /// The modal container.
    pub container: ControlId,
    /// The modal target it preempted.
    pub previous: Option<ControlId>,
    /// Result code, set when closing starts.
    pub result: DialogResult,
    pub(crate) restore_focus: Option<ControlId>,
    pub(crate) closing: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ModalStack {
    records: Vec<ModalRecord>,
    top: Option<ControlId>,
}

impl ModalStack {
    pub(crate) fn top(&self) -> Option<ControlId> {
        self.top
    }

    pub(crate) fn contains(&self, container: ControlId) -> bool {
        self.records.iter().any(|r| r.container == container)
    }

    pub(crate) fn record(&self, container: ControlId) -> Option<&ModalRecord> {
        self.records.iter().find(|r| r.container == container)
    }

    fn record_mut(&mut self, container: ControlId) -> Option<&mut ModalRecord> {
        self.records.iter_mut().find(|r| r.container == container)
    }

    fn push(&mut self, record: ModalRecord) {
        self.top = Some(record.container);
        self.records.push(record);
    }

    /// Remove a record, re-pointing anything that referenced it at what it
    /// preempted. Returns the record and whether it was the top.
    pub(crate) fn unlink(&mut self, container: ControlId) -> Option<(ModalRecord, bool)> {
        let pos = self.records.iter().position(|r| r.container == container)?;
        let record = self.records.remove(pos);
        let was_top = self.top == Some(container);
        if was_top {
            self.top = record.previous;
        }
        for r in &mut self.records {
            if r.previous == Some(container) {
                r.previous = record.previous;
            }
        }
        Some((record, was_top))
    }

    /// The chain from the top back to the first modal.
    pub(crate) fn chain(&self) -> Vec<ControlId> {
        let mut out = Vec::new();
        let mut current = self.top;
        // Each step visits a distinct record; the bound only guards a corrupted chain.
        while let Some(c) = current
            && out.len() < self.records.len()
        {
            out.push(c);
            current = self.record(c).and_then(|r| r.previous);
        }
        out
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.top = None;
    }
}

impl UiContext {
    /// Make `container` the modal target.
    ///
    /// The container is shown, raised among its siblings, and the first
    /// focusable control inside it takes focus. Open menus outside it are
    /// dismissed and a capture held outside it is cancelled. Pushing a
    /// container that is already in the chain does nothing.
    ///
    /// Returns whether the container became modal.
    pub fn push_modal(&mut self, container: ControlId) -> bool {
        if !self.tree.is_alive(container) {
            log::warn!("push_modal on stale control {container:?}");
            return false;
        }
        if self.modals.contains(container) {
            log::debug!("{container:?} is already modal");
            return false;
        }
        self.modals.push(ModalRecord {
            container,
            previous: self.modals.top(),
            result: DialogResult::None,
            restore_focus: self.focused,
            closing: false,
        });
        self.tree.set_visible(container, true);
        self.tree.bring_to_front(container);
        self.events.push(UiEvent::ModalOpened(container));

        self.dismiss_menus_outside_scope(container);
        if let Some((captured, _)) = self.capture
            && !self.tree.is_in_subtree(captured, container)
        {
            self.cancel_capture();
        }
        if let Some(hovered) = self.hovered
            && !self.tree.is_in_subtree(hovered, container)
        {
            self.set_hover(None);
        }
        let first = focus::candidates(&self.tree, container, |_| true)
            .first()
            .copied();
        self.change_focus(first);

        self.drain_requests();
        self.flush_changes();
        true
    }

    /// Close a modal container.
    ///
    /// The container's widget may cancel in [`Widget::closing`](crate::Widget::closing).
    /// Otherwise the preempted modal becomes the target again, focus returns to
    /// where it was when `container` was pushed, the container is hidden,
    /// [`Widget::closed`](crate::Widget::closed) runs (and may ask for
    /// disposal), and finally the record leaves the chain.
    ///
    /// Closing a container that is not modal, or is already closing, does
    /// nothing. Returns whether the container closed.
    pub fn pop_modal(&mut self, container: ControlId, result: DialogResult) -> bool {
        let Some(record) = self.modals.record_mut(container) else {
            log::debug!("{container:?} is not modal; ignoring close");
            return false;
        };
        if record.closing {
            log::debug!("{container:?} is already closing");
            return false;
        }
        record.closing = true;
        record.result = result;

        let verdict = self
            .with_widget(container, |w, cx| w.closing(cx, result))
            .unwrap_or(Closing::Proceed);
        if verdict == Closing::Cancel {
            if let Some(record) = self.modals.record_mut(container) {
                record.closing = false;
            }
            log::debug!("closing {container:?} was cancelled");
            self.drain_requests();
            self.flush_changes();
            return false;
        }

        let Some(record) = self.modals.record(container).cloned() else {
            return false;
        };
        let was_top = self.modals.top() == Some(container);
        if was_top {
            self.modals.top = record.previous;
        }
        let focus_inside = self
            .focused
            .is_some_and(|f| self.tree.is_in_subtree(f, container));
        if was_top || focus_inside {
            let target = self.restore_target(record.restore_focus, container);
            self.change_focus(target);
        }

        self.tree.set_visible(container, false);
        if let Some((captured, _)) = self.capture
            && self.tree.is_in_subtree(captured, container)
        {
            self.cancel_capture();
        }
        if let Some(hovered) = self.hovered
            && self.tree.is_in_subtree(hovered, container)
        {
            self.set_hover(None);
        }

        let disposal = self
            .with_widget(container, |w, cx| w.closed(cx, result))
            .unwrap_or(Disposal::Keep);
        self.events.push(UiEvent::ModalClosed { container, result });
        self.modals.unlink(container);
        if disposal == Disposal::Dispose {
            self.remove(container);
        }

        self.drain_requests();
        self.flush_changes();
        true
    }

    /// The current modal target.
    pub fn modal(&self) -> Option<ControlId> {
        self.modals.top()
    }

    /// Modal containers from the current target back to the first one pushed.
    pub fn modal_chain(&self) -> Vec<ControlId> {
        self.modals.chain()
    }

    /// The modal record of a container.
    pub fn modal_record(&self, container: ControlId) -> Option<&ModalRecord> {
        self.modals.record(container)
    }

    /// Where focus goes once `closed` stops being modal: the remembered control
    /// if it is still usable, else the first focusable control of the new
    /// modal target.
    pub(crate) fn restore_target(
        &self,
        remembered: Option<ControlId>,
        closed: ControlId,
    ) -> Option<ControlId> {
        remembered
            .filter(|f| {
                self.tree.is_focusable(*f)
                    && self.in_scope(*f)
                    && !self.tree.is_in_subtree(*f, closed)
            })
            .or_else(|| {
                let top = self.modals.top()?;
                focus::candidates(&self.tree, top, |_| true)
                    .first()
                    .copied()
            })
    }
}
