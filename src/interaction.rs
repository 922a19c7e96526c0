//! Pointer-driven drag and resize.
//!
//! [`InteractionController`] is a two-phase state machine shared by every
//! panel: pointer-down on a header or a corner handle opens a session,
//! pointer-move recomputes the panel box from the session's start snapshot,
//! pointer-up discards the session. Every intermediate frame is already a
//! committed mutation, so there is no separate cancel path.
//!
//! The host resolves which logical target received the input and calls the
//! matching method; the controller does no hit-testing of its own.

use tracing::{debug, trace};

use crate::change::Change;
use crate::geometry::{Handle, Point, Rect, drag_to, resize_from};
use crate::panel::PanelId;
use crate::registry::PanelRegistry;

/// An in-progress move of a panel by its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub panel: PanelId,
    /// Pointer position at pointer-down.
    pub start: Point,
    /// Panel box at pointer-down.
    pub orig: Rect,
}

/// An in-progress corner resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSession {
    pub panel: PanelId,
    pub handle: Handle,
    pub start: Point,
    pub orig: Rect,
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Drag(DragSession),
    Resize(ResizeSession),
}

impl Session {
    pub fn panel(&self) -> PanelId {
        match self {
            Session::Drag(d) => d.panel,
            Session::Resize(r) => r.panel,
        }
    }
}

#[derive(Debug, Default)]
pub struct InteractionController {
    session: Option<Session>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Pointer-down on a panel's header: select it and start a drag.
    /// No-op if the panel does not exist.
    pub fn begin_drag(&mut self, registry: &mut PanelRegistry, id: PanelId, pointer: Point) -> Change {
        let change = registry.select(id);
        let Some(panel) = registry.get(id) else {
            return change;
        };
        self.start(Session::Drag(DragSession {
            panel: id,
            start: pointer,
            orig: panel.rect(),
        }));
        change
    }

    /// Pointer-down on a corner handle: select the panel and start a resize.
    /// No-op if the panel does not exist.
    pub fn begin_resize(
        &mut self,
        registry: &mut PanelRegistry,
        id: PanelId,
        handle: Handle,
        pointer: Point,
    ) -> Change {
        let change = registry.select(id);
        let Some(panel) = registry.get(id) else {
            return change;
        };
        self.start(Session::Resize(ResizeSession {
            panel: id,
            handle,
            start: pointer,
            orig: panel.rect(),
        }));
        change
    }

    fn start(&mut self, session: Session) {
        if let Some(stale) = self.session.replace(session) {
            debug!(panel = %stale.panel(), "pointer-down replaced an unfinished session");
        }
        match session {
            Session::Drag(d) => debug!(panel = %d.panel, x = d.start.x, y = d.start.y, "drag started"),
            Session::Resize(r) => {
                debug!(panel = %r.panel, handle = %r.handle, x = r.start.x, y = r.start.y, "resize started")
            }
        }
    }

    /// Pointer-move: recompute the session panel's box from the snapshot.
    /// Without a session this does nothing.
    pub fn pointer_move(&mut self, registry: &mut PanelRegistry, pointer: Point) -> Change {
        let Some(session) = self.session else {
            return Change::none();
        };
        if !registry.contains(session.panel()) {
            trace!(panel = %session.panel(), "session panel vanished; ending session");
            self.session = None;
            return Change::none();
        }
        let limits = registry.config().limits();
        match session {
            Session::Drag(d) => {
                let (dx, dy) = pointer.delta_from(d.start);
                let next = drag_to(d.orig, dx, dy, &limits);
                debug_assert_eq!((next.w, next.h), (d.orig.w, d.orig.h), "drag changed panel size");
                registry.write_rect(d.panel, next, false)
            }
            Session::Resize(r) => {
                let (dx, dy) = pointer.delta_from(r.start);
                let next = resize_from(r.orig, r.handle, dx, dy, &limits);
                registry.write_rect(r.panel, next, true)
            }
        }
    }

    /// Pointer-up: discard the session wherever the pointer is.
    pub fn pointer_up(&mut self) -> Change {
        match self.session.take() {
            Some(s) => {
                debug!(panel = %s.panel(), "session ended");
                Change::for_panel(s.panel())
            }
            None => Change::none(),
        }
    }

    /// Pointer-down anywhere else on a panel: select it only.
    pub fn press_panel(&mut self, registry: &mut PanelRegistry, id: PanelId) -> Change {
        registry.select(id)
    }

    /// Pointer-down on the empty canvas background: clear the selection.
    pub fn press_background(&mut self, registry: &mut PanelRegistry) -> Change {
        registry.deselect_all()
    }
}
