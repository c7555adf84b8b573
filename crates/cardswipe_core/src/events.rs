//! Event model
//!
//! Drag events as delivered by the host's input adapter, and a typed
//! publish/subscribe dispatcher for the events a card stack emits.

use rustc_hash::FxHashMap;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    /// Drag session started (pointer down + first move)
    pub const DRAG_BEGIN: EventType = 5;
    /// Drag moved; carries a local-space delta
    pub const DRAG: EventType = 6;
    /// Drag ended (pointer up after drag)
    pub const DRAG_END: EventType = 7;
}

/// Pointer button that produced an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button (left mouse button, or any touch)
    #[default]
    Left,
    Right,
    Middle,
    Other(u8),
}

/// An input event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: u64,
    pub data: EventData,
    pub timestamp: u64,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    /// Drag delta already projected into the card's local space
    Drag {
        delta_x: f32,
        delta_y: f32,
        button: PointerButton,
    },
    None,
}

impl Event {
    /// Create a drag-phase event (`DRAG_BEGIN`, `DRAG`, `DRAG_END`)
    pub fn drag(event_type: EventType, delta_x: f32, delta_y: f32, button: PointerButton) -> Self {
        Self {
            event_type,
            target: 0,
            data: EventData::Drag {
                delta_x,
                delta_y,
                button,
            },
            timestamp: 0,
        }
    }
}

/// Events that can be routed through an [`EventDispatcher`]
pub trait EventKind {
    /// The channel this event is delivered on
    fn kind(&self) -> EventType;
}

/// Event handler function type
pub type EventHandler<E> = Box<dyn FnMut(&E)>;

/// Ordered publish/subscribe registry
///
/// Handlers for a kind are invoked in registration order. Dispatch is
/// synchronous and single-threaded.
pub struct EventDispatcher<E> {
    handlers: FxHashMap<EventType, Vec<EventHandler<E>>>,
}

impl<E: EventKind> EventDispatcher<E> {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register a handler for an event kind
    pub fn register<F>(&mut self, kind: EventType, handler: F)
    where
        F: FnMut(&E) + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    /// Dispatch an event to its handlers, returning how many ran
    pub fn dispatch(&mut self, event: &E) -> usize {
        let Some(handlers) = self.handlers.get_mut(&event.kind()) else {
            return 0;
        };
        for handler in handlers.iter_mut() {
            handler(event);
        }
        handlers.len()
    }
}

impl<E: EventKind> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventDispatcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("kinds", &self.handlers.len())
            .finish()
    }
}
