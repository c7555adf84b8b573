//! Drag router
//!
//! Forwards drag input to whichever card is currently at the front. The
//! view re-points it after every recycle; input arriving before the view is
//! initialized, or aimed at a hidden card, is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use cardswipe_core::events::event_types;
use cardswipe_core::{Event, EventData, PointerButton, Vec2};

use crate::card::{SwipeDirection, Swipeable};
use crate::view::CardId;

/// The card drag input is routed to
#[derive(Clone)]
pub struct SwipeTarget {
    pub card: CardId,
    pub swipeable: Rc<RefCell<dyn Swipeable>>,
}

impl std::fmt::Debug for SwipeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeTarget")
            .field("card", &self.card)
            .finish_non_exhaustive()
    }
}

/// Routes drag input to the active card
#[derive(Debug)]
pub struct Swiper {
    target: Option<SwipeTarget>,
    /// Multiplier applied to every drag delta
    sensitivity: f32,
}

impl Default for Swiper {
    fn default() -> Self {
        Self {
            target: None,
            sensitivity: 1.0,
        }
    }
}

impl Swiper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale drag deltas before they reach the card
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Replace the target card and its controller together
    pub fn set_target(&mut self, card: CardId, swipeable: Rc<RefCell<dyn Swipeable>>) {
        tracing::debug!("swiper target -> {:?}", card);
        self.target = Some(SwipeTarget { card, swipeable });
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// The card currently receiving input
    pub fn target(&self) -> Option<CardId> {
        self.target.as_ref().map(|t| t.card)
    }

    /// Target controller, if it may receive input from `button`
    fn accepting(&self, button: PointerButton) -> Option<&Rc<RefCell<dyn Swipeable>>> {
        if button != PointerButton::Left {
            tracing::trace!("ignoring drag from {:?} button", button);
            return None;
        }
        let Some(target) = self.target.as_ref() else {
            tracing::trace!("ignoring drag: no target card");
            return None;
        };
        if !target.swipeable.borrow().is_interactable() {
            return None;
        }
        Some(&target.swipeable)
    }

    /// A drag session started; returns whether it would be routed
    pub fn on_drag_begin(&mut self, button: PointerButton) -> bool {
        self.accepting(button).is_some()
    }

    /// Forward a local-space drag delta
    pub fn on_drag(&mut self, button: PointerButton, delta: Vec2) -> bool {
        let sensitivity = self.sensitivity;
        let Some(swipeable) = self.accepting(button) else {
            return false;
        };
        swipeable.borrow_mut().swipe(delta * sensitivity);
        true
    }

    /// The drag ended; the card decides between commit and snap-back
    pub fn on_drag_end(&mut self, button: PointerButton) -> bool {
        let Some(swipeable) = self.accepting(button) else {
            return false;
        };
        swipeable.borrow_mut().end_swipe();
        true
    }

    /// Commit the target card without a drag
    pub fn auto_swipe(&mut self, direction: SwipeDirection) -> bool {
        let Some(target) = self.target.as_ref() else {
            tracing::warn!("auto swipe requested before any card was targeted");
            return false;
        };
        target.swipeable.borrow_mut().auto_swipe(direction);
        true
    }

    /// Route a raw drag event by its type; returns whether it was forwarded
    pub fn handle_event(&mut self, event: &Event) -> bool {
        let EventData::Drag {
            delta_x,
            delta_y,
            button,
        } = event.data
        else {
            return false;
        };

        match event.event_type {
            event_types::DRAG_BEGIN => self.on_drag_begin(button),
            event_types::DRAG => self.on_drag(button, Vec2::new(delta_x, delta_y)),
            event_types::DRAG_END => self.on_drag_end(button),
            _ => false,
        }
    }
}
