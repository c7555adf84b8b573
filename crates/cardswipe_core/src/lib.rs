//! cardswipe core primitives
//!
//! The foundational pieces shared by the animation and view crates:
//!
//! - **Geometry**: the `Vec2` used for card offsets and drag deltas
//! - **Events**: drag/pointer event model and a typed publish/subscribe dispatcher
//! - **State Machines**: flat FSMs for card interaction states
//!
//! # Example
//!
//! ```rust
//! use cardswipe_core::fsm::{card_events, card_states, StateMachine};
//!
//! let mut fsm = StateMachine::card_interaction();
//! assert!(fsm.is_in(card_states::IDLE));
//!
//! fsm.send(card_events::DRAG);
//! assert!(fsm.is_in(card_states::DRAGGING));
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;

pub use events::{Event, EventData, EventDispatcher, EventKind, EventType, PointerButton};
pub use fsm::{StateId, StateMachine, Transition};
pub use geometry::Vec2;
