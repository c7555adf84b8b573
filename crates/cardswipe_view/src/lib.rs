//! cardswipe view
//!
//! A swipeable card stack: two recycled cards presenting an unbounded list,
//! driven by drag input and a host frame loop.
//!
//! - [`card`]: motion controller for a single card
//! - [`view`]: the card pool and the events it publishes
//! - [`swiper`]: routes drag input to the front card
//! - [`presenter`]: the host's rendering hooks

pub mod card;
pub mod config;
pub mod error;
pub mod presenter;
pub mod swiper;
pub mod view;

pub use card::{CardEvent, CardTransform, SwipeDirection, Swipeable, SwipeableCard};
pub use config::{SwipeableViewConfig, Viewport};
pub use error::{ConfigError, Result};
pub use presenter::CardPresenter;
pub use swiper::Swiper;
pub use view::{CardId, CardView, SwipeableView, ViewEvent, MAX_CARDS};
