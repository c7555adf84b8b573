//! cardswipe animation system
//!
//! Easing, keyframe curves, and time-driven tweens for card motion.
//!
//! # Features
//!
//! - **Easing presets**: polynomial and CSS-style cubic bezier easing
//! - **Keyframe curves**: Hermite curves with per-key tangents
//! - **Frame clock**: host-advanced absolute time shared by every animation
//! - **Interruptible tweens**: a new tween replaces the one in flight

pub mod clock;
pub mod curve;
pub mod easing;
pub mod tween;

pub use clock::FrameClock;
pub use curve::{AnimationCurve, CurveError, CurveKeyframe, EaseCurve};
pub use easing::Easing;
pub use tween::MoveAnimation;
