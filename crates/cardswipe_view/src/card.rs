//! Swipe motion controller
//!
//! Owns one card's position, rotation and scale. Drag deltas move the card
//! directly; releasing it either commits the swipe (the card flies off along
//! the direction it was dragged) or snaps it back to neutral. Both outcomes
//! run as a time-driven [`MoveAnimation`] sampled on every tick.
//!
//! Per tick the controller works in two phases:
//!
//! 1. **Lean**: rotation and swipe progress are derived from the current
//!    horizontal offset and reported as [`CardEvent::SwipingRight`] /
//!    [`CardEvent::SwipingLeft`] (or [`CardEvent::Neutral`] at rest).
//! 2. **Motion**: the running animation, if any, moves the card. When it
//!    completes a commit, [`CardEvent::SwipedRight`] / [`CardEvent::SwipedLeft`]
//!    is reported last.

use std::rc::Rc;

use cardswipe_animation::{FrameClock, MoveAnimation};
use cardswipe_core::fsm::{card_events, card_states, StateId, StateMachine};
use cardswipe_core::geometry::{lerp, EPSILON};
use cardswipe_core::Vec2;
use smallvec::SmallVec;

use crate::config::SwipeableViewConfig;

/// Terminal decision of a completed swipe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Right,
    Left,
}

impl SwipeDirection {
    /// Unit vector used when a swipe starts from exactly neutral
    pub fn unit(self) -> Vec2 {
        match self {
            SwipeDirection::Right => Vec2::RIGHT,
            SwipeDirection::Left => Vec2::LEFT,
        }
    }
}

/// Presentational state of a card
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTransform {
    /// Offset from neutral
    pub position: Vec2,
    /// Z rotation in degrees
    pub rotation: f32,
    /// Uniform scale
    pub scale: f32,
}

impl Default for CardTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// What a card reports from one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CardEvent {
    /// Leaning right; progress towards the commit distance, clamped to `[0, 1]`
    SwipingRight(f32),
    /// Leaning left; progress towards the commit distance, clamped to `[0, 1]`
    SwipingLeft(f32),
    /// Horizontally centered
    Neutral,
    /// A right commit finished animating
    SwipedRight,
    /// A left commit finished animating
    SwipedLeft,
}

/// Per-tick event buffer; a tick reports at most a lean and a completion
pub type CardEvents = SmallVec<[CardEvent; 2]>;

/// Capability the drag router drives
pub trait Swipeable {
    /// Move the card by a drag delta
    fn swipe(&mut self, delta: Vec2);

    /// The drag ended: commit or snap back
    fn end_swipe(&mut self);

    /// Commit in `direction` without a drag
    fn auto_swipe(&mut self, direction: SwipeDirection);

    /// Whether the card currently accepts input
    fn is_interactable(&self) -> bool;
}

/// A running animation and the outcome to report when it lands
#[derive(Clone, Copy, Debug)]
struct ActiveMove {
    tween: MoveAnimation,
    outcome: Option<SwipeDirection>,
}

/// Motion controller for one card
#[derive(Debug)]
pub struct SwipeableCard {
    transform: CardTransform,
    visible: bool,
    /// Card width; half of it is the commit distance
    width: f32,
    /// Distance a committed card travels from neutral
    travel: f32,
    config: Rc<SwipeableViewConfig>,
    clock: FrameClock,
    fsm: StateMachine,
    motion: Option<ActiveMove>,
}

impl SwipeableCard {
    pub fn new(
        width: f32,
        travel: f32,
        config: Rc<SwipeableViewConfig>,
        clock: FrameClock,
    ) -> Self {
        let width = if width.is_finite() && width > 0.0 {
            width
        } else {
            tracing::warn!("card width {} is not positive, using {} instead", width, travel);
            travel
        };
        Self {
            transform: CardTransform::default(),
            visible: true,
            width,
            travel,
            config,
            clock,
            fsm: StateMachine::card_interaction(),
            motion: None,
        }
    }

    pub fn transform(&self) -> &CardTransform {
        &self.transform
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn rotation(&self) -> f32 {
        self.transform.rotation
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.transform.scale = scale;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Current interaction state (see [`card_states`])
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    /// True while a commit animation is in flight
    pub fn is_committing(&self) -> bool {
        self.fsm.is_in(card_states::SWIPING_OUT)
    }

    /// Signed commit distance for an offset: `+w/2` to the right, `-w/2` otherwise
    pub fn required_distance(&self, x: f32) -> f32 {
        if x > 0.0 {
            self.width / 2.0
        } else {
            -(self.width / 2.0)
        }
    }

    /// Unclamped progress towards the commit distance
    pub fn progress(&self, x: f32) -> f32 {
        x / self.required_distance(x)
    }

    pub fn is_swiped_right(&self, position: Vec2) -> bool {
        position.x > 0.0 && position.x > self.required_distance(position.x)
    }

    pub fn is_swiped_left(&self, position: Vec2) -> bool {
        position.x < 0.0 && position.x < self.required_distance(position.x)
    }

    /// Return to neutral and drop any running animation
    pub fn reset(&mut self) {
        self.motion = None;
        self.transform.position = Vec2::ZERO;
        self.transform.rotation = 0.0;
        self.fsm.send(card_events::RESET);
    }

    /// Advance one frame against the shared clock
    ///
    /// Hidden cards are inert and report nothing.
    pub fn tick(&mut self) -> CardEvents {
        let mut events = CardEvents::new();
        if !self.visible {
            return events;
        }

        events.push(self.lean());

        if let Some(landed) = self.step_motion() {
            events.push(match landed {
                SwipeDirection::Right => CardEvent::SwipedRight,
                SwipeDirection::Left => CardEvent::SwipedLeft,
            });
        }

        events
    }

    /// Rotation and progress from the current horizontal offset
    fn lean(&mut self) -> CardEvent {
        let x = self.transform.position.x;
        if x.abs() < EPSILON {
            self.transform.rotation = 0.0;
            return CardEvent::Neutral;
        }

        let t = self.progress(x).clamp(0.0, 1.0);
        // Tilts against the drag: right leans negative, left leans positive
        let max_angle = self.config.max_inclination_angle as f32;
        let max_angle = if x < 0.0 { max_angle } else { -max_angle };
        self.transform.rotation = lerp(0.0, max_angle, t);

        if x > 0.0 {
            CardEvent::SwipingRight(t)
        } else {
            CardEvent::SwipingLeft(t)
        }
    }

    /// Sample the running animation; returns the outcome when a commit lands
    fn step_motion(&mut self) -> Option<SwipeDirection> {
        let active = self.motion?;
        let now = self.clock.now();

        if !active.tween.is_finished(now) {
            self.transform.position = active.tween.sample(now, &self.config.curve);
            return None;
        }

        self.transform.position = active.tween.to();
        self.motion = None;
        self.fsm.send(card_events::SETTLED);
        tracing::trace!(
            "card settled at ({:.1}, {:.1}), outcome={:?}",
            self.transform.position.x,
            self.transform.position.y,
            active.outcome
        );
        active.outcome
    }

    /// Start an animation from the current time, replacing any in flight
    fn start_motion(&mut self, to: Vec2, outcome: Option<SwipeDirection>) {
        let from = self.transform.position;
        if let Some(previous) = self.motion {
            tracing::trace!(
                "superseding animation towards ({:.1}, {:.1})",
                previous.tween.to().x,
                previous.tween.to().y
            );
        }
        self.motion = Some(ActiveMove {
            tween: MoveAnimation::new(from, to, self.clock.now(), self.config.swipe_duration()),
            outcome,
        });
    }

    fn commit(&mut self, direction: SwipeDirection) {
        let from = self.transform.position;
        // Keep the offset's heading only while it leans the committed way
        let leans_along = match direction {
            SwipeDirection::Right => from.x > 0.0,
            SwipeDirection::Left => from.x < 0.0,
        };
        let heading = if leans_along {
            from.normalize()
        } else {
            direction.unit()
        };
        self.fsm.send(card_events::RELEASE_COMMIT);
        tracing::debug!(
            "committing {:?} swipe from ({:.1}, {:.1})",
            direction,
            from.x,
            from.y
        );
        self.start_motion(heading * self.travel, Some(direction));
    }
}

impl Swipeable for SwipeableCard {
    fn swipe(&mut self, delta: Vec2) {
        if !self.fsm.can_send(card_events::DRAG) {
            tracing::trace!("ignoring drag delta while animating");
            return;
        }
        self.fsm.send(card_events::DRAG);
        self.transform.position += delta;
    }

    fn end_swipe(&mut self) {
        if !(self.fsm.is_in(card_states::IDLE) || self.fsm.is_in(card_states::DRAGGING)) {
            return;
        }

        let position = self.transform.position;
        if self.is_swiped_right(position) {
            self.commit(SwipeDirection::Right);
        } else if self.is_swiped_left(position) {
            self.commit(SwipeDirection::Left);
        } else {
            self.fsm.send(card_events::RELEASE_CANCEL);
            tracing::debug!("snapping back from x={:.1}", position.x);
            self.start_motion(Vec2::ZERO, None);
        }
    }

    fn auto_swipe(&mut self, direction: SwipeDirection) {
        self.commit(direction);
    }

    fn is_interactable(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardswipe_animation::Easing;
    use std::time::Duration;

    const WIDTH: f32 = 300.0;
    const TRAVEL: f32 = 1080.0;

    fn make_card() -> (SwipeableCard, FrameClock) {
        let clock = FrameClock::new();
        let config = Rc::new(SwipeableViewConfig::default());
        (SwipeableCard::new(WIDTH, TRAVEL, config, clock.clone()), clock)
    }

    fn run(
        card: &mut SwipeableCard,
        clock: &FrameClock,
        frames: usize,
        dt_ms: u64,
    ) -> Vec<CardEvent> {
        let mut all = Vec::new();
        for _ in 0..frames {
            clock.advance(Duration::from_millis(dt_ms));
            all.extend(card.tick());
        }
        all
    }

    #[test]
    fn test_drag_moves_card() {
        let (mut card, _clock) = make_card();
        card.swipe(Vec2::new(40.0, -10.0));
        card.swipe(Vec2::new(20.0, 5.0));
        assert_eq!(card.position(), Vec2::new(60.0, -5.0));
        assert_eq!(card.state(), card_states::DRAGGING);
    }

    #[test]
    fn test_lean_tilts_against_drag() {
        let (mut card, _clock) = make_card();

        card.swipe(Vec2::new(75.0, 0.0));
        let events = card.tick();
        assert_eq!(events.as_slice(), &[CardEvent::SwipingRight(0.5)]);
        assert!((card.rotation() + 5.0).abs() < 1e-5);

        card.swipe(Vec2::new(-150.0, 0.0));
        let events = card.tick();
        assert_eq!(events.as_slice(), &[CardEvent::SwipingLeft(0.5)]);
        assert!((card.rotation() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_progress_is_clamped() {
        let (mut card, _clock) = make_card();
        card.swipe(Vec2::new(400.0, 0.0));
        assert_eq!(card.tick().as_slice(), &[CardEvent::SwipingRight(1.0)]);
        assert!((card.rotation() + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_neutral_below_epsilon() {
        let (mut card, _clock) = make_card();
        card.swipe(Vec2::new(1e-8, 30.0));
        assert_eq!(card.tick().as_slice(), &[CardEvent::Neutral]);
        assert_eq!(card.rotation(), 0.0);
    }

    #[test]
    fn test_commit_threshold() {
        let (card, _clock) = make_card();
        assert!(!card.is_swiped_right(Vec2::new(150.0, 0.0)));
        assert!(card.is_swiped_right(Vec2::new(150.5, 0.0)));
        assert!(!card.is_swiped_left(Vec2::new(-150.0, 0.0)));
        assert!(card.is_swiped_left(Vec2::new(-151.0, 0.0)));
        assert!(!card.is_swiped_left(Vec2::new(151.0, 0.0)));
        assert!(!card.is_swiped_right(Vec2::ZERO));
    }

    #[test]
    fn test_release_past_threshold_commits_right() {
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(WIDTH / 2.0 + 1.0, 0.0));
        card.end_swipe();
        assert!(card.is_committing());

        let events = run(&mut card, &clock, 28, 10);
        assert_eq!(events.last(), Some(&CardEvent::SwipedRight));
        assert_eq!(
            events.iter().filter(|e| **e == CardEvent::SwipedRight).count(),
            1
        );
        assert_eq!(card.position(), Vec2::new(TRAVEL, 0.0));
        assert_eq!(card.state(), card_states::IDLE);
    }

    #[test]
    fn test_commit_follows_drag_direction() {
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(-300.0, 400.0));
        card.end_swipe();
        run(&mut card, &clock, 30, 10);

        let expected = Vec2::new(-0.6, 0.8) * TRAVEL;
        assert!((card.position().x - expected.x).abs() < 1e-3);
        assert!((card.position().y - expected.y).abs() < 1e-3);
    }

    #[test]
    fn test_release_below_threshold_snaps_back() {
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(WIDTH / 2.0, 20.0));
        card.end_swipe();
        assert_eq!(card.state(), card_states::SNAPPING_BACK);

        let events = run(&mut card, &clock, 40, 10);
        assert!(!events
            .iter()
            .any(|e| matches!(e, CardEvent::SwipedRight | CardEvent::SwipedLeft)));
        assert_eq!(card.position(), Vec2::ZERO);
        assert_eq!(card.state(), card_states::IDLE);
    }

    #[test]
    fn test_drag_ignored_while_animating() {
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(100.0, 0.0));
        card.end_swipe();
        clock.advance(Duration::from_millis(100));
        card.tick();
        let mid = card.position();

        card.swipe(Vec2::new(500.0, 0.0));
        assert_eq!(card.position(), mid);
        // A release while snapping back does not restart the animation
        card.end_swipe();
        assert_eq!(card.state(), card_states::SNAPPING_BACK);
    }

    #[test]
    fn test_duration_independent_of_tick_rate() {
        let patterns: [&[u64]; 3] = [&[280], &[10, 30, 5, 100, 135], &[1; 280]];
        for pattern in patterns {
            let (mut card, clock) = make_card();
            card.swipe(Vec2::new(200.0, 0.0));
            card.end_swipe();
            let started = clock.now();

            let mut landed_at = None;
            for dt in pattern {
                clock.advance(Duration::from_millis(*dt));
                if card.tick().contains(&CardEvent::SwipedRight) {
                    landed_at = Some(clock.now());
                }
            }
            assert_eq!(landed_at, Some(started + Duration::from_millis(280)));
            assert_eq!(card.position(), Vec2::new(TRAVEL, 0.0));
        }
    }

    #[test]
    fn test_animation_not_finished_early() {
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(200.0, 0.0));
        card.end_swipe();

        let events = run(&mut card, &clock, 27, 10);
        assert!(!events.contains(&CardEvent::SwipedRight));
        assert!(card.position().x < TRAVEL);
        assert!(card.position().x > 200.0);
    }

    #[test]
    fn test_auto_swipe_from_neutral() {
        let (mut card, clock) = make_card();
        card.auto_swipe(SwipeDirection::Left);
        let events = run(&mut card, &clock, 3, 100);
        assert_eq!(events.last(), Some(&CardEvent::SwipedLeft));
        assert_eq!(card.position(), Vec2::new(-TRAVEL, 0.0));
    }

    #[test]
    fn test_auto_swipe_against_lean_uses_canonical_axis() {
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(100.0, 0.0));
        card.auto_swipe(SwipeDirection::Left);
        let events = run(&mut card, &clock, 28, 10);
        assert_eq!(events.last(), Some(&CardEvent::SwipedLeft));
        assert_eq!(card.position(), Vec2::new(-TRAVEL, 0.0));

        // A purely vertical lean has no horizontal side to agree with
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(0.0, 80.0));
        card.auto_swipe(SwipeDirection::Right);
        let events = run(&mut card, &clock, 28, 10);
        assert_eq!(events.last(), Some(&CardEvent::SwipedRight));
        assert_eq!(card.position(), Vec2::new(TRAVEL, 0.0));
    }

    #[test]
    fn test_non_positive_width_falls_back_to_travel() {
        let config = Rc::new(SwipeableViewConfig::default());
        for width in [0.0, -300.0, f32::NAN] {
            let clock = FrameClock::new();
            let mut card = SwipeableCard::new(width, TRAVEL, config.clone(), clock.clone());
            assert_eq!(card.width(), TRAVEL);

            card.swipe(Vec2::new(200.0, 0.0));
            card.end_swipe();
            let events = run(&mut card, &clock, 28, 10);
            assert!(!events.contains(&CardEvent::SwipedRight));
            assert_eq!(card.position(), Vec2::ZERO);
        }
    }

    #[test]
    fn test_auto_swipe_supersedes_snap_back() {
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(100.0, 0.0));
        card.end_swipe();
        run(&mut card, &clock, 5, 10);
        assert_eq!(card.state(), card_states::SNAPPING_BACK);

        card.auto_swipe(SwipeDirection::Right);
        let events = run(&mut card, &clock, 28, 10);
        assert_eq!(
            events.iter().filter(|e| **e == CardEvent::SwipedRight).count(),
            1
        );
        assert_eq!(card.position(), Vec2::new(TRAVEL, 0.0));
    }

    #[test]
    fn test_zero_deltas_do_not_change_outcome() {
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(160.0, 0.0));
        for _ in 0..10 {
            card.swipe(Vec2::ZERO);
        }
        card.end_swipe();
        let events = run(&mut card, &clock, 28, 10);
        assert_eq!(events.last(), Some(&CardEvent::SwipedRight));
    }

    #[test]
    fn test_curve_shapes_motion() {
        let clock = FrameClock::new();
        let config = Rc::new(SwipeableViewConfig::default().curve(Easing::Linear));
        let mut card = SwipeableCard::new(WIDTH, TRAVEL, config, clock.clone());
        card.auto_swipe(SwipeDirection::Right);

        clock.advance(Duration::from_millis(140));
        card.tick();
        assert!((card.position().x - TRAVEL / 2.0).abs() < 1e-2);
    }

    #[test]
    fn test_hidden_card_is_inert() {
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(50.0, 0.0));
        card.set_visible(false);
        assert!(!card.is_interactable());
        clock.advance(Duration::from_millis(16));
        assert!(card.tick().is_empty());
    }

    #[test]
    fn test_reset() {
        let (mut card, clock) = make_card();
        card.swipe(Vec2::new(200.0, 0.0));
        card.end_swipe();
        run(&mut card, &clock, 3, 10);

        card.reset();
        assert_eq!(card.position(), Vec2::ZERO);
        assert_eq!(card.rotation(), 0.0);
        assert!(!card.is_animating());
        assert_eq!(card.state(), card_states::IDLE);
    }
}
