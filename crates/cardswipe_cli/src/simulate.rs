//! Headless card stack simulation

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};
use cardswipe_core::PointerButton;
use cardswipe_view::{
    CardPresenter, CardTransform, SwipeDirection, SwipeableView, SwipeableViewConfig, Viewport,
};

use crate::script::Step;

/// Presenter that only logs what a renderer would be asked to do
pub struct LogPresenter {
    slot: usize,
    width: f32,
}

impl CardPresenter<String> for LogPresenter {
    fn card_width(&self) -> f32 {
        self.width
    }

    fn update_content(&mut self, data: &String) {
        tracing::debug!("slot {} shows {}", self.slot, data);
    }

    fn set_visible(&mut self, visible: bool) {
        tracing::trace!("slot {} visible={}", self.slot, visible);
    }

    fn set_transform(&mut self, transform: &CardTransform) {
        tracing::trace!(
            "slot {} at ({:.1}, {:.1}) rot={:.2} scale={:.3}",
            self.slot,
            transform.position.x,
            transform.position.y,
            transform.rotation,
            transform.scale
        );
    }

    fn set_sibling_index(&mut self, index: usize) {
        tracing::trace!("slot {} sibling={}", self.slot, index);
    }

    fn swiping_right(&mut self, rate: f32) {
        if rate > 0.0 {
            tracing::trace!("slot {} leaning right {:.2}", self.slot, rate);
        }
    }

    fn swiping_left(&mut self, rate: f32) {
        if rate > 0.0 {
            tracing::trace!("slot {} leaning left {:.2}", self.slot, rate);
        }
    }
}

/// One completed swipe
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub direction: SwipeDirection,
    pub item: usize,
    /// Simulated time at which the swipe landed
    pub at: Duration,
}

type Pending = Rc<RefCell<Vec<(SwipeDirection, usize)>>>;

/// A card stack over `card #0 .. card #N-1` driven by fixed-length frames
pub struct Simulation {
    view: SwipeableView<String, LogPresenter>,
    frame: Duration,
    pending: Pending,
    outcomes: Vec<Outcome>,
}

impl Simulation {
    pub fn new(
        config: SwipeableViewConfig,
        viewport: Viewport,
        card_width: f32,
        cards: usize,
        fps: u32,
    ) -> Result<Self> {
        if fps == 0 {
            bail!("fps must be at least 1");
        }
        if !card_width.is_finite() || card_width <= 0.0 {
            bail!("card width must be positive, got {card_width}");
        }

        let mut view = SwipeableView::new(config, viewport, move |slot| LogPresenter {
            slot,
            width: card_width,
        });

        let pending: Pending = Rc::default();
        let right = pending.clone();
        view.on_swiped_right(move |_, item| {
            right.borrow_mut().push((SwipeDirection::Right, item));
        });
        let left = pending.clone();
        view.on_swiped_left(move |_, item| {
            left.borrow_mut().push((SwipeDirection::Left, item));
        });
        view.on_active_card_changed(|card| tracing::debug!("front card is now {:?}", card));

        view.initialize((0..cards).map(|i| format!("card #{i}")).collect());

        Ok(Self {
            view,
            frame: Duration::from_secs(1) / fps,
            pending,
            outcomes: Vec::new(),
        })
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }

    pub fn view(&self) -> &SwipeableView<String, LogPresenter> {
        &self.view
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Apply one script step; swipes and releases run until the card settles
    pub fn apply(&mut self, step: Step) {
        match step {
            Step::Auto(direction) => {
                if self.view.auto_swipe(direction) {
                    self.settle();
                } else {
                    tracing::warn!("no card left to swipe {:?}", direction);
                }
            }
            Step::Drag(delta) => {
                self.view.swiper_mut().on_drag(PointerButton::Left, delta);
                self.step_frame(self.frame);
            }
            Step::Release => {
                self.view.swiper_mut().on_drag_end(PointerButton::Left);
                self.settle();
            }
            Step::Wait(duration) => self.run_for(duration),
        }
    }

    /// Swipe alternately right and left until every card is gone
    pub fn swipe_all(&mut self) {
        let mut direction = SwipeDirection::Right;
        while self.view.exists_card() {
            self.apply(Step::Auto(direction));
            direction = match direction {
                SwipeDirection::Right => SwipeDirection::Left,
                SwipeDirection::Left => SwipeDirection::Right,
            };
        }
    }

    /// Run frames for a full swipe animation plus one frame
    fn settle(&mut self) {
        let duration = self.view.config().swipe_duration() + self.frame;
        self.run_for(duration);
    }

    fn run_for(&mut self, duration: Duration) {
        let mut left = duration;
        while !left.is_zero() {
            let dt = left.min(self.frame);
            self.step_frame(dt);
            left -= dt;
        }
    }

    fn step_frame(&mut self, dt: Duration) {
        self.view.tick(dt);
        let at = self.view.now();
        for (direction, item) in self.pending.borrow_mut().drain(..) {
            tracing::info!("swiped {:?}: card #{} at {:?}", direction, item, at);
            self.outcomes.push(Outcome {
                direction,
                item,
                at,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation(cards: usize) -> Simulation {
        Simulation::new(
            SwipeableViewConfig::default(),
            Viewport::new(1080.0, 1920.0),
            320.0,
            cards,
            60,
        )
        .unwrap()
    }

    #[test]
    fn test_swipe_all_alternates() {
        let mut sim = simulation(3);
        sim.swipe_all();

        let directions: Vec<_> = sim.outcomes().iter().map(|o| o.direction).collect();
        assert_eq!(
            directions,
            vec![
                SwipeDirection::Right,
                SwipeDirection::Left,
                SwipeDirection::Right
            ]
        );
        let items: Vec<_> = sim.outcomes().iter().map(|o| o.item).collect();
        assert_eq!(items, vec![0, 1, 2]);
        assert!(!sim.view().exists_card());
    }

    #[test]
    fn test_drag_and_release() {
        let mut sim = simulation(2);
        sim.apply(Step::Drag(cardswipe_core::Vec2::new(-200.0, 0.0)));
        sim.apply(Step::Release);
        assert_eq!(sim.outcomes().len(), 1);
        assert_eq!(sim.outcomes()[0].direction, SwipeDirection::Left);

        // Short drag snaps back
        sim.apply(Step::Drag(cardswipe_core::Vec2::new(100.0, 0.0)));
        sim.apply(Step::Release);
        assert_eq!(sim.outcomes().len(), 1);
    }

    #[test]
    fn test_outcome_is_stamped_at_landing() {
        let mut sim = simulation(1);
        sim.apply(Step::Auto(SwipeDirection::Right));
        let at = sim.outcomes()[0].at;
        assert!(at >= Duration::from_millis(280));
        assert!(at < Duration::from_millis(280) + sim.frame());
    }

    #[test]
    fn test_rejects_zero_fps() {
        let result = Simulation::new(
            SwipeableViewConfig::default(),
            Viewport::new(1080.0, 1920.0),
            320.0,
            3,
            0,
        );
        assert!(result.is_err());
    }
}
