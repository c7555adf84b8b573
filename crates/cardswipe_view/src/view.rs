//! Card pool manager
//!
//! A [`SwipeableView`] shows an arbitrarily long list of items with at most
//! two card instances. When the front card is swiped away it is moved to the
//! back of the stack, reset to neutral and rebound to the item two places
//! further on, while the card that was waiting behind it becomes the front
//! card and receives drag input.
//!
//! ```ignore
//! let viewport = Viewport::new(1080.0, 1920.0);
//! let mut view = SwipeableView::new(config, viewport, |_| MyPresenter::new());
//! view.on_swiped_right(|card, index| println!("liked item {index} on {card:?}"));
//! view.initialize(items);
//!
//! // per frame
//! view.swiper_mut().on_drag(PointerButton::Left, delta);
//! view.tick(frame_time);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use cardswipe_animation::FrameClock;
use cardswipe_core::events::{Event, EventDispatcher, EventKind, EventType};
use cardswipe_core::fsm::StateId;
use cardswipe_core::geometry::lerp;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::card::{CardEvent, CardEvents, CardTransform, SwipeDirection, SwipeableCard};
use crate::config::{SwipeableViewConfig, Viewport};
use crate::presenter::CardPresenter;
use crate::swiper::Swiper;

new_key_type! {
    /// Handle of one recycled card slot
    pub struct CardId;
}

/// Number of card instances a view ever creates
pub const MAX_CARDS: usize = 2;

/// Event type constants for [`ViewEvent`]
pub mod view_events {
    use cardswipe_core::EventType;

    pub const ACTIVE_CARD_CHANGED: EventType = 1;
    pub const SWIPED_RIGHT: EventType = 2;
    pub const SWIPED_LEFT: EventType = 3;
}

/// Notifications a view publishes to the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    /// A new card is in front and receives drag input
    ActiveCardChanged(CardId),
    /// `card` was swiped right while showing item `data_index`
    SwipedRight { card: CardId, data_index: usize },
    /// `card` was swiped left while showing item `data_index`
    SwipedLeft { card: CardId, data_index: usize },
}

impl EventKind for ViewEvent {
    fn kind(&self) -> EventType {
        match self {
            ViewEvent::ActiveCardChanged(_) => view_events::ACTIVE_CARD_CHANGED,
            ViewEvent::SwipedRight { .. } => view_events::SWIPED_RIGHT,
            ViewEvent::SwipedLeft { .. } => view_events::SWIPED_LEFT,
        }
    }
}

/// Read-only snapshot of a card slot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardView {
    pub id: CardId,
    pub data_index: usize,
    pub visible: bool,
    pub transform: CardTransform,
    /// Interaction state (see `card_states`)
    pub state: StateId,
}

struct Slot<P> {
    card: Rc<RefCell<SwipeableCard>>,
    presenter: P,
    /// Item shown by this slot; `>= data.len()` when hidden
    data_index: usize,
}

type PresenterFactory<P> = Box<dyn FnMut(usize) -> P>;

/// A stack of swipeable cards over a list of `T`
pub struct SwipeableView<T, P: CardPresenter<T>> {
    config: Rc<SwipeableViewConfig>,
    viewport: Viewport,
    clock: FrameClock,
    factory: PresenterFactory<P>,
    data: Vec<T>,
    slots: SlotMap<CardId, Slot<P>>,
    /// Back to front; the last entry is the top of the stack
    order: SmallVec<[CardId; MAX_CARDS]>,
    swiper: Swiper,
    active: Option<CardId>,
    auto_swiping: bool,
    dispatcher: EventDispatcher<ViewEvent>,
}

impl<T, P: CardPresenter<T>> SwipeableView<T, P> {
    /// Create an empty view; `factory` builds the presenter for slot `n`
    pub fn new<F>(config: SwipeableViewConfig, viewport: Viewport, factory: F) -> Self
    where
        F: FnMut(usize) -> P + 'static,
    {
        Self {
            config: Rc::new(config),
            viewport,
            clock: FrameClock::new(),
            factory: Box::new(factory),
            data: Vec::new(),
            slots: SlotMap::with_key(),
            order: SmallVec::new(),
            swiper: Swiper::new(),
            active: None,
            auto_swiping: false,
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Bind the view to `data`, creating up to two card slots
    ///
    /// Slots from a previous call are discarded; subscriptions are kept.
    pub fn initialize(&mut self, data: Vec<T>) {
        self.slots.clear();
        self.order.clear();
        self.swiper.clear_target();
        self.active = None;
        self.auto_swiping = false;
        self.data = data;

        let count = self.data.len().min(MAX_CARDS);
        for index in 0..count {
            let presenter = (self.factory)(index);
            let card = SwipeableCard::new(
                presenter.card_width(),
                self.viewport.short_side(),
                self.config.clone(),
                self.clock.clone(),
            );
            let id = self.slots.insert(Slot {
                card: Rc::new(RefCell::new(card)),
                presenter,
                data_index: index,
            });
            // Each new card goes behind the ones already created
            self.order.insert(0, id);
            let scale = self.resting_scale();
            self.slots[id].card.borrow_mut().set_scale(scale);
            self.bind(id, index);
        }
        tracing::debug!("initialized view: {} items, {} cards", self.data.len(), count);

        self.sync_presenters();
        if let Some(front) = self.order.last().copied() {
            self.retarget(front);
        }
    }

    /// Swipe the front card without a drag
    ///
    /// Does nothing once every item has been swiped.
    pub fn auto_swipe(&mut self, direction: SwipeDirection) -> bool {
        if !self.exists_card() {
            tracing::debug!("auto swipe ignored: no card left");
            return false;
        }
        self.auto_swiping = true;
        self.swiper.auto_swipe(direction)
    }

    /// Advance the shared clock by `dt` and update every card
    pub fn tick(&mut self, dt: Duration) {
        self.clock.advance(dt);

        let mut pending: SmallVec<[(CardId, CardEvents); MAX_CARDS]> = SmallVec::new();
        for &id in self.order.iter().rev() {
            let events = self.slots[id].card.borrow_mut().tick();
            if !events.is_empty() {
                pending.push((id, events));
            }
        }

        for (id, events) in pending {
            for event in events {
                self.handle_card_event(id, event);
            }
        }

        self.sync_presenters();
    }

    fn handle_card_event(&mut self, id: CardId, event: CardEvent) {
        match event {
            CardEvent::SwipingRight(rate) => {
                if let Some(slot) = self.slots.get_mut(id) {
                    slot.presenter.swiping_right(rate);
                }
                self.grow_next_card(id, rate);
            }
            CardEvent::SwipingLeft(rate) => {
                if let Some(slot) = self.slots.get_mut(id) {
                    slot.presenter.swiping_left(rate);
                }
                self.grow_next_card(id, rate);
            }
            CardEvent::Neutral => {
                if let Some(slot) = self.slots.get_mut(id) {
                    slot.presenter.swiping_right(0.0);
                    slot.presenter.swiping_left(0.0);
                }
                if self.active == Some(id) {
                    self.grow_next_card(id, 0.0);
                }
            }
            CardEvent::SwipedRight => self.finish_swipe(id, SwipeDirection::Right),
            CardEvent::SwipedLeft => self.finish_swipe(id, SwipeDirection::Left),
        }
    }

    /// Scale the card holding the next item towards full size
    fn grow_next_card(&mut self, id: CardId, rate: f32) {
        let Some(next) = self.slots.get(id).map(|slot| slot.data_index + 1) else {
            return;
        };
        let bottom = self.config.bottom_card_scale;
        let t = self.config.curve.evaluate(rate);
        if let Some(slot) = self
            .slots
            .values()
            .find(|slot| slot.data_index == next && slot.card.borrow().is_visible())
        {
            slot.card.borrow_mut().set_scale(lerp(bottom, 1.0, t));
        }
    }

    fn finish_swipe(&mut self, id: CardId, direction: SwipeDirection) {
        let Some(swiped_index) = self.slots.get(id).map(|slot| slot.data_index) else {
            return;
        };
        tracing::debug!("card {:?} swiped {:?} on item {}", id, direction, swiped_index);

        self.recycle(id);
        let front = self.order.last().copied();
        if let Some(front) = front {
            self.slots[front].card.borrow_mut().set_scale(1.0);
            self.swiper.set_target(front, self.slots[front].card.clone());
            self.active = Some(front);
        }

        let event = match direction {
            SwipeDirection::Right => ViewEvent::SwipedRight {
                card: id,
                data_index: swiped_index,
            },
            SwipeDirection::Left => ViewEvent::SwipedLeft {
                card: id,
                data_index: swiped_index,
            },
        };
        self.dispatcher.dispatch(&event);

        if let Some(front) = front {
            self.dispatcher.dispatch(&ViewEvent::ActiveCardChanged(front));
        }
    }

    /// Send a swiped card to the back and rebind it to the next unseen item
    fn recycle(&mut self, id: CardId) {
        self.order.retain(|other| *other != id);
        self.order.insert(0, id);

        let scale = self.resting_scale();
        let step = if self.slots.len() < MAX_CARDS { 1 } else { MAX_CARDS };
        let next_index = self.slots[id].data_index + step;
        {
            let mut card = self.slots[id].card.borrow_mut();
            card.reset();
            card.set_scale(scale);
        }
        self.auto_swiping = false;
        self.bind(id, next_index);
    }

    /// Assign `index` to a slot, hiding it when the index is past the data
    fn bind(&mut self, id: CardId, index: usize) {
        let Some(slot) = self.slots.get_mut(id) else {
            return;
        };
        slot.data_index = index;

        match self.data.get(index) {
            Some(item) => {
                slot.card.borrow_mut().set_visible(true);
                slot.presenter.update_content(item);
            }
            None => {
                tracing::debug!("card {:?} hidden: item {} is past the end", id, index);
                slot.card.borrow_mut().set_visible(false);
            }
        }
    }

    /// Scale for a card placed at the back of the stack
    fn resting_scale(&self) -> f32 {
        if self.order.len() == 1 {
            1.0
        } else {
            self.config.bottom_card_scale
        }
    }

    fn retarget(&mut self, front: CardId) {
        self.swiper.set_target(front, self.slots[front].card.clone());
        self.active = Some(front);
        self.dispatcher.dispatch(&ViewEvent::ActiveCardChanged(front));
    }

    fn sync_presenters(&mut self) {
        for (sibling, id) in self.order.iter().enumerate() {
            let Some(slot) = self.slots.get_mut(*id) else {
                continue;
            };
            let card = slot.card.borrow();
            slot.presenter.set_visible(card.is_visible());
            slot.presenter.set_transform(card.transform());
            slot.presenter.set_sibling_index(sibling);
        }
    }

    /// The drag router; feed pointer input here
    pub fn swiper_mut(&mut self) -> &mut Swiper {
        &mut self.swiper
    }

    pub fn swiper(&self) -> &Swiper {
        &self.swiper
    }

    /// Route a raw drag event to the front card
    pub fn handle_event(&mut self, event: &Event) -> bool {
        self.swiper.handle_event(event)
    }

    /// Called with the new front card after every swipe and on initialize
    pub fn on_active_card_changed<F>(&mut self, mut handler: F)
    where
        F: FnMut(CardId) + 'static,
    {
        self.dispatcher
            .register(view_events::ACTIVE_CARD_CHANGED, move |event| {
                if let ViewEvent::ActiveCardChanged(card) = event {
                    handler(*card);
                }
            });
    }

    /// Called with the card and the item index of every right swipe
    pub fn on_swiped_right<F>(&mut self, mut handler: F)
    where
        F: FnMut(CardId, usize) + 'static,
    {
        self.dispatcher.register(view_events::SWIPED_RIGHT, move |event| {
            if let ViewEvent::SwipedRight { card, data_index } = event {
                handler(*card, *data_index);
            }
        });
    }

    /// Called with the card and the item index of every left swipe
    pub fn on_swiped_left<F>(&mut self, mut handler: F)
    where
        F: FnMut(CardId, usize) + 'static,
    {
        self.dispatcher.register(view_events::SWIPED_LEFT, move |event| {
            if let ViewEvent::SwipedLeft { card, data_index } = event {
                handler(*card, *data_index);
            }
        });
    }

    /// True from an auto swipe request, or any commit, until the card is recycled
    pub fn is_auto_swiping(&self) -> bool {
        self.auto_swiping
            || self
                .active
                .and_then(|id| self.slots.get(id))
                .is_some_and(|slot| slot.card.borrow().is_committing())
    }

    /// True while the front card still shows an item
    pub fn exists_card(&self) -> bool {
        self.active
            .and_then(|id| self.slots.get(id))
            .is_some_and(|slot| slot.data_index < self.data.len())
    }

    /// The front card, if the view has been initialized with data
    pub fn active_card(&self) -> Option<CardId> {
        self.active
    }

    pub fn card(&self, id: CardId) -> Option<CardView> {
        let slot = self.slots.get(id)?;
        let card = slot.card.borrow();
        Some(CardView {
            id,
            data_index: slot.data_index,
            visible: card.is_visible(),
            transform: *card.transform(),
            state: card.state(),
        })
    }

    /// Snapshots of every slot, back to front
    pub fn cards(&self) -> Vec<CardView> {
        self.order.iter().filter_map(|id| self.card(*id)).collect()
    }

    pub fn data_index(&self, id: CardId) -> Option<usize> {
        self.slots.get(id).map(|slot| slot.data_index)
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Item shown by a card, if it is in range
    pub fn item(&self, id: CardId) -> Option<&T> {
        self.data.get(self.data_index(id)?)
    }

    pub fn presenter(&self, id: CardId) -> Option<&P> {
        self.slots.get(id).map(|slot| &slot.presenter)
    }

    pub fn config(&self) -> &SwipeableViewConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Time elapsed across every `tick`
    pub fn now(&self) -> Duration {
        self.clock.now()
    }
}
