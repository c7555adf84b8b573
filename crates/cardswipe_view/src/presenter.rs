//! Rendering and content-binding collaborator
//!
//! The view never draws anything itself. Each card slot owns a presenter
//! supplied by the host; the view pushes transforms, visibility, z-order and
//! content into it and reads back nothing but the card width.

use crate::card::CardTransform;

/// Host-side representation of one recycled card
///
/// Any per-view context the host needs (fonts, texture caches, callbacks)
/// is captured by the factory closure that builds presenters.
pub trait CardPresenter<T> {
    /// Width of the card in its local space; half of it is the commit distance
    fn card_width(&self) -> f32;

    /// Bind a new data item to this card
    fn update_content(&mut self, data: &T);

    /// Show or hide the card
    fn set_visible(&mut self, visible: bool);

    /// Apply position, rotation and scale
    fn set_transform(&mut self, transform: &CardTransform);

    /// Position among the stack's cards, 0 = furthest back
    fn set_sibling_index(&mut self, index: usize);

    /// Per-tick hook while the card leans right; `rate` is in `[0, 1]`
    fn swiping_right(&mut self, _rate: f32) {}

    /// Per-tick hook while the card leans left; `rate` is in `[0, 1]`
    fn swiping_left(&mut self, _rate: f32) {}
}
