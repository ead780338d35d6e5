//! Card-stack interaction engine.
//!
//! # Responsibility
//! - Drive per-card drag/spring state and the shared active index.
//! - Derive every card's transform and overlay feedback as pure functions.
//! - Bridge committed swipes to the logic context without blocking.
//!
//! # Invariants
//! - Gesture and command swipes share one commit path.
//! - Each committed swipe posts exactly one `Swiped` event.

pub mod card;
pub mod coordinator;
pub mod events;
pub mod spring;
pub mod visual;
