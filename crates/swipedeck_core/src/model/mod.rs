//! Deck domain model shared by the engine and its host.
//!
//! # Responsibility
//! - Define the opaque content unit rendered as one card.
//! - Define swipe directions and the programmatic command value.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Items are immutable once handed to the engine.

pub mod command;
pub mod item;
