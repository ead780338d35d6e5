//! Deck item model.
//!
//! # Responsibility
//! - Define the opaque content unit presented by one card.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - The engine never mutates an item; order is given by deck position.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one deck item.
pub type ItemId = Uuid;

/// Opaque content unit rendered by one card.
///
/// `content` is whatever the host's card view needs (for job listings, a
/// serialized listing). The engine only reads `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub content: String,
}

impl Item {
    /// Creates an item with a generated stable ID.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), content)
    }

    /// Creates an item with a caller-provided stable ID.
    ///
    /// Used when identity comes from the content source.
    pub fn with_id(id: ItemId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}
