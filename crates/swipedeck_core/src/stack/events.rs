//! One-way bridge from the render loop to the logic context.
//!
//! # Invariants
//! - Emission never blocks and never waits for the consumer.
//! - A missing consumer never affects engine state.

use crate::model::command::SwipeDirection;
use crate::model::item::Item;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::Sender;

/// Where a committed swipe came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOrigin {
    /// Drag released past the commit threshold.
    Gesture,
    /// Button tap or voice assistant command.
    Command,
}

impl Display for SwipeOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gesture => f.write_str("gesture"),
            Self::Command => f.write_str("command"),
        }
    }
}

/// Events posted by the engine for host bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub enum StackEvent {
    /// A swipe was committed. The active index is already `next_index`.
    Swiped {
        index: usize,
        next_index: usize,
        direction: SwipeDirection,
        origin: SwipeOrigin,
        item: Item,
    },
    /// The card at `index` is re-entering and is active again.
    Undone {
        index: usize,
        item: Item,
        enter_from: SwipeDirection,
    },
    /// A drag started (`true`) or ended (`false`).
    SwipingChanged(bool),
    /// The expanded detail view was opened or closed.
    ExpandChanged(bool),
}

/// Fire-and-forget receiver of engine events.
pub trait EventSink {
    /// Posts one event. Returns `false` when the consumer is gone.
    fn emit(&self, event: StackEvent) -> bool;
}

impl EventSink for Sender<StackEvent> {
    fn emit(&self, event: StackEvent) -> bool {
        self.send(event).is_ok()
    }
}

/// Adapts a plain callback into an [`EventSink`].
pub struct CallbackSink<F>(pub F);

impl<F> EventSink for CallbackSink<F>
where
    F: Fn(StackEvent),
{
    fn emit(&self, event: StackEvent) -> bool {
        (self.0)(event);
        true
    }
}

