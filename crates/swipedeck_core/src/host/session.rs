//! Host session consuming stack events.
//!
//! # Responsibility
//! - Mirror the active index for host bookkeeping.
//! - Hand accepted items to the batcher and prefetch hints to the content
//!   source, without ever blocking the render loop.
//!
//! # Invariants
//! - Collaborator failures stay inside collaborators; the session never
//!   rolls back a commit.
//! - Every `Swiped` event is applied exactly once.

use crate::model::command::SwipeDirection;
use crate::model::item::Item;
use crate::stack::coordinator::StackCoordinator;
use crate::stack::events::StackEvent;
use log::{debug, info};
use std::sync::mpsc::{Receiver, TryRecvError};

/// Debounced batching of accepted items (external).
///
/// `add_item` is called from the logic context and must return promptly.
pub trait ItemBatcher {
    fn add_item(&self, item: &Item);
    fn flush_and_reset(&self);
}

/// Paginated content source (external).
pub trait ContentSource {
    fn all_items(&self) -> Vec<Item>;
    fn prefetch_if_needed(&self, current_index: usize);
}

/// Running counts of applied events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwipeTally {
    pub accepted: usize,
    pub rejected: usize,
    pub undone: usize,
}

/// Logic-context consumer of one stack's events.
pub struct HostSession<B: ItemBatcher, S: ContentSource> {
    events: Receiver<StackEvent>,
    batcher: B,
    source: S,
    current_index: usize,
    swiping: bool,
    expanded: bool,
    tally: SwipeTally,
}

impl<B: ItemBatcher, S: ContentSource> HostSession<B, S> {
    pub fn new(events: Receiver<StackEvent>, batcher: B, source: S) -> Self {
        Self {
            events,
            batcher,
            source,
            current_index: 0,
            swiping: false,
            expanded: false,
            tally: SwipeTally::default(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_swiping(&self) -> bool {
        self.swiping
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn tally(&self) -> SwipeTally {
        self.tally
    }

    /// Pushes the content source's items into the engine.
    pub fn load_deck(&self, stack: &mut StackCoordinator) {
        stack.set_deck(self.source.all_items());
    }

    /// Applies every event currently queued. Never blocks.
    ///
    /// Returns the number of events applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.apply(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return applied,
            }
        }
    }

    /// Applies events until the engine drops its sender, then flushes the
    /// batcher. Intended for a dedicated logic thread.
    pub fn run_until_closed(mut self) -> SwipeTally {
        while let Ok(event) = self.events.recv() {
            self.apply(event);
        }
        self.finish()
    }

    /// Forces submission of pending accepted items.
    pub fn finish(self) -> SwipeTally {
        self.batcher.flush_and_reset();
        info!(
            "event=session_finish module=host status=ok accepted={} rejected={} undone={}",
            self.tally.accepted, self.tally.rejected, self.tally.undone
        );
        self.tally
    }

    fn apply(&mut self, event: StackEvent) {
        match event {
            StackEvent::Swiped {
                next_index,
                direction,
                item,
                ..
            } => {
                self.current_index = next_index;
                match direction {
                    SwipeDirection::Right => {
                        self.tally.accepted += 1;
                        self.batcher.add_item(&item);
                    }
                    SwipeDirection::Left => self.tally.rejected += 1,
                }
                self.source.prefetch_if_needed(next_index);
                debug!(
                    "event=swipe_applied module=host status=ok next_index={} direction={}",
                    next_index, direction
                );
            }
            StackEvent::Undone { index, .. } => {
                self.current_index = index;
                self.tally.undone += 1;
            }
            StackEvent::SwipingChanged(swiping) => self.swiping = swiping,
            StackEvent::ExpandChanged(expanded) => self.expanded = expanded,
        }
    }
}
