//! Stack coordinator: cross-card shared state and the control surface.
//!
//! # Responsibility
//! - Own the active index, neighbor coupling, live command and the mounted
//!   cards of the virtualization window.
//! - Route gestures and commands through one commit path.
//! - Post swipe/chrome events through the outbound sink.
//!
//! # Invariants
//! - The active index moves by exactly +1 per commit and -1 per undo.
//! - Only the card at the active index is armed for gestures.
//! - The `Swiped` event is posted in the same step that advances the index,
//!   after the advance, and before the exit spring runs a single frame.
//! - Mounted indices always lie within `[active - 1, active + 2]`.

use crate::config::{ConfigError, StackConfig};
use crate::model::command::{SwipeCommand, SwipeDirection};
use crate::model::item::Item;
use crate::stack::card::{AnimatedCard, CardPhase, CommandOutcome, ReleaseOutcome};
use crate::stack::events::{EventSink, StackEvent, SwipeOrigin};
use crate::stack::visual::{self, CardVisual, OverlayVisuals};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver};

/// Cards from the end of the deck at which the loading indicator may show.
const LOADING_INDICATOR_LOOKAHEAD: usize = 2;

/// Cross-card state owner for one card stack.
///
/// All mutation goes through `&mut self`, so the render loop and the logic
/// context serialize on whoever owns the coordinator.
pub struct StackCoordinator {
    config: StackConfig,
    deck: Vec<Item>,
    active_index: usize,
    neighbor_coupling: f32,
    live_command: Option<SwipeCommand>,
    next_seq: u64,
    last_direction: Option<SwipeDirection>,
    cards: BTreeMap<usize, AnimatedCard>,
    expanded: bool,
    swiping: bool,
    fetching_more: bool,
    sink: Box<dyn EventSink + Send>,
    sink_disconnected: bool,
}

impl StackCoordinator {
    /// Creates an empty stack posting events to `sink`.
    ///
    /// # Errors
    /// - Returns `ConfigError` when `config` fails validation.
    pub fn new(config: StackConfig, sink: Box<dyn EventSink + Send>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            deck: Vec::new(),
            active_index: 0,
            neighbor_coupling: 0.0,
            live_command: None,
            next_seq: 1,
            last_direction: None,
            cards: BTreeMap::new(),
            expanded: false,
            swiping: false,
            fetching_more: false,
            sink,
            sink_disconnected: false,
        })
    }

    /// Creates an empty stack bridged to the logic context by a channel.
    pub fn with_channel(config: StackConfig) -> Result<(Self, Receiver<StackEvent>), ConfigError> {
        let (sender, receiver) = mpsc::channel();
        let coordinator = Self::new(config, Box::new(sender))?;
        Ok((coordinator, receiver))
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.deck.get(index)
    }

    /// Returns whether every card has been swiped.
    pub fn is_exhausted(&self) -> bool {
        self.active_index >= self.deck.len()
    }

    pub fn live_command(&self) -> Option<SwipeCommand> {
        self.live_command
    }

    pub fn last_direction(&self) -> Option<SwipeDirection> {
        self.last_direction
    }

    pub fn can_undo(&self) -> bool {
        self.undo_target().is_some()
    }

    pub fn neighbor_coupling(&self) -> f32 {
        self.neighbor_coupling
    }

    pub fn is_swiping(&self) -> bool {
        self.swiping
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_fetching_more(&self) -> bool {
        self.fetching_more
    }

    /// Trailing loading indicator: fetching and close to the end of the deck.
    pub fn show_loading_indicator(&self) -> bool {
        self.fetching_more && self.active_index + LOADING_INDICATOR_LOOKAHEAD >= self.deck.len()
    }

    pub fn mounted_indices(&self) -> Vec<usize> {
        self.cards.keys().copied().collect()
    }

    pub fn card_phase(&self, index: usize) -> Option<CardPhase> {
        self.cards.get(&index).map(AnimatedCard::phase)
    }

    /// Replaces the deck. Existing positions are expected to keep their ids.
    pub fn set_deck(&mut self, items: Vec<Item>) {
        let previous_len = self.deck.len();
        let conflicts = self
            .deck
            .iter()
            .zip(items.iter())
            .filter(|(old, new)| old.id != new.id)
            .count();
        if conflicts > 0 {
            warn!(
                "event=deck_replace module=stack status=conflict changed_positions={} active_index={}",
                conflicts, self.active_index
            );
        }
        info!(
            "event=deck_replace module=stack status=ok previous_len={} len={} active_index={}",
            previous_len,
            items.len(),
            self.active_index
        );
        self.deck = items;
        self.sync_window();
    }

    /// Passes the host's fetching flag through to the loading indicator.
    pub fn set_fetching_more(&mut self, fetching: bool) {
        self.fetching_more = fetching;
    }

    /// Opens or closes the expanded view; gestures are suppressed while open.
    pub fn set_expanded(&mut self, expanded: bool) {
        if self.expanded == expanded {
            return;
        }
        self.expanded = expanded;
        if expanded {
            self.abort_drag();
        }
        self.emit(StackEvent::ExpandChanged(expanded));
    }

    /// Card tap: toggles the expanded view for the active card only.
    pub fn tap_card(&mut self, index: usize) -> bool {
        if index != self.active_index || self.is_exhausted() || self.swiping {
            return false;
        }
        self.set_expanded(!self.expanded);
        true
    }

    /// Programmatic accept of the active card.
    pub fn swipe_right(&mut self) -> bool {
        self.issue_swipe(SwipeDirection::Right)
    }

    /// Programmatic reject of the active card.
    pub fn swipe_left(&mut self) -> bool {
        self.issue_swipe(SwipeDirection::Left)
    }

    /// Reverts the most recent commit.
    ///
    /// Returns `false` when nothing can be undone: at the start of the deck,
    /// with no recorded exit direction, or when the card was dropped from
    /// the deck.
    pub fn undo(&mut self) -> bool {
        let Some((target, previous)) = self.undo_target() else {
            info!(
                "event=undo module=stack status=skipped active_index={} has_history={}",
                self.active_index,
                self.last_direction.is_some()
            );
            return false;
        };

        self.abort_drag();
        self.active_index = target;
        self.neighbor_coupling = 0.0;
        self.sync_window();

        let command = SwipeCommand::undo(self.take_seq(), target, previous);
        self.live_command = Some(command);
        let outcome = match self.cards.get_mut(&target) {
            Some(card) => card.observe_command(command, &self.config),
            None => CommandOutcome::Ignored,
        };
        info!(
            "event=undo module=stack status=ok index={} enter_from={} reentered={}",
            target,
            previous,
            outcome == CommandOutcome::Reentered
        );

        let item = self.deck[target].clone();
        self.emit(StackEvent::Undone {
            index: target,
            item,
            enter_from: previous,
        });
        true
    }

    /// Starts a drag on the card at `index`.
    pub fn begin_gesture(&mut self, index: usize) -> bool {
        if self.expanded || index != self.active_index {
            return false;
        }
        let Some(card) = self.cards.get_mut(&index) else {
            return false;
        };
        if !card.begin_drag() {
            return false;
        }
        debug!("event=gesture_begin module=stack status=ok index={index}");
        self.set_swiping(true);
        true
    }

    /// Applies live drag translation to the dragged card.
    pub fn update_gesture(&mut self, index: usize, raw_dx: f32, raw_dy: f32) {
        let Some(card) = self.cards.get_mut(&index) else {
            return;
        };
        if !card.is_dragging() {
            return;
        }
        card.update_drag(raw_dx, raw_dy, &self.config);
        self.neighbor_coupling = raw_dx;
    }

    /// Releases a drag; commits when `|raw_dx|` exceeds the threshold.
    pub fn end_gesture(
        &mut self,
        index: usize,
        raw_dx: f32,
        raw_dy: f32,
        velocity_x: f32,
    ) -> ReleaseOutcome {
        let outcome = match self.cards.get_mut(&index) {
            Some(card) if card.is_dragging() => {
                card.update_drag(raw_dx, raw_dy, &self.config);
                card.release(raw_dx, velocity_x, &self.config)
            }
            _ => ReleaseOutcome::Ignored,
        };

        match outcome {
            ReleaseOutcome::Commit(direction) => {
                self.commit(index, direction, SwipeOrigin::Gesture)
            }
            ReleaseOutcome::SnapBack => {
                self.neighbor_coupling = 0.0;
                debug!(
                    "event=snap_back module=stack status=ok index={index} raw_dx={raw_dx:.1}"
                );
            }
            ReleaseOutcome::Ignored => {}
        }
        if outcome != ReleaseOutcome::Ignored {
            self.set_swiping(false);
        }
        outcome
    }

    /// Advances every mounted card by `dt` seconds and re-syncs the window.
    pub fn tick(&mut self, dt: f32) {
        for card in self.cards.values_mut() {
            if let Some(ended) = card.step(dt) {
                debug!(
                    "event=card_settled module=stack status=ok index={} phase={:?}",
                    card.index(),
                    ended
                );
            }
        }
        self.sync_window();
    }

    /// Render transform for a mounted card.
    pub fn card_visual(&self, index: usize) -> Option<CardVisual> {
        let card = self.cards.get(&index)?;
        visual::card_visual(
            index,
            self.active_index,
            self.neighbor_coupling,
            card.snapshot(),
            &self.config,
        )
    }

    /// Overlay feedback for a mounted card, derived from its own offset.
    pub fn card_overlays(&self, index: usize) -> Option<OverlayVisuals> {
        let card = self.cards.get(&index)?;
        Some(visual::overlay_visuals(card.snapshot(), &self.config))
    }

    /// All mounted cards' transforms, back to front.
    pub fn frame(&self) -> Vec<CardVisual> {
        let mut visuals = self
            .cards
            .keys()
            .filter_map(|index| self.card_visual(*index))
            .collect::<Vec<_>>();
        visuals.sort_by_key(|visual| visual.z_index);
        visuals
    }

    fn issue_swipe(&mut self, direction: SwipeDirection) -> bool {
        let target = self.active_index;
        if target >= self.deck.len() {
            info!(
                "event=swipe_command module=stack status=skipped reason=out_of_bounds active_index={} len={}",
                target,
                self.deck.len()
            );
            return false;
        }

        let command = SwipeCommand::swipe(self.take_seq(), target, direction);
        self.live_command = Some(command);
        let outcome = match self.cards.get_mut(&target) {
            Some(card) => card.observe_command(command, &self.config),
            None => CommandOutcome::Ignored,
        };
        match outcome {
            CommandOutcome::Commit(direction) => {
                if self.swiping {
                    self.set_swiping(false);
                }
                self.commit(target, direction, SwipeOrigin::Command);
                true
            }
            CommandOutcome::Reentered | CommandOutcome::Ignored => {
                debug!(
                    "event=swipe_command module=stack status=skipped reason=not_accepted index={target}"
                );
                false
            }
        }
    }

    /// The single commit path shared by gestures and commands.
    fn commit(&mut self, index: usize, direction: SwipeDirection, origin: SwipeOrigin) {
        let Some(item) = self.deck.get(index).cloned() else {
            return;
        };
        self.active_index = index + 1;
        self.last_direction = Some(direction);
        self.neighbor_coupling = 0.0;
        self.sync_window();

        info!(
            "event=swipe_commit module=stack status=ok index={} direction={} origin={} item_id={}",
            index, direction, origin, item.id
        );
        self.emit(StackEvent::Swiped {
            index,
            next_index: self.active_index,
            direction,
            origin,
            item,
        });
    }

    fn undo_target(&self) -> Option<(usize, SwipeDirection)> {
        let previous = self.last_direction?;
        let target = self.active_index.checked_sub(1)?;
        (target < self.deck.len()).then_some((target, previous))
    }

    fn abort_drag(&mut self) {
        if let Some(card) = self.cards.get_mut(&self.active_index) {
            card.cancel_drag();
        }
        self.neighbor_coupling = 0.0;
        self.set_swiping(false);
    }

    fn set_swiping(&mut self, swiping: bool) {
        if self.swiping == swiping {
            return;
        }
        self.swiping = swiping;
        self.emit(StackEvent::SwipingChanged(swiping));
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Mounts cards entering the window and evicts cards leaving it.
    fn sync_window(&mut self) {
        let window = visual::window_range(self.active_index, self.deck.len());
        let in_window = |index: usize| window.as_ref().is_some_and(|range| range.contains(&index));

        let deck = &self.deck;
        self.cards.retain(|index, card| {
            let keep = in_window(*index) && deck.get(*index).is_some_and(|item| item.id == card.item_id());
            if !keep {
                card.stop_all();
                debug!("event=card_evict module=stack status=ok index={index}");
            }
            keep
        });

        if let Some(range) = window {
            let seen_seq = self.live_command.map(|command| command.seq);
            for index in range {
                if self.cards.contains_key(&index) {
                    continue;
                }
                let card = AnimatedCard::new(index, self.deck[index].id, seen_seq, &self.config);
                debug!("event=card_mount module=stack status=ok index={index}");
                self.cards.insert(index, card);
            }
        }

        let active = self.active_index;
        for (index, card) in self.cards.iter_mut() {
            card.set_armed(*index == active);
        }
    }

    fn emit(&mut self, event: StackEvent) {
        if self.sink.emit(event) || self.sink_disconnected {
            return;
        }
        self.sink_disconnected = true;
        warn!("event=event_bridge module=stack status=error reason=receiver_disconnected");
    }
}
