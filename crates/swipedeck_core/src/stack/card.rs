//! Per-card animation state machine.
//!
//! # Responsibility
//! - Own one mounted card's offset/rotation springs and drag state.
//! - Decide commit vs. snap-back on release and react to commands addressed
//!   to this card.
//!
//! # Invariants
//! - A card exits at most once per visit to the front; further swipe commands
//!   for an exiting card are ignored.
//! - A command sequence number is observed at most once.
//! - Snap-back and undo cycles end in the neutral state `(0, 0, 0°)`.

use crate::config::StackConfig;
use crate::model::command::{SwipeCommand, SwipeDirection};
use crate::model::item::ItemId;
use crate::stack::spring::Spring;
use crate::stack::visual::MotionSnapshot;

/// Lifecycle phase of one mounted card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    Idle,
    Dragging,
    /// Springing back to neutral after a sub-threshold release.
    Returning,
    /// Committed and flying off-screen.
    Exiting(SwipeDirection),
    /// Exit spring settled; parked off-screen.
    Departed(SwipeDirection),
    /// Flying back in after undo.
    Entering,
}

/// Result of releasing a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Commit(SwipeDirection),
    SnapBack,
    Ignored,
}

/// Result of observing the live command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Commit(SwipeDirection),
    Reentered,
    Ignored,
}

/// One card inside the virtualization window.
#[derive(Debug, Clone)]
pub struct AnimatedCard {
    index: usize,
    item_id: ItemId,
    x: Spring,
    y: Spring,
    rotation: Spring,
    is_programmatic: bool,
    phase: CardPhase,
    armed: bool,
    last_seen_seq: Option<u64>,
}

impl AnimatedCard {
    /// Mounts a card in neutral state.
    ///
    /// `seen_seq` marks the live command at mount time as already observed.
    pub fn new(index: usize, item_id: ItemId, seen_seq: Option<u64>, config: &StackConfig) -> Self {
        let px = |value| Spring::new(value, config.spring_stiffness, config.settle_epsilon_px);
        Self {
            index,
            item_id,
            x: px(0.0),
            y: px(0.0),
            rotation: Spring::new(0.0, config.spring_stiffness, config.settle_epsilon_deg),
            is_programmatic: false,
            phase: CardPhase::Idle,
            armed: false,
            last_seen_seq: seen_seq,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn set_armed(&mut self, armed: bool) {
        self.armed = armed;
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == CardPhase::Dragging
    }

    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating() || self.rotation.is_animating()
    }

    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            offset_x: self.x.value(),
            offset_y: self.y.value(),
            rotation_deg: self.rotation.value(),
            is_programmatic: self.is_programmatic,
            animating: self.is_animating(),
        }
    }

    /// Starts a drag. Rejected unless armed and not already exiting.
    pub fn begin_drag(&mut self) -> bool {
        if !self.armed || matches!(self.phase, CardPhase::Exiting(_) | CardPhase::Departed(_)) {
            return false;
        }
        self.stop_all();
        self.is_programmatic = false;
        self.phase = CardPhase::Dragging;
        true
    }

    /// Applies raw drag translation.
    pub fn update_drag(&mut self, raw_dx: f32, raw_dy: f32, config: &StackConfig) {
        if !self.is_dragging() {
            return;
        }
        self.x.set(raw_dx * config.drag_damping);
        self.y.set(raw_dy);
        self.rotation
            .set(raw_dx / config.viewport_width * config.drag_rotation_factor_deg);
    }

    /// Ends a drag: commits past the threshold, otherwise springs back.
    pub fn release(&mut self, raw_dx: f32, velocity_x: f32, config: &StackConfig) -> ReleaseOutcome {
        if !self.is_dragging() {
            return ReleaseOutcome::Ignored;
        }
        if raw_dx.abs() > config.commit_threshold_px() {
            if let Some(direction) = SwipeDirection::from_displacement(raw_dx) {
                self.start_exit(direction, velocity_x, config);
                return ReleaseOutcome::Commit(direction);
            }
        }
        self.x.animate_to(0.0, velocity_x);
        self.y.animate_to(0.0, 0.0);
        self.rotation.animate_to(0.0, 0.0);
        self.phase = CardPhase::Returning;
        ReleaseOutcome::SnapBack
    }

    /// Aborts a drag without committing (e.g. the stack was expanded).
    pub fn cancel_drag(&mut self) {
        if !self.is_dragging() {
            return;
        }
        self.x.animate_to(0.0, 0.0);
        self.y.animate_to(0.0, 0.0);
        self.rotation.animate_to(0.0, 0.0);
        self.phase = CardPhase::Returning;
    }

    /// Reacts to the live command if it addresses this card and is new.
    pub fn observe_command(&mut self, command: SwipeCommand, config: &StackConfig) -> CommandOutcome {
        if command.target_index != self.index {
            return CommandOutcome::Ignored;
        }
        if self.last_seen_seq.is_some_and(|seen| seen >= command.seq) {
            return CommandOutcome::Ignored;
        }
        self.last_seen_seq = Some(command.seq);

        if command.is_undo() {
            if let Some(previous) = command.previous_direction {
                self.start_reentry(previous, config);
                return CommandOutcome::Reentered;
            }
        }
        let Some(direction) = command.direction else {
            return CommandOutcome::Ignored;
        };
        if matches!(self.phase, CardPhase::Exiting(_) | CardPhase::Departed(_)) {
            return CommandOutcome::Ignored;
        }
        self.is_programmatic = true;
        self.start_exit(direction, direction.sign() * config.command_velocity, config);
        CommandOutcome::Commit(direction)
    }

    /// Advances springs by `dt` seconds. Returns the phase that just ended,
    /// if any.
    pub fn step(&mut self, dt: f32) -> Option<CardPhase> {
        if !self.is_animating() {
            return None;
        }
        self.x.step(dt);
        self.y.step(dt);
        self.rotation.step(dt);
        if self.is_animating() {
            return None;
        }

        let ended = self.phase;
        match ended {
            CardPhase::Exiting(direction) => self.phase = CardPhase::Departed(direction),
            CardPhase::Returning | CardPhase::Entering => self.reset_neutral(),
            CardPhase::Idle | CardPhase::Dragging | CardPhase::Departed(_) => {}
        }
        Some(ended)
    }

    /// Cancels any in-flight spring, keeping current values.
    pub fn stop_all(&mut self) {
        self.x.stop();
        self.y.stop();
        self.rotation.stop();
    }

    fn start_exit(&mut self, direction: SwipeDirection, velocity_x: f32, config: &StackConfig) {
        let sign = direction.sign();
        self.x.animate_to(sign * config.exit_distance_px(), velocity_x);
        self.y.stop();
        self.rotation.animate_to(sign * config.exit_rotation_deg, 0.0);
        self.phase = CardPhase::Exiting(direction);
    }

    fn start_reentry(&mut self, previous: SwipeDirection, config: &StackConfig) {
        let sign = previous.sign();
        self.x.set(sign * config.exit_distance_px());
        self.y.set(0.0);
        self.rotation.set(sign * config.exit_rotation_deg);
        self.x.animate_to(0.0, 0.0);
        self.rotation.animate_to(0.0, 0.0);
        self.is_programmatic = true;
        self.phase = CardPhase::Entering;
    }

    fn reset_neutral(&mut self) {
        self.x.set(0.0);
        self.y.set(0.0);
        self.rotation.set(0.0);
        self.is_programmatic = false;
        self.phase = CardPhase::Idle;
    }
}
