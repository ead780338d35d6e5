//! Swipe direction and programmatic command value.
//!
//! # Invariants
//! - A command with `direction = Some(_)` requests a programmatic swipe.
//! - A command with `direction = None` and `previous_direction = Some(_)`
//!   requests an undo re-entry from that side.
//! - `seq` increases monotonically so a card never replays a command it
//!   already observed.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Horizontal swipe direction. `Right` accepts, `Left` rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Derives a direction from a signed horizontal displacement.
    ///
    /// Returns `None` for zero displacement.
    pub fn from_displacement(dx: f32) -> Option<Self> {
        if dx > 0.0 {
            Some(Self::Right)
        } else if dx < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }

    /// `+1.0` for right, `-1.0` for left.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl Display for SwipeDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single live command written by the logic context and observed by the
/// card whose index matches `target_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeCommand {
    pub seq: u64,
    pub target_index: usize,
    pub direction: Option<SwipeDirection>,
    pub previous_direction: Option<SwipeDirection>,
}

impl SwipeCommand {
    pub fn swipe(seq: u64, target_index: usize, direction: SwipeDirection) -> Self {
        Self {
            seq,
            target_index,
            direction: Some(direction),
            previous_direction: None,
        }
    }

    pub fn undo(seq: u64, target_index: usize, previous_direction: SwipeDirection) -> Self {
        Self {
            seq,
            target_index,
            direction: None,
            previous_direction: Some(previous_direction),
        }
    }

    /// Returns whether this command asks the target card to re-enter.
    pub fn is_undo(&self) -> bool {
        self.direction.is_none() && self.previous_direction.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{SwipeCommand, SwipeDirection};

    #[test]
    fn direction_follows_displacement_sign() {
        assert_eq!(
            SwipeDirection::from_displacement(120.0),
            Some(SwipeDirection::Right)
        );
        assert_eq!(
            SwipeDirection::from_displacement(-0.5),
            Some(SwipeDirection::Left)
        );
        assert_eq!(SwipeDirection::from_displacement(0.0), None);
    }

    #[test]
    fn undo_command_carries_previous_direction_only() {
        let command = SwipeCommand::undo(3, 1, SwipeDirection::Left);
        assert!(command.is_undo());
        assert_eq!(command.direction, None);

        let swipe = SwipeCommand::swipe(4, 1, SwipeDirection::Right);
        assert!(!swipe.is_undo());
    }

    #[test]
    fn direction_serializes_as_snake_case() {
        let json = serde_json::to_string(&SwipeDirection::Right).expect("serialize direction");
        assert_eq!(json, "\"right\"");
    }
}
