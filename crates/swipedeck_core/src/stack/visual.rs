//! Pure visual derivation for cards and swipe overlays.
//!
//! # Invariants
//! - Every function here is a pure function of its inputs; no state is kept.
//! - Indices outside `[active - 1, active + 2]` are never rendered.

use crate::config::StackConfig;
use std::ops::RangeInclusive;

/// z-order of the interactive card.
pub const TOP_Z: i32 = 1000;
/// z-order of a previous card still flying off-screen, above the new front.
pub const EXITING_Z: i32 = TOP_Z + 1;

const OVERLAY_SCALE_FROM: f32 = 0.8;

/// Local animation values of one card at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSnapshot {
    pub offset_x: f32,
    pub offset_y: f32,
    pub rotation_deg: f32,
    pub is_programmatic: bool,
    pub animating: bool,
}

/// Render transform for one mounted card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardVisual {
    pub index: usize,
    pub opacity: f32,
    pub scale: f32,
    pub z_index: i32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotation_deg: f32,
    /// Only the active card accepts gestures.
    pub interactive: bool,
}

/// Opacity/scale pair for one overlay element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayVisual {
    pub opacity: f32,
    pub scale: f32,
}

impl OverlayVisual {
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        scale: OVERLAY_SCALE_FROM,
    };
}

/// The four swipe feedback overlays of a card.
///
/// Icons belong to programmatic swipes, text labels to gesture swipes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayVisuals {
    pub accept_icon: OverlayVisual,
    pub reject_icon: OverlayVisual,
    pub accept_label: OverlayVisual,
    pub reject_label: OverlayVisual,
}

/// Linear interpolation of `value` from `input` onto `output`, clamped at
/// both ends.
pub fn interpolate(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let (in_start, in_end) = input;
    let (out_start, out_end) = output;
    let span = in_end - in_start;
    if span.abs() <= f32::EPSILON {
        return if value < in_start { out_start } else { out_end };
    }
    let t = ((value - in_start) / span).clamp(0.0, 1.0);
    out_start + (out_end - out_start) * t
}

/// Deck indices that may be mounted for `active` in a deck of `len` items.
///
/// Returns `None` when the window is empty.
pub fn window_range(active: usize, len: usize) -> Option<RangeInclusive<usize>> {
    let start = active.saturating_sub(1);
    let end = (active + 2).min(len.checked_sub(1)?);
    (start <= end).then_some(start..=end)
}

pub fn is_in_window(index: usize, active: usize) -> bool {
    index + 1 >= active && index <= active + 2
}

/// Derives one card's render transform from its stack position.
///
/// `coupling` is the active card's live raw horizontal drag.
pub fn card_visual(
    index: usize,
    active: usize,
    coupling: f32,
    motion: MotionSnapshot,
    config: &StackConfig,
) -> Option<CardVisual> {
    if !is_in_window(index, active) {
        return None;
    }

    let distance = index.abs_diff(active) as i32;
    let base = CardVisual {
        index,
        opacity: 1.0,
        scale: 1.0,
        z_index: TOP_Z - distance,
        translate_x: motion.offset_x,
        translate_y: motion.offset_y,
        rotation_deg: motion.rotation_deg,
        interactive: false,
    };

    let visual = if index == active {
        CardVisual {
            interactive: true,
            ..base
        }
    } else if index < active {
        // Why: a card committed this frame still sits at its release offset
        // (zero for commands) until the first tick, so an offset threshold
        // would hide it for one frame. Spring liveness marks it exiting.
        if motion.animating {
            CardVisual {
                z_index: EXITING_Z,
                ..base
            }
        } else {
            CardVisual {
                opacity: 0.0,
                ..base
            }
        }
    } else if index == active + 1 {
        let magnitude = coupling.abs();
        let range = (0.0, config.peek_full_distance_px());
        CardVisual {
            scale: interpolate(magnitude, range, (config.peek_scale_from, 1.0)),
            opacity: interpolate(magnitude, range, (config.peek_opacity_from, 1.0)),
            translate_x: 0.0,
            translate_y: 0.0,
            rotation_deg: 0.0,
            ..base
        }
    } else {
        CardVisual {
            opacity: 0.0,
            scale: config.hidden_scale,
            translate_x: 0.0,
            translate_y: 0.0,
            rotation_deg: 0.0,
            ..base
        }
    };
    Some(visual)
}

/// Derives overlay feedback from a card's horizontal offset.
pub fn overlay_visuals(motion: MotionSnapshot, config: &StackConfig) -> OverlayVisuals {
    let ramp = (config.overlay_ramp_start_px, config.overlay_ramp_end_px);
    let magnitude = motion.offset_x.abs();
    let shown = OverlayVisual {
        opacity: interpolate(magnitude, ramp, (0.0, 1.0)),
        scale: interpolate(magnitude, ramp, (OVERLAY_SCALE_FROM, 1.0)),
    };

    let (accept, reject) = if motion.offset_x > 0.0 {
        (shown, OverlayVisual::HIDDEN)
    } else if motion.offset_x < 0.0 {
        (OverlayVisual::HIDDEN, shown)
    } else {
        (OverlayVisual::HIDDEN, OverlayVisual::HIDDEN)
    };

    if motion.is_programmatic {
        OverlayVisuals {
            accept_icon: accept,
            reject_icon: reject,
            accept_label: OverlayVisual::HIDDEN,
            reject_label: OverlayVisual::HIDDEN,
        }
    } else {
        OverlayVisuals {
            accept_icon: OverlayVisual::HIDDEN,
            reject_icon: OverlayVisual::HIDDEN,
            accept_label: accept,
            reject_label: reject,
        }
    }
}
