//! FFI use-case API for the Flutter deck screen.
//!
//! # Responsibility
//! - Expose the stack control surface and per-frame transforms to Dart via FRB.
//! - Hold one process-wide deck session owned by the UI isolate.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls before `deck_init` are no-ops returning empty/false values.
//! - Event delivery to Dart is pull-based (`deck_drain_events`) and never
//!   blocks the frame callback.

use log::warn;
use std::sync::mpsc::Receiver;
use std::sync::{Mutex, OnceLock, PoisonError};
use swipedeck_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Item, OverlayVisuals, ReleaseOutcome, StackConfig, StackCoordinator, StackEvent, SwipeDirection,
};
use uuid::Uuid;

static DECK_SESSION: OnceLock<Mutex<Option<DeckSession>>> = OnceLock::new();

struct DeckSession {
    stack: StackCoordinator,
    events: Receiver<StackEvent>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Idempotent for the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Deck item handed over by the Dart host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckItemInput {
    /// Stable item ID in UUID string form.
    pub id: String,
    /// Opaque card content, passed back unchanged in events.
    pub content: String,
}

/// Render transform for one mounted card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardFrame {
    pub index: u32,
    pub opacity: f64,
    pub scale: f64,
    pub z_index: i32,
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotation_deg: f64,
    pub interactive: bool,
    pub accept_icon_opacity: f64,
    pub reject_icon_opacity: f64,
    pub accept_label_opacity: f64,
    pub reject_label_opacity: f64,
}

/// One rendered frame of the stack.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeckFrame {
    pub active_index: u32,
    pub show_loading_indicator: bool,
    /// Mounted cards, back to front.
    pub cards: Vec<CardFrame>,
}

/// Engine event flattened for Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEvent {
    /// `swiped|undone|swiping_changed|expand_changed`.
    pub kind: String,
    pub index: Option<u32>,
    /// `left|right` for swipes and undo re-entry side.
    pub direction: Option<String>,
    pub item_id: Option<String>,
    pub flag: Option<bool>,
}

/// Creates (or replaces) the deck session.
///
/// `config_json` may override any tuning field; `viewport_width` always
/// wins.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_init(viewport_width: f64, config_json: Option<String>) -> String {
    let base = match config_json.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => match StackConfig::from_json_str(raw) {
            Ok(config) => config,
            Err(err) => return format!("deck_init failed: {err}"),
        },
        _ => StackConfig::default(),
    };
    let config = StackConfig {
        viewport_width: viewport_width as f32,
        ..base
    };

    match StackCoordinator::with_channel(config) {
        Ok((stack, events)) => {
            *lock_session() = Some(DeckSession { stack, events });
            String::new()
        }
        Err(err) => format!("deck_init failed: {err}"),
    }
}

/// Replaces the deck content.
///
/// # FFI contract
/// - Rejects the whole batch when any id is not a UUID.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_set_items(items: Vec<DeckItemInput>) -> String {
    let parsed = match parse_items(items) {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };
    with_session(|session| session.stack.set_deck(parsed))
        .map(|()| String::new())
        .unwrap_or_else(|| "deck_set_items failed: deck not initialized".to_string())
}

/// Programmatic reject of the active card (button or voice).
///
/// # FFI contract
/// - Sync call; the index advance and `swiped` event happen before return.
/// - Returns `false` when there is no active card or no deck session.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_swipe_left() -> bool {
    with_session(|session| session.stack.swipe_left()).unwrap_or(false)
}

/// Programmatic accept of the active card (button or voice).
///
/// # FFI contract
/// - Sync call; the index advance and `swiped` event happen before return.
/// - Returns `false` when there is no active card or no deck session.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_swipe_right() -> bool {
    with_session(|session| session.stack.swipe_right()).unwrap_or(false)
}

/// Brings the previous card back from the side it last left through.
///
/// # FFI contract
/// - Sync call; queues an `undone` event on success.
/// - Returns `false` when there is nothing to undo or no deck session.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_undo() -> bool {
    with_session(|session| session.stack.undo()).unwrap_or(false)
}

/// Opens or closes the expanded detail view.
///
/// # FFI contract
/// - Sync call; opening mid-drag snaps the dragged card back.
/// - Queues `expand_changed` only when the value changes.
/// - Returns `false` only when no deck session exists.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_set_expanded(expanded: bool) -> bool {
    with_session(|session| session.stack.set_expanded(expanded)).is_some()
}

/// Mirrors the host's "fetching more items" flag.
///
/// # FFI contract
/// - Sync call; only affects `DeckFrame::show_loading_indicator`.
/// - Returns `false` only when no deck session exists.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_set_fetching_more(fetching: bool) -> bool {
    with_session(|session| session.stack.set_fetching_more(fetching)).is_some()
}

/// Card tap; toggles the expanded view for the active card.
///
/// # FFI contract
/// - Sync call.
/// - Returns `false` for non-active cards, mid-drag taps, or no session.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_tap_card(index: u32) -> bool {
    with_session(|session| session.stack.tap_card(index as usize)).unwrap_or(false)
}

/// Pan start on the card at `index`.
///
/// # FFI contract
/// - Sync call; queues `swiping_changed(true)` when accepted.
/// - Returns `false` when the card is not the active one or the view is expanded.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_gesture_start(index: u32) -> bool {
    with_session(|session| session.stack.begin_gesture(index as usize)).unwrap_or(false)
}

/// Pan update with the raw cumulative offset in logical pixels.
///
/// # FFI contract
/// - Sync call, intended for every pointer move.
/// - Ignored for cards without an accepted `deck_gesture_start`.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_gesture_update(index: u32, dx: f64, dy: f64) {
    with_session(|session| {
        session
            .stack
            .update_gesture(index as usize, dx as f32, dy as f32)
    });
}

/// Releases a drag.
///
/// # FFI contract
/// - Sync call; a commit queues `swiped` before `swiping_changed(false)`.
/// - Returns `commit_left|commit_right|snap_back|ignored`.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_gesture_end(index: u32, dx: f64, dy: f64, velocity_x: f64) -> String {
    let outcome = with_session(|session| {
        session
            .stack
            .end_gesture(index as usize, dx as f32, dy as f32, velocity_x as f32)
    })
    .unwrap_or(ReleaseOutcome::Ignored);
    release_label(outcome).to_string()
}

/// Advances animations by `dt_ms` and returns the frame to render.
///
/// # FFI contract
/// - Sync call; intended for the UI frame callback.
/// - Returns an empty frame before `deck_init`.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_tick(dt_ms: f64) -> DeckFrame {
    with_session(|session| {
        session.stack.tick((dt_ms / 1000.0) as f32);
        build_frame(&session.stack)
    })
    .unwrap_or_default()
}

/// Drains engine events queued since the last call.
///
/// # FFI contract
/// - Sync call, never blocks; returns events in emission order.
/// - Returns an empty list before `deck_init`.
#[flutter_rust_bridge::frb(sync)]
pub fn deck_drain_events() -> Vec<DeckEvent> {
    with_session(|session| session.events.try_iter().map(to_deck_event).collect())
        .unwrap_or_default()
}

fn lock_session() -> std::sync::MutexGuard<'static, Option<DeckSession>> {
    DECK_SESSION
        .get_or_init(|| Mutex::new(None))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn with_session<T>(f: impl FnOnce(&mut DeckSession) -> T) -> Option<T> {
    let mut guard = lock_session();
    match guard.as_mut() {
        Some(session) => Some(f(session)),
        None => {
            warn!("event=ffi_call module=ffi status=skipped reason=deck_not_initialized");
            None
        }
    }
}

fn parse_items(items: Vec<DeckItemInput>) -> Result<Vec<Item>, String> {
    items
        .into_iter()
        .map(|input| {
            let id = Uuid::parse_str(input.id.trim())
                .map_err(|err| format!("deck_set_items failed: invalid id `{}`: {err}", input.id))?;
            Ok(Item::with_id(id, input.content))
        })
        .collect()
}

fn build_frame(stack: &StackCoordinator) -> DeckFrame {
    let cards = stack
        .frame()
        .into_iter()
        .map(|visual| {
            let overlays = stack.card_overlays(visual.index);
            let opacity = |pick: fn(OverlayVisuals) -> f32| overlays.map_or(0.0, pick) as f64;
            CardFrame {
                index: visual.index as u32,
                opacity: visual.opacity as f64,
                scale: visual.scale as f64,
                z_index: visual.z_index,
                translate_x: visual.translate_x as f64,
                translate_y: visual.translate_y as f64,
                rotation_deg: visual.rotation_deg as f64,
                interactive: visual.interactive,
                accept_icon_opacity: opacity(|o| o.accept_icon.opacity),
                reject_icon_opacity: opacity(|o| o.reject_icon.opacity),
                accept_label_opacity: opacity(|o| o.accept_label.opacity),
                reject_label_opacity: opacity(|o| o.reject_label.opacity),
            }
        })
        .collect();

    DeckFrame {
        active_index: stack.active_index() as u32,
        show_loading_indicator: stack.show_loading_indicator(),
        cards,
    }
}

fn to_deck_event(event: StackEvent) -> DeckEvent {
    match event {
        StackEvent::Swiped {
            index,
            direction,
            item,
            ..
        } => DeckEvent {
            kind: "swiped".to_string(),
            index: Some(index as u32),
            direction: Some(direction.as_str().to_string()),
            item_id: Some(item.id.to_string()),
            flag: None,
        },
        StackEvent::Undone {
            index,
            item,
            enter_from,
        } => DeckEvent {
            kind: "undone".to_string(),
            index: Some(index as u32),
            direction: Some(enter_from.as_str().to_string()),
            item_id: Some(item.id.to_string()),
            flag: None,
        },
        StackEvent::SwipingChanged(value) => flag_event("swiping_changed", value),
        StackEvent::ExpandChanged(value) => flag_event("expand_changed", value),
    }
}

fn flag_event(kind: &str, value: bool) -> DeckEvent {
    DeckEvent {
        kind: kind.to_string(),
        index: None,
        direction: None,
        item_id: None,
        flag: Some(value),
    }
}

fn release_label(outcome: ReleaseOutcome) -> &'static str {
    match outcome {
        ReleaseOutcome::Commit(SwipeDirection::Left) => "commit_left",
        ReleaseOutcome::Commit(SwipeDirection::Right) => "commit_right",
        ReleaseOutcome::SnapBack => "snap_back",
        ReleaseOutcome::Ignored => "ignored",
    }
}
