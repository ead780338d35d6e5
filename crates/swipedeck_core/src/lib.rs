//! Card-stack interaction engine for swipe-based deck screens.
//! This crate owns the swipe state machine; the host owns the deck content.

pub mod config;
pub mod host;
pub mod logging;
pub mod model;
pub mod stack;

pub use config::{ConfigError, StackConfig};
pub use host::session::{ContentSource, HostSession, ItemBatcher, SwipeTally};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::command::{SwipeCommand, SwipeDirection};
pub use model::item::{Item, ItemId};
pub use stack::card::{CardPhase, ReleaseOutcome};
pub use stack::coordinator::StackCoordinator;
pub use stack::events::{CallbackSink, EventSink, StackEvent, SwipeOrigin};
pub use stack::visual::{CardVisual, OverlayVisual, OverlayVisuals};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
