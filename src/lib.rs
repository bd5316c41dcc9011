//! Tiny Doodle: a stroke-capture and history engine for free-hand drawing.
//!
//! Hosts mount a [`CanvasSession`] over a display rectangle, feed it pointer
//! events and a periodic tick, and react to the events it queues. The rest of
//! the crate supplies what a hosting application needs around that session:
//! palette data, the settings and drawing-collection stores, and PNG export
//! with share handling.

pub mod analytics;
pub mod collection;
pub mod export;
pub mod geometry;
pub mod history;
pub mod logging;
pub mod model;
pub mod paint;
pub mod session;
pub mod settings;
pub mod settings_store;
pub mod stroke;
pub mod surface;
pub mod token;
pub mod tray;

pub use export::{ExportPayload, ShareDisposition, ShareOutcome, ShareRequest, ShareSink};
pub use geometry::{BoundsRect, Point, PointerInput, TouchPoint};
pub use session::{CanvasSession, HostEvent, CLEAR_CONFIRM_PROMPT};
pub use token::ContentToken;
