//! Runs a memorito game against a leaderboard service.
//!
//! [`GameEngine`] owns the live session: it applies reveals synchronously, re-hides mismatched pairs after the grace
//! period, and reconciles the personal best with a [`ScoreService`] in the background. Collaborators poll
//! [`GameEngine::snapshot`] and subscribe to [`GameEvent`]s.

pub use config::*;
pub use engine::*;
pub use error::*;
pub use events::EventStream;
pub use score::*;

pub use memorito_protocol::{GameEvent, Snapshot, TileView};

mod config;
mod engine;
mod error;
mod events;
mod score;
