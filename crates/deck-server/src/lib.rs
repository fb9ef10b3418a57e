//! # deck-server
//!
//! HTTP surface of focusdeck, served by the `deckd` binary:
//! - `/api/tasks` and `/api/chunks` CRUD over the libSQL store
//! - `/api/board`, the unchunked/per-chunk board view
//! - `/api/focus`, the single server-side focus session
//! - `/api/reset`, a manual trigger for the daily reset
//!
//! The binary also runs the cron-driven reset scheduler and the focus ticker.

pub mod error;
pub mod focus;
pub mod routes;
pub mod scheduler;
pub mod state;

pub use routes::router;
pub use state::AppState;
