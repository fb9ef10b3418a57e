//! # deck-core
//!
//! Core types shared across all focusdeck crates:
//! - Entity structs for tasks and chunks
//! - Status and schedule enums with their SQL/JSON string forms
//! - ID prefix constants
//! - Cross-cutting error types
//! - The board aggregator (unchunked bucket + one bucket per chunk)
//! - The focus session state machine (countdown + per-task completion)
//! - HTTP response shapes

pub mod board;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod focus;
pub mod ids;
pub mod responses;
