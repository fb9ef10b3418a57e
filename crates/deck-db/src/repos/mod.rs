//! Repository modules implementing the store operations.
//!
//! Each module adds methods to `DeckService` via `impl DeckService` blocks.

pub mod board;
pub mod chunk;
pub mod meta;
pub mod task;
