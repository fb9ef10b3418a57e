//! Entity structs for focusdeck domain objects.
//!
//! Each entity maps to a table in the libSQL database (`tasks`, `chunks`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation.

mod chunk;
mod task;

pub use chunk::{Chunk, ChunkWithTasks};
pub use task::Task;
