//! ID prefix constants.
//!
//! IDs are generated by the store as `{prefix}-{8 hex chars}`, e.g. `tsk-a3f8b2c1`.
//! Callers treat them as opaque strings.

pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_CHUNK: &str = "chk";

/// Every prefix the store hands out.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_TASK, PREFIX_CHUNK];
