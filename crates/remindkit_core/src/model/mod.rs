//! Value types shared by the editor and list layers.
//!
//! # Responsibility
//! - Define immutable recurrence rules and reminder snapshots.
//! - Keep store payloads separate from mutable editor sessions.
//!
//! # Invariants
//! - Editors never mutate a rule in place; they build a new one.

pub mod recurrence;
pub mod reminder;
