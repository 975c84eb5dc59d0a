//! Repeat schedule editing.
//!
//! # Responsibility
//! - Convert between canonical rules and editor selector state.
//! - Model the preset, custom and end-repeat screens as plain data.
//!
//! # Invariants
//! - Nothing here performs I/O; every operation is synchronous and total.

pub mod editor;
pub mod end;
pub mod labels;
pub mod preset;
pub mod rows;
pub mod summary;
