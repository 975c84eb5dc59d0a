//! Reminder list: sectioning, store contract and refresh control.
//!
//! # Responsibility
//! - Turn store snapshots into ordered day buckets.
//! - Keep stale asynchronous results out of the published sections.
//!
//! # See also
//! - `controller` for the ticket discipline.

pub mod controller;
pub mod sectioner;
pub mod store;
