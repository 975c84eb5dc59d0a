//! Reminder editing sessions.

pub mod session;
