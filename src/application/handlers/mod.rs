//! Application command handlers.

pub mod dispatch;
