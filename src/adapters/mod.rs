//! Adapters - implementations of ports against real infrastructure.

pub mod messaging;
pub mod postgres;
