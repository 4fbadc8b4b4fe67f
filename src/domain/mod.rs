//! Domain layer - pure business logic with no infrastructure concerns.

pub mod budget;
pub mod foundation;
pub mod ranking;
