//! Tender Sentinel - Procurement Analysis Budget Pacing
//!
//! This crate implements the budget-constrained dispatch core for a system
//! that monitors Brazilian public procurement records and triggers AI-based
//! risk analyses, paced against a donation-funded ledger.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
