//! tripdesk - rule-based assignment of travel inquiries to staff
//!
//! Incoming customer queries are matched to back-office staff by an ordered
//! catalog of rules (agent relationship, destination expertise, workload
//! balance, round-robin). The [`executor`] commits decisions and keeps each
//! staff member's workload counter in step; the [`service`] wraps a desk in
//! a single-writer task for concurrent callers.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod matching;
pub mod roster;
pub mod rules;
pub mod sequencer;
pub mod service;

pub use error::DeskError;
