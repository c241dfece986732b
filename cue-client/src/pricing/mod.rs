//! Session cost calculation
//!
//! Pure running-estimate math for the ticking display. The server computes
//! the authoritative bill at stop time; nothing here feeds the ledger.

pub mod calculator;

pub use calculator::{TickResult, compute};
