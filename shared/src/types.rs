//! Common types for the shared crate

/// Stable table identifier
///
/// Tables are fixed at registry initialization; ids never change at runtime.
pub type TableId = i64;
