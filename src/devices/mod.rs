//! Equipment models driven by the building simulation.

/// Furnace and air-conditioner state machine with energy meters.
pub mod hvac;

// Re-export the main types for convenience
pub use hvac::{HvacCommand, HvacParameters, HvacState, HvacUnit};
