//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use hvac_sim::devices::{HvacParameters, HvacUnit};
use hvac_sim::sim::building::Building;
use hvac_sim::sim::tracker::SampleTracker;

/// Floor area used by the reference building (m²).
pub const FLOOR_AREA: f64 = 100.0;

/// Reference heat mass capacity: 16 500 J/°C per m² of floor.
pub const HEAT_MASS_CAPACITY: f64 = 16_500.0 * FLOOR_AREA;

pub const HEAT_TRANSMISSION: f64 = 500.0;

pub const INITIAL_TEMPERATURE: f64 = 22.0;

/// Default HVAC unit (20 kW heat, 10.5 kW cool, 60 s up, 90 s down ramps).
pub fn default_hvac() -> HvacUnit {
    HvacUnit::with_parameters(HvacParameters::default()).expect("default parameters are valid")
}

/// Reference building with the default HVAC unit and a tracker attached.
pub fn reference_building() -> Building {
    Building::new(
        default_hvac(),
        HEAT_MASS_CAPACITY,
        HEAT_TRANSMISSION,
        INITIAL_TEMPERATURE,
        FLOOR_AREA,
        Some(SampleTracker::new()),
    )
    .expect("reference building is valid")
}

/// Reference building starting at `initial` °C, without a tracker.
pub fn untracked_building(initial: f64) -> Building {
    Building::new(
        default_hvac(),
        HEAT_MASS_CAPACITY,
        HEAT_TRANSMISSION,
        initial,
        FLOOR_AREA,
        None,
    )
    .expect("building is valid")
}
