//! Single-zone lumped capacitance building model.

use crate::devices::{HvacCommand, HvacUnit};
use crate::error::{SimError, require_positive};

use super::tracker::SampleTracker;
use super::types::StepSample;

/// Length of one building step in seconds.
pub const TIME_STEP_SECONDS: f64 = 1.0;

/// A building with one thermal capacitance and one resistance to outside air.
///
/// Each [`Building::step`] runs the owned [`HvacUnit`] for one second and
/// advances the building temperature with the first-order recurrence
///
/// `T_new = T_old * (1 - dt * U / C) + dt / C * (P_hvac + U * T_outside)`
///
/// where `U` is heat transmission (W/K), `C` heat mass capacity (J/K) and
/// `P_hvac` the signed HVAC power (+heating, -cooling).
///
/// # Examples
///
/// ```
/// use hvac_sim::devices::HvacUnit;
/// use hvac_sim::sim::building::Building;
/// use hvac_sim::sim::tracker::SampleTracker;
///
/// let hvac = HvacUnit::new(20_000.0, 10_000.0)?;
/// let mut building = Building::new(hvac, 1_650_000.0, 500.0, 22.0, 100.0, Some(SampleTracker::new()))?;
/// let sample = building.step(0.0)?;
/// assert!(sample.building_temperature < 22.0);
/// assert_eq!(building.tracker().map(SampleTracker::len), Some(1));
/// # Ok::<(), hvac_sim::error::SimError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Building {
    hvac: HvacUnit,
    heat_mass_capacity: f64,
    heat_transmission: f64,
    conditioned_floor_area: f64,
    initial_temperature: f64,
    current_temperature: f64,
    tracker: Option<SampleTracker>,
}

impl Building {
    /// Creates a building around an HVAC unit.
    ///
    /// # Arguments
    ///
    /// * `hvac` - HVAC unit owned by the building
    /// * `heat_mass_capacity` - Capacity of the building's heat mass (J/K, > 0)
    /// * `heat_transmission` - Heat transmission to the outside (W/K, > 0)
    /// * `initial_temperature` - Temperature at start and after reset (°C)
    /// * `conditioned_floor_area` - Floor area (m², > 0)
    /// * `tracker` - Optional sample tracker appended to on every step
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for non-positive physical
    /// parameters or a non-finite initial temperature.
    pub fn new(
        hvac: HvacUnit,
        heat_mass_capacity: f64,
        heat_transmission: f64,
        initial_temperature: f64,
        conditioned_floor_area: f64,
        tracker: Option<SampleTracker>,
    ) -> Result<Self, SimError> {
        require_positive("heat_mass_capacity", heat_mass_capacity)?;
        require_positive("heat_transmission", heat_transmission)?;
        require_positive("conditioned_floor_area", conditioned_floor_area)?;
        if !initial_temperature.is_finite() {
            return Err(SimError::config(
                "initial_temperature",
                format!("must be finite, got {initial_temperature}"),
            ));
        }

        Ok(Self {
            hvac,
            heat_mass_capacity,
            heat_transmission,
            conditioned_floor_area,
            initial_temperature,
            current_temperature: initial_temperature,
            tracker,
        })
    }

    /// Advances the building by one second.
    ///
    /// Returns `(outside_temperature, new_building_temperature,
    /// avg_watts_per_second)` as a [`StepSample`], which is also appended to
    /// the tracker when one is attached.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] for a non-finite outside
    /// temperature; no state is touched in that case.
    pub fn step(&mut self, outside_temperature: f64) -> Result<StepSample, SimError> {
        if !outside_temperature.is_finite() {
            return Err(SimError::InvalidInput(format!(
                "outside temperature must be finite, got {outside_temperature}"
            )));
        }

        self.hvac.simulate_one_second();
        let hvac_power = self.hvac.signed_power();
        self.current_temperature = self.next_temperature(outside_temperature, hvac_power);

        let sample = StepSample {
            outside_temperature,
            building_temperature: self.current_temperature,
            avg_watts_per_second: self.hvac.average_watts_per_second(),
        };
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.add_sample(sample);
        }
        Ok(sample)
    }

    /// Read-only snapshot of the current state.
    pub fn get_state(&self, outside_temperature: f64) -> StepSample {
        StepSample {
            outside_temperature,
            building_temperature: self.current_temperature,
            avg_watts_per_second: self.hvac.average_watts_per_second(),
        }
    }

    /// Restores the initial temperature and resets the HVAC unit.
    ///
    /// The tracker keeps its samples.
    pub fn reset(&mut self) {
        self.current_temperature = self.initial_temperature;
        self.hvac.reset();
    }

    /// Forwards a tri-state command to the HVAC unit.
    pub fn apply(&mut self, command: HvacCommand) {
        self.hvac.apply(command);
    }

    fn next_temperature(&self, outside_temperature: f64, hvac_power: f64) -> f64 {
        let dt_by_cm = TIME_STEP_SECONDS / self.heat_mass_capacity;
        // Same recurrence, rearranged so that T_old == T_outside with no HVAC
        // power leaves the temperature bit-for-bit unchanged.
        self.current_temperature
            + dt_by_cm
                * (hvac_power
                    + self.heat_transmission * (outside_temperature - self.current_temperature))
    }

    pub fn current_temperature(&self) -> f64 {
        self.current_temperature
    }

    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    pub fn heat_mass_capacity(&self) -> f64 {
        self.heat_mass_capacity
    }

    pub fn heat_transmission(&self) -> f64 {
        self.heat_transmission
    }

    pub fn conditioned_floor_area(&self) -> f64 {
        self.conditioned_floor_area
    }

    pub fn hvac(&self) -> &HvacUnit {
        &self.hvac
    }

    pub fn tracker(&self) -> Option<&SampleTracker> {
        self.tracker.as_ref()
    }

    /// Detaches and returns the tracker, leaving the building untracked.
    pub fn take_tracker(&mut self) -> Option<SampleTracker> {
        self.tracker.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::HvacParameters;

    fn building(initial: f64, tracker: bool) -> Building {
        let hvac = HvacUnit::new(20_000.0, 10_000.0).expect("valid hvac");
        Building::new(
            hvac,
            1_650_000.0,
            500.0,
            initial,
            100.0,
            tracker.then(SampleTracker::new),
        )
        .expect("valid building")
    }

    #[test]
    fn rejects_non_positive_parameters() {
        let hvac = HvacUnit::new(1.0, 1.0).expect("valid hvac");
        assert!(matches!(
            Building::new(hvac.clone(), 0.0, 500.0, 20.0, 100.0, None),
            Err(SimError::InvalidConfiguration { field: "heat_mass_capacity", .. })
        ));
        assert!(Building::new(hvac.clone(), 1.0, -1.0, 20.0, 100.0, None).is_err());
        assert!(Building::new(hvac.clone(), 1.0, 1.0, 20.0, 0.0, None).is_err());
        assert!(Building::new(hvac, 1.0, 1.0, f64::NAN, 1.0, None).is_err());
    }

    #[test]
    fn equilibrium_holds_exactly() {
        let mut b = building(17.3, false);
        for _ in 0..10_000 {
            b.step(17.3).expect("finite input");
        }
        assert_eq!(b.current_temperature(), 17.3);
    }

    #[test]
    fn matches_reference_recurrence() {
        let mut b = building(22.0, false);
        let sample = b.step(0.0).expect("finite input");
        let dt_by_cm = 1.0 / 1_650_000.0;
        let expected = 22.0 * (1.0 - dt_by_cm * 500.0) + dt_by_cm * (0.0 + 500.0 * 0.0);
        assert!((sample.building_temperature - expected).abs() < 1e-12);
        assert_eq!(sample.outside_temperature, 0.0);
    }

    #[test]
    fn cooling_lowers_temperature_at_equilibrium() {
        let mut b = building(25.0, false);
        b.apply(HvacCommand::Cool);
        for _ in 0..120 {
            b.step(25.0).expect("finite input");
        }
        assert!(b.current_temperature() < 25.0);
    }

    #[test]
    fn non_finite_outside_is_rejected_without_mutation() {
        let mut b = building(20.0, true);
        let err = b.step(f64::NAN);
        assert!(matches!(err, Err(SimError::InvalidInput(_))));
        assert!(b.step(f64::INFINITY).is_err());
        assert_eq!(b.hvac().total_time_in_seconds(), 0);
        assert_eq!(b.current_temperature(), 20.0);
        assert_eq!(b.tracker().map(SampleTracker::len), Some(0));
    }

    #[test]
    fn get_state_does_not_mutate() {
        let mut b = building(21.0, true);
        b.step(5.0).expect("finite input");
        let before = b.current_temperature();
        let state = b.get_state(5.0);
        assert_eq!(state.building_temperature, before);
        assert_eq!(state.outside_temperature, 5.0);
        assert_eq!(b.current_temperature(), before);
        assert_eq!(b.tracker().map(SampleTracker::len), Some(1));
    }

    #[test]
    fn reset_restores_initial_state_but_keeps_samples() {
        let mut b = building(22.0, true);
        b.apply(HvacCommand::Heat);
        for _ in 0..60 {
            b.step(0.0).expect("finite input");
        }
        b.reset();
        assert_eq!(b.current_temperature(), 22.0);
        assert!(!b.hvac().heating_on());
        assert_eq!(b.hvac().total_time_in_seconds(), 0);
        assert_eq!(b.tracker().map(SampleTracker::len), Some(60));
    }

    #[test]
    fn heating_ramp_down_still_warms() {
        let params = HvacParameters {
            max_heating_power_w: 50_000.0,
            ramp_up_seconds: 0,
            ramp_down_seconds: 10,
            ..HvacParameters::default()
        };
        let hvac = HvacUnit::with_parameters(params).expect("valid hvac");
        let mut b = Building::new(hvac, 1_650_000.0, 500.0, 20.0, 100.0, None).expect("valid");
        b.apply(HvacCommand::Heat);
        b.step(20.0).expect("finite input");
        b.apply(HvacCommand::Off);
        let before = b.current_temperature();
        b.step(20.0).expect("finite input");
        assert!(b.hvac().heating_shutting_down());
        assert!(b.current_temperature() > before);
    }
}
