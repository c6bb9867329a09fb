//! Core simulation types: run configuration, per-second samples, and step records.

use std::fmt;

use crate::devices::HvacCommand;
use crate::error::SimError;

/// Decision-loop timing shared by the engine and its components.
///
/// # Examples
///
/// ```
/// use hvac_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(2880, 30, 42)?;
/// assert_eq!(cfg.total_seconds(), 86_400);
/// # Ok::<(), hvac_sim::error::SimError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Number of controller decisions in a run.
    pub steps: usize,
    /// Simulated seconds between controller decisions.
    pub seconds_per_step: u32,
    /// Master random seed for stochastic weather.
    pub seed: u64,
}

impl SimConfig {
    /// Creates a new run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if `steps` or
    /// `seconds_per_step` is zero.
    pub fn new(steps: usize, seconds_per_step: u32, seed: u64) -> Result<Self, SimError> {
        if steps == 0 {
            return Err(SimError::config("steps", "must be > 0"));
        }
        if seconds_per_step == 0 {
            return Err(SimError::config("seconds_per_step", "must be > 0"));
        }
        Ok(Self {
            steps,
            seconds_per_step,
            seed,
        })
    }

    /// Total simulated seconds across the run.
    pub fn total_seconds(&self) -> u64 {
        self.steps as u64 * u64::from(self.seconds_per_step)
    }
}

/// State triple produced by every building step and stored by the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSample {
    /// Outside air temperature used for the step (°C).
    pub outside_temperature: f64,
    /// Building temperature after the step (°C).
    pub building_temperature: f64,
    /// Cumulative mean HVAC power since reset (W).
    pub avg_watts_per_second: f64,
}

/// What a controller sees before choosing the next command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Simulated seconds since the start of the run.
    pub time_s: u64,
    pub building_temperature: f64,
    pub outside_temperature: f64,
    pub avg_watts_per_second: f64,
    pub heating_on: bool,
    pub heating_shutting_down: bool,
    pub cooling_on: bool,
}

/// Complete record of one controller decision interval.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Decision index.
    pub step: usize,
    /// Simulated seconds at the end of the interval.
    pub time_s: u64,
    /// Command applied at the start of the interval.
    pub command: HvacCommand,
    /// Outside temperature at the end of the interval (°C).
    pub outside_temperature: f64,
    /// Building temperature at the start of the interval (°C).
    pub previous_temperature: f64,
    /// Building temperature at the end of the interval (°C).
    pub building_temperature: f64,
    /// Cumulative mean HVAC power (W).
    pub avg_watts_per_second: f64,
    pub heating_on: bool,
    pub cooling_on: bool,
    /// Cumulative electric cost to date ($).
    pub electric_cost: f64,
    /// Cumulative gas cost to date ($).
    pub gas_cost: f64,
    /// Cost incurred during this interval only ($).
    pub action_cost: f64,
    /// Reward from the configured strategy.
    pub reward: f64,
}

impl StepResult {
    /// Cumulative electric plus gas cost ($).
    pub fn total_cost(&self) -> f64 {
        self.electric_cost + self.gas_cost
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step={:>5} ({:>7}s) | cmd={:<4} | in={:>6.2}C out={:>6.2}C | \
             avg={:>8.1} W | cost=${:.4} (+{:.5}) | reward={:.3}",
            self.step,
            self.time_s,
            self.command,
            self.building_temperature,
            self.outside_temperature,
            self.avg_watts_per_second,
            self.total_cost(),
            self.action_cost,
            self.reward,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_config_basic() {
        let cfg = SimConfig::new(2880, 30, 42).expect("valid");
        assert_eq!(cfg.steps, 2880);
        assert_eq!(cfg.seconds_per_step, 30);
        assert_eq!(cfg.total_seconds(), 86_400);
    }

    #[test]
    fn sim_config_rejects_zero() {
        assert!(SimConfig::new(0, 30, 0).is_err());
        assert!(SimConfig::new(10, 0, 0).is_err());
    }

    #[test]
    fn step_result_display_does_not_panic() {
        let r = StepResult {
            step: 3,
            time_s: 120,
            command: HvacCommand::Heat,
            outside_temperature: -2.0,
            previous_temperature: 17.5,
            building_temperature: 17.6,
            avg_watts_per_second: 5_000.0,
            heating_on: true,
            cooling_on: false,
            electric_cost: 0.01,
            gas_cost: 0.02,
            action_cost: 0.001,
            reward: 0.97,
        };
        let s = format!("{r}");
        assert!(s.contains("heat"));
        assert!((r.total_cost() - 0.03).abs() < 1e-12);
    }
}
