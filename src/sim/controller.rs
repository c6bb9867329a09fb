use crate::devices::HvacCommand;

use super::types::Observation;

/// Decides the HVAC command for the next decision interval.
///
/// Implementations may keep state between calls (e.g. a latched command).
pub trait Controller {
    /// Returns the command to apply before the next interval is simulated.
    fn decide(&mut self, observation: &Observation) -> HvacCommand;
}

/// Always issues the same command. Useful for manual policies and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedController(pub HvacCommand);

impl Controller for FixedController {
    fn decide(&mut self, _observation: &Observation) -> HvacCommand {
        self.0
    }
}

/// Conventional hysteresis thermostat used as the comparison baseline.
///
/// Heats when the building drops below `desired - delta`, stops heating once it
/// climbs past `desired`, cools above `desired + delta` and stops cooling below
/// `desired`. Between those thresholds the previous command is held.
#[derive(Debug, Clone, Copy)]
pub struct ThermostatController {
    pub desired_temperature: f64,
    pub temperature_delta: f64,
    command: HvacCommand,
}

impl ThermostatController {
    pub fn new(desired_temperature: f64, temperature_delta: f64) -> Self {
        Self {
            desired_temperature,
            temperature_delta,
            command: HvacCommand::Off,
        }
    }
}

impl Default for ThermostatController {
    fn default() -> Self {
        Self::new(20.0, 2.0)
    }
}

impl Controller for ThermostatController {
    fn decide(&mut self, obs: &Observation) -> HvacCommand {
        let t = obs.building_temperature;
        let desired = self.desired_temperature;
        let delta = self.temperature_delta;

        if obs.heating_on && !obs.heating_shutting_down && t > desired {
            self.command = HvacCommand::Off;
        }
        if !obs.heating_on && t < desired - delta {
            self.command = HvacCommand::Heat;
        }
        if !obs.heating_on && t > desired + delta {
            self.command = HvacCommand::Cool;
        }
        if !obs.heating_on && obs.cooling_on && t < desired {
            self.command = HvacCommand::Off;
        }

        self.command
    }
}
