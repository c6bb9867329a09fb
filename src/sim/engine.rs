//! Decision loop that drives a building with a controller against a weather profile.

use tracing::{debug, info};

use crate::error::SimError;
use crate::weather::OutsideTemperature;

use super::building::Building;
use super::clock::Clock;
use super::controller::Controller;
use super::reward::{RewardEngine, RewardInput};
use super::tracker::SampleTracker;
use super::types::{Observation, SimConfig, StepResult};

/// Simulation engine owning the building, weather, controller, and reward engine.
///
/// Generic over `C: Controller` for static dispatch. Every decision step asks
/// the controller for a command, then advances the building one second at a
/// time for `seconds_per_step` seconds.
pub struct Engine<C: Controller> {
    config: SimConfig,
    building: Building,
    weather: OutsideTemperature,
    controller: C,
    rewards: RewardEngine,
    clock: Clock,
}

impl<C: Controller> Engine<C> {
    /// Creates a new engine.
    ///
    /// The reward engine's max-cost baseline is computed for one decision
    /// interval of the building's HVAC unit.
    ///
    /// # Arguments
    ///
    /// * `config` - Decision count, interval length and seed
    /// * `building` - Building (with its HVAC unit and optional tracker)
    /// * `weather` - Outside temperature profile
    /// * `controller` - Command policy
    /// * `rewards` - Prices and reward strategy
    pub fn new(
        config: SimConfig,
        building: Building,
        weather: OutsideTemperature,
        controller: C,
        mut rewards: RewardEngine,
    ) -> Self {
        rewards.max_cost_for_horizon(building.hvac(), f64::from(config.seconds_per_step));
        let clock = Clock::new(config.steps, config.seconds_per_step);
        Self {
            config,
            building,
            weather,
            controller,
            rewards,
            clock,
        }
    }

    /// Snapshot handed to the controller at `time_s`.
    pub fn observe(&self, time_s: u64) -> Observation {
        let hvac = self.building.hvac();
        let state = self.building.get_state(self.weather.temperature_at(time_s));
        Observation {
            time_s,
            building_temperature: state.building_temperature,
            outside_temperature: state.outside_temperature,
            avg_watts_per_second: state.avg_watts_per_second,
            heating_on: hvac.heating_on(),
            heating_shutting_down: hvac.heating_shutting_down(),
            cooling_on: hvac.cooling_on(),
        }
    }

    /// Executes one decision interval starting at `start_s`.
    ///
    /// # Errors
    ///
    /// Propagates [`SimError::InvalidInput`] from the building step.
    pub fn step(&mut self, step: usize, start_s: u64) -> Result<StepResult, SimError> {
        // 1. Controller decision
        let observation = self.observe(start_s);
        let command = self.controller.decide(&observation);
        self.building.apply(command);

        // 2. Advance the building second by second
        let previous_temperature = self.building.current_temperature();
        let cost_before = self.rewards.total_cost(self.building.hvac());
        let mut sample = self.building.get_state(observation.outside_temperature);
        for s in 0..u64::from(self.config.seconds_per_step) {
            let outside = self.weather.temperature_at(start_s + s);
            sample = self.building.step(outside)?;
        }

        // 3. Cost and reward
        let hvac = self.building.hvac();
        let electric_cost = self.rewards.electric_cost(hvac);
        let gas_cost = self.rewards.gas_cost(hvac);
        let action_cost = electric_cost + gas_cost - cost_before;
        let input = RewardInput::from_hvac(
            hvac,
            self.rewards.prices(),
            previous_temperature,
            sample.building_temperature,
        )
        .with_action_cost(action_cost);
        let reward = self.rewards.reward(&input);

        debug!(step, %command, temperature = sample.building_temperature, reward, "step");

        Ok(StepResult {
            step,
            time_s: start_s + u64::from(self.config.seconds_per_step),
            command,
            outside_temperature: sample.outside_temperature,
            previous_temperature,
            building_temperature: sample.building_temperature,
            avg_watts_per_second: sample.avg_watts_per_second,
            heating_on: hvac.heating_on(),
            cooling_on: hvac.cooling_on(),
            electric_cost,
            gas_cost,
            action_cost,
            reward,
        })
    }

    /// Executes every remaining decision and returns the step records.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step and returns its error.
    pub fn run(&mut self) -> Result<Vec<StepResult>, SimError> {
        info!(
            steps = self.config.steps,
            seconds_per_step = self.config.seconds_per_step,
            initial_temperature = self.building.initial_temperature(),
            heat_mass_capacity = self.building.heat_mass_capacity(),
            heat_transmission = self.building.heat_transmission(),
            floor_area = self.building.conditioned_floor_area(),
            "simulation started"
        );
        let mut results = Vec::with_capacity(self.config.steps);
        while let Some((step, start_s)) = self.clock.tick() {
            results.push(self.step(step, start_s)?);
        }
        info!(
            seconds = self.clock.elapsed_seconds(),
            temperature = self.building.current_temperature(),
            cost = self.rewards.total_cost(self.building.hvac()),
            "simulation finished"
        );
        Ok(results)
    }

    /// Starts a new episode: resets the building and rewinds the clock.
    pub fn reset(&mut self) {
        self.building.reset();
        self.clock = Clock::new(self.config.steps, self.config.seconds_per_step);
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn rewards(&self) -> &RewardEngine {
        &self.rewards
    }

    /// Detaches the building's sample tracker, if one is attached.
    pub fn take_samples(&mut self) -> Option<SampleTracker> {
        self.building.take_tracker()
    }
}
