//! End-of-run equipment summary and post-hoc KPIs.

use std::fmt;

use super::building::Building;
use super::reward::{ComfortBand, EnergyPrices};
use super::types::StepResult;

/// Equipment usage and cost totals read from a building's HVAC meters.
#[derive(Debug, Clone, PartialEq)]
pub struct HvacSummary {
    pub times_heating_turned_on: u32,
    pub times_cooling_turned_on: u32,
    pub current_temperature: f64,
    pub electric_kilowatt_hours: f64,
    pub gas_dth: f64,
    pub total_time_s: u64,
    pub heating_on_s: u64,
    pub cooling_on_s: u64,
    pub electric_cost: f64,
    pub gas_cost: f64,
}

impl HvacSummary {
    pub fn from_building(building: &Building, prices: &EnergyPrices) -> Self {
        let hvac = building.hvac();
        Self {
            times_heating_turned_on: hvac.times_heating_turned_on(),
            times_cooling_turned_on: hvac.times_cooling_turned_on(),
            current_temperature: building.current_temperature(),
            electric_kilowatt_hours: hvac.electric_kilowatt_hours(),
            gas_dth: hvac.gas_dth(),
            total_time_s: hvac.total_time_in_seconds(),
            heating_on_s: hvac.total_duration_heating_on(),
            cooling_on_s: hvac.total_duration_cooling_on(),
            electric_cost: prices.electric_cost(hvac),
            gas_cost: prices.gas_cost(hvac),
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.electric_cost + self.gas_cost
    }
}

impl fmt::Display for HvacSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- HVAC Summary ---")?;
        writeln!(f, "Furnace turned on:     {}", self.times_heating_turned_on)?;
        writeln!(f, "AC turned on:          {}", self.times_cooling_turned_on)?;
        writeln!(f, "Current temperature:   {:.2} C", self.current_temperature)?;
        writeln!(f, "Electric energy:       {:.4} kWh", self.electric_kilowatt_hours)?;
        writeln!(f, "Gas energy:            {:.6} DTH", self.gas_dth)?;
        writeln!(f, "Total time:            {} s", self.total_time_s)?;
        writeln!(f, "Heating on:            {} s", self.heating_on_s)?;
        writeln!(f, "Cooling on:            {} s", self.cooling_on_s)?;
        writeln!(f, "Electric cost:         ${:.4}", self.electric_cost)?;
        write!(f, "Gas cost:              ${:.4}", self.gas_cost)
    }
}

/// Aggregate indicators over a complete run.
///
/// Computed post-hoc from `&[StepResult]` so the reported numbers always
/// agree with the step records.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiReport {
    /// Sum of per-step rewards.
    pub total_reward: f64,
    /// Share of steps ending inside the comfort band (0 to 100).
    pub comfort_pct: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub mean_temperature: f64,
    /// Cumulative cost at the final step ($).
    pub total_cost: f64,
    /// Number of steps with heating commanded on.
    pub heating_steps: usize,
    /// Number of steps with cooling commanded on.
    pub cooling_steps: usize,
}

impl KpiReport {
    /// Computes all KPIs from the step records.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation step results
    /// * `band` - Comfort band used for the compliance percentage
    pub fn from_results(results: &[StepResult], band: ComfortBand) -> Self {
        if results.is_empty() {
            return Self {
                total_reward: 0.0,
                comfort_pct: 0.0,
                min_temperature: 0.0,
                max_temperature: 0.0,
                mean_temperature: 0.0,
                total_cost: 0.0,
                heating_steps: 0,
                cooling_steps: 0,
            };
        }

        let mut total_reward = 0.0;
        let mut in_band = 0_usize;
        let mut min_t = f64::INFINITY;
        let mut max_t = f64::NEG_INFINITY;
        let mut sum_t = 0.0;
        let mut heating_steps = 0;
        let mut cooling_steps = 0;

        for r in results {
            total_reward += r.reward;
            let t = r.building_temperature;
            if band.contains(t) {
                in_band += 1;
            }
            min_t = min_t.min(t);
            max_t = max_t.max(t);
            sum_t += t;
            if r.heating_on {
                heating_steps += 1;
            }
            if r.cooling_on {
                cooling_steps += 1;
            }
        }

        let n = results.len() as f64;
        Self {
            total_reward,
            comfort_pct: 100.0 * in_band as f64 / n,
            min_temperature: min_t,
            max_temperature: max_t,
            mean_temperature: sum_t / n,
            total_cost: results.last().map(StepResult::total_cost).unwrap_or_default(),
            heating_steps,
            cooling_steps,
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Total reward:          {:.3}", self.total_reward)?;
        writeln!(f, "Time in comfort band:  {:.1}%", self.comfort_pct)?;
        writeln!(
            f,
            "Temperature:           min {:.2} C / mean {:.2} C / max {:.2} C",
            self.min_temperature, self.mean_temperature, self.max_temperature
        )?;
        writeln!(f, "Total cost:            ${:.4}", self.total_cost)?;
        write!(
            f,
            "Steps heating/cooling: {}/{}",
            self.heating_steps, self.cooling_steps
        )
    }
}
