//! Config-driven construction of the building, weather and reward engine, and
//! a one-call scenario runner used by the binary and integration tests.

use tracing::info;

use crate::config::ScenarioConfig;
use crate::devices::{HvacCommand, HvacParameters, HvacUnit};
use crate::error::SimError;
use crate::sim::building::Building;
use crate::sim::controller::{Controller, FixedController, ThermostatController};
use crate::sim::engine::Engine;
use crate::sim::kpi::{HvacSummary, KpiReport};
use crate::sim::reward::{ComfortBand, EnergyPrices, RewardEngine, RewardStrategy};
use crate::sim::tracker::SampleTracker;
use crate::sim::types::{SimConfig, StepResult};
use crate::weather::{DiurnalProfile, OutsideTemperature};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub results: Vec<StepResult>,
    pub kpi: KpiReport,
    pub summary: HvacSummary,
    /// Per-second samples, when `building.track_samples` is set.
    pub samples: Option<SampleTracker>,
}

pub fn build_hvac(cfg: &ScenarioConfig) -> Result<HvacUnit, SimError> {
    let h = &cfg.hvac;
    HvacUnit::with_parameters(HvacParameters {
        max_heating_power_w: h.max_heating_power_w,
        max_cooling_power_w: h.max_cooling_power_w,
        ramp_up_seconds: h.ramp_up_seconds,
        ramp_down_seconds: h.ramp_down_seconds,
        heating_electric_fraction: h.heating_electric_fraction,
    })
}

/// Builds the building (and its HVAC unit) described by `cfg`.
///
/// # Errors
///
/// Returns [`SimError::InvalidConfiguration`] if any physical parameter is rejected.
pub fn build_building(cfg: &ScenarioConfig) -> Result<Building, SimError> {
    let b = &cfg.building;
    let tracker = b.track_samples.then(SampleTracker::new);
    Building::new(
        build_hvac(cfg)?,
        b.heat_mass_capacity,
        b.heat_transmission,
        b.initial_temperature,
        b.conditioned_floor_area,
        tracker,
    )
}

/// Builds the outside temperature profile. Diurnal noise is seeded from
/// `simulation.seed`.
///
/// # Errors
///
/// Returns [`SimError::InvalidConfiguration`] for an unknown profile name or
/// invalid profile parameters.
pub fn build_weather(cfg: &ScenarioConfig) -> Result<OutsideTemperature, SimError> {
    let w = &cfg.weather;
    match w.profile.as_str() {
        "hourly" => OutsideTemperature::hourly(&w.hourly_c),
        "constant" => OutsideTemperature::constant(w.constant_c),
        "diurnal" => Ok(OutsideTemperature::Diurnal(DiurnalProfile::new(
            w.mean_c,
            w.amplitude_c,
            w.coldest_hour,
            w.noise_std,
            cfg.simulation.seed,
        )?)),
        other => Err(SimError::config(
            "weather.profile",
            format!("unknown profile \"{other}\""),
        )),
    }
}

/// Builds the reward engine from `[prices]` and `[reward]`.
///
/// # Errors
///
/// Returns [`SimError::InvalidConfiguration`] for an unknown strategy name.
pub fn build_rewards(cfg: &ScenarioConfig) -> Result<RewardEngine, SimError> {
    let prices = EnergyPrices {
        dollars_per_kwh: cfg.prices.dollars_per_kwh,
        dollars_per_dth: cfg.prices.dollars_per_dth,
    };
    let setpoint = cfg.reward.setpoint;
    let strategy = match cfg.reward.strategy.as_str() {
        "band_cost" => RewardStrategy::band_cost(),
        "max_cost_normalized" => RewardStrategy::max_cost_normalized(),
        "directional" => RewardStrategy::Directional { setpoint },
        "deviation" => RewardStrategy::Deviation {
            setpoint,
            tolerance: 1.0,
            scale: 10.0,
            floor: 0.0,
        },
        other => {
            return Err(SimError::config(
                "reward.strategy",
                format!("unknown strategy \"{other}\""),
            ));
        }
    };
    Ok(RewardEngine::new(strategy, prices))
}

fn fixed_command(name: &str) -> Option<HvacCommand> {
    match name {
        "off" => Some(HvacCommand::Off),
        "heat" => Some(HvacCommand::Heat),
        "cool" => Some(HvacCommand::Cool),
        _ => None,
    }
}

/// Runs the scenario end to end with the configured controller.
///
/// # Errors
///
/// Returns the first [`SimError`] raised while building components or
/// stepping the building.
pub fn run_scenario(cfg: &ScenarioConfig) -> Result<SimulationResult, SimError> {
    let s = &cfg.simulation;
    let sim_config = SimConfig::new(s.steps, s.seconds_per_step, s.seed)?;
    let building = build_building(cfg)?;
    let weather = build_weather(cfg)?;
    let rewards = build_rewards(cfg)?;

    info!(
        controller = %s.controller,
        strategy = %cfg.reward.strategy,
        profile = %cfg.weather.profile,
        "running scenario"
    );

    let t = &cfg.thermostat;
    let band = rewards.strategy().comfort_band().unwrap_or(ComfortBand::new(
        t.desired_temperature - t.temperature_delta,
        t.desired_temperature + t.temperature_delta,
    ));

    if s.controller == "thermostat" {
        let controller = ThermostatController::new(t.desired_temperature, t.temperature_delta);
        run_with(sim_config, building, weather, controller, rewards, band)
    } else if let Some(command) = fixed_command(&s.controller) {
        run_with(
            sim_config,
            building,
            weather,
            FixedController(command),
            rewards,
            band,
        )
    } else {
        Err(SimError::config(
            "simulation.controller",
            format!("unknown controller \"{}\"", s.controller),
        ))
    }
}

fn run_with<C: Controller>(
    sim_config: SimConfig,
    building: Building,
    weather: OutsideTemperature,
    controller: C,
    rewards: RewardEngine,
    band: ComfortBand,
) -> Result<SimulationResult, SimError> {
    let mut engine = Engine::new(sim_config, building, weather, controller, rewards);
    let results = engine.run()?;
    let kpi = KpiReport::from_results(&results, band);
    let summary = HvacSummary::from_building(engine.building(), engine.rewards().prices());
    let samples = engine.take_samples();
    Ok(SimulationResult {
        results,
        kpi,
        summary,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::export::write_csv;

    fn short(controller: &str) -> ScenarioConfig {
        let mut cfg = ScenarioConfig::winter_day();
        cfg.simulation.steps = 60;
        cfg.simulation.controller = controller.to_string();
        cfg
    }

    #[test]
    fn same_scenario_and_seed_is_deterministic() {
        let mut cfg = short("thermostat");
        cfg.weather.profile = "diurnal".to_string();
        cfg.simulation.seed = 777;

        let run_a = run_scenario(&cfg).expect("first run");
        let run_b = run_scenario(&cfg).expect("second run");

        let mut out_a = Vec::new();
        write_csv(&run_a.results, &mut out_a).expect("first export should succeed");
        let mut out_b = Vec::new();
        write_csv(&run_b.results, &mut out_b).expect("second export should succeed");

        assert_eq!(out_a, out_b);
    }

    #[test]
    fn fixed_controllers_dispatch() {
        for (name, heating, cooling) in [("off", false, false), ("heat", true, false), ("cool", false, true)] {
            let run = run_scenario(&short(name)).expect("run succeeds");
            assert!(
                run.results
                    .iter()
                    .all(|r| r.heating_on == heating && r.cooling_on == cooling),
                "controller {name}"
            );
        }
    }

    #[test]
    fn unknown_controller_is_rejected() {
        let err = run_scenario(&short("greedy")).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfiguration { field: "simulation.controller", .. }
        ));
    }

    #[test]
    fn samples_follow_track_flag() {
        let run = run_scenario(&short("off")).expect("run succeeds");
        assert_eq!(run.samples.as_ref().map(SampleTracker::len), Some(60 * 30));

        let mut cfg = short("off");
        cfg.building.track_samples = false;
        let run = run_scenario(&cfg).expect("run succeeds");
        assert!(run.samples.is_none());
    }

    #[test]
    fn bad_building_parameters_surface_as_errors() {
        let mut cfg = short("off");
        cfg.building.heat_mass_capacity = 0.0;
        assert!(run_scenario(&cfg).is_err());
    }

    #[test]
    fn strategy_names_map_to_variants() {
        let mut cfg = ScenarioConfig::winter_day();
        cfg.reward.strategy = "directional".to_string();
        cfg.reward.setpoint = 21.0;
        let rewards = build_rewards(&cfg).expect("known strategy");
        assert_eq!(*rewards.strategy(), RewardStrategy::Directional { setpoint: 21.0 });

        cfg.reward.strategy = "cheapest".to_string();
        assert!(build_rewards(&cfg).is_err());
    }
}
