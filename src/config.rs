//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::weather::{SUMMER_DAY_C, WINTER_DAY_C};

/// Controller names accepted by `simulation.controller`.
pub const CONTROLLERS: &[&str] = &["thermostat", "off", "heat", "cool"];

/// Reward strategy names accepted by `reward.strategy`.
pub const STRATEGIES: &[&str] = &["band_cost", "max_cost_normalized", "directional", "deviation"];

/// Weather profile names accepted by `weather.profile`.
pub const PROFILES: &[&str] = &["hourly", "constant", "diurnal"];

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the winter-day scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::winter_day`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Decision loop timing and controller choice.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Furnace and air conditioner parameters.
    #[serde(default)]
    pub hvac: HvacConfig,
    /// Thermal envelope parameters.
    #[serde(default)]
    pub building: BuildingConfig,
    #[serde(default)]
    pub prices: PriceConfig,
    #[serde(default)]
    pub reward: RewardConfig,
    /// Baseline thermostat thresholds.
    #[serde(default)]
    pub thermostat: ThermostatConfig,
    /// Outside temperature profile.
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// Decision loop timing and controller choice.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of controller decisions (must be > 0).
    pub steps: usize,
    /// Simulated seconds per decision (must be > 0).
    pub seconds_per_step: u32,
    /// Master random seed.
    pub seed: u64,
    /// Controller type: `"thermostat"`, `"off"`, `"heat"` or `"cool"`.
    pub controller: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 2880,
            seconds_per_step: 30,
            seed: 42,
            controller: "thermostat".to_string(),
        }
    }
}

/// Furnace and air conditioner parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HvacConfig {
    /// Maximum heating power (W).
    pub max_heating_power_w: f64,
    /// Maximum cooling power (W, positive magnitude).
    pub max_cooling_power_w: f64,
    pub ramp_up_seconds: u32,
    pub ramp_down_seconds: u32,
    /// Share of heating power drawn as electricity (0.0–1.0).
    pub heating_electric_fraction: f64,
}

impl Default for HvacConfig {
    fn default() -> Self {
        Self {
            max_heating_power_w: 20_000.0,
            max_cooling_power_w: 10_500.0,
            ramp_up_seconds: 60,
            ramp_down_seconds: 90,
            heating_electric_fraction: 0.03,
        }
    }
}

/// Thermal envelope parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingConfig {
    /// Heat mass capacity C (J/°C).
    pub heat_mass_capacity: f64,
    /// Heat transmission U to the outside (W/°C).
    pub heat_transmission: f64,
    /// Indoor temperature at the start of every run (°C).
    pub initial_temperature: f64,
    /// Conditioned floor area (m²).
    pub conditioned_floor_area: f64,
    /// Record one sample per simulated second.
    pub track_samples: bool,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            heat_mass_capacity: 16_500.0 * 100.0,
            heat_transmission: 500.0,
            initial_temperature: 22.0,
            conditioned_floor_area: 100.0,
            track_samples: true,
        }
    }
}

/// Energy tariffs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    pub dollars_per_kwh: f64,
    pub dollars_per_dth: f64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            dollars_per_kwh: crate::sim::reward::DEFAULT_DOLLARS_PER_KWH,
            dollars_per_dth: crate::sim::reward::DEFAULT_DOLLARS_PER_DTH,
        }
    }
}

/// Reward strategy selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewardConfig {
    /// One of [`STRATEGIES`].
    pub strategy: String,
    /// Setpoint used by `directional` and `deviation` (°C).
    pub setpoint: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            strategy: "band_cost".to_string(),
            setpoint: crate::sim::reward::DEFAULT_SETPOINT_C,
        }
    }
}

/// Baseline thermostat thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThermostatConfig {
    pub desired_temperature: f64,
    /// Half-width of the dead band (°C, > 0).
    pub temperature_delta: f64,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            desired_temperature: 20.0,
            temperature_delta: 2.0,
        }
    }
}

/// Outside temperature profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    /// One of [`PROFILES`].
    pub profile: String,
    /// Temperature for the `constant` profile (°C).
    pub constant_c: f64,
    /// Hourly table for the `hourly` profile (°C, one entry per hour). When the
    /// last entry equals the first the table repeats every `len - 1` hours.
    pub hourly_c: Vec<f64>,
    /// Daily mean for the `diurnal` profile (°C).
    pub mean_c: f64,
    /// Half the day/night swing for the `diurnal` profile (°C).
    pub amplitude_c: f64,
    /// Hour of the daily minimum for the `diurnal` profile.
    pub coldest_hour: f64,
    /// Hourly noise standard deviation for the `diurnal` profile (°C).
    pub noise_std: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            profile: "hourly".to_string(),
            constant_c: 0.0,
            hourly_c: WINTER_DAY_C.to_vec(),
            mean_c: 0.0,
            amplitude_c: 5.0,
            coldest_hour: 5.0,
            noise_std: 0.5,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.steps"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn check_positive(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ConfigError::new(field, format!("must be > 0, got {value}")));
    }
}

fn check_non_negative(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(ConfigError::new(field, format!("must be >= 0, got {value}")));
    }
}

fn check_one_of(errors: &mut Vec<ConfigError>, field: &str, value: &str, allowed: &[&str]) {
    if !allowed.contains(&value) {
        errors.push(ConfigError::new(
            field,
            format!("must be one of {}, got \"{value}\"", allowed.join(", ")),
        ));
    }
}

impl ScenarioConfig {
    /// Returns the winter-day scenario: one day of 30-second thermostat
    /// decisions against a cold hourly profile.
    pub fn winter_day() -> Self {
        Self::default()
    }

    /// Returns the summer-day preset: hot hourly profile, building starts warm.
    pub fn summer_day() -> Self {
        Self {
            building: BuildingConfig {
                initial_temperature: 24.0,
                ..BuildingConfig::default()
            },
            weather: WeatherConfig {
                hourly_c: SUMMER_DAY_C.to_vec(),
                ..WeatherConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the mild-constant preset: short run at a steady 12 °C outside.
    pub fn mild_constant() -> Self {
        Self {
            simulation: SimulationConfig {
                steps: 240,
                ..SimulationConfig::default()
            },
            reward: RewardConfig {
                strategy: "deviation".to_string(),
                ..RewardConfig::default()
            },
            weather: WeatherConfig {
                profile: "constant".to_string(),
                constant_c: 12.0,
                ..WeatherConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["winter_day", "summer_day", "mild_constant"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "winter_day" => Ok(Self::winter_day()),
            "summer_day" => Ok(Self::summer_day()),
            "mild_constant" => Ok(Self::mild_constant()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.steps == 0 {
            errors.push(ConfigError::new("simulation.steps", "must be > 0"));
        }
        if s.seconds_per_step == 0 {
            errors.push(ConfigError::new("simulation.seconds_per_step", "must be > 0"));
        }
        check_one_of(&mut errors, "simulation.controller", &s.controller, CONTROLLERS);

        let h = &self.hvac;
        check_non_negative(&mut errors, "hvac.max_heating_power_w", h.max_heating_power_w);
        check_non_negative(&mut errors, "hvac.max_cooling_power_w", h.max_cooling_power_w);
        if !(0.0..=1.0).contains(&h.heating_electric_fraction) {
            errors.push(ConfigError::new(
                "hvac.heating_electric_fraction",
                "must be in [0.0, 1.0]",
            ));
        }

        let b = &self.building;
        check_positive(&mut errors, "building.heat_mass_capacity", b.heat_mass_capacity);
        check_positive(&mut errors, "building.heat_transmission", b.heat_transmission);
        check_positive(&mut errors, "building.conditioned_floor_area", b.conditioned_floor_area);
        if !b.initial_temperature.is_finite() {
            errors.push(ConfigError::new("building.initial_temperature", "must be finite"));
        }

        check_non_negative(&mut errors, "prices.dollars_per_kwh", self.prices.dollars_per_kwh);
        check_non_negative(&mut errors, "prices.dollars_per_dth", self.prices.dollars_per_dth);

        check_one_of(&mut errors, "reward.strategy", &self.reward.strategy, STRATEGIES);
        if !self.reward.setpoint.is_finite() {
            errors.push(ConfigError::new("reward.setpoint", "must be finite"));
        }

        let t = &self.thermostat;
        if !t.desired_temperature.is_finite() {
            errors.push(ConfigError::new("thermostat.desired_temperature", "must be finite"));
        }
        check_positive(&mut errors, "thermostat.temperature_delta", t.temperature_delta);

        let w = &self.weather;
        check_one_of(&mut errors, "weather.profile", &w.profile, PROFILES);
        match w.profile.as_str() {
            "hourly" => {
                if w.hourly_c.is_empty() {
                    errors.push(ConfigError::new("weather.hourly_c", "must not be empty"));
                } else if w.hourly_c.iter().any(|v| !v.is_finite()) {
                    errors.push(ConfigError::new("weather.hourly_c", "entries must be finite"));
                }
            }
            "constant" => {
                if !w.constant_c.is_finite() {
                    errors.push(ConfigError::new("weather.constant_c", "must be finite"));
                }
            }
            "diurnal" => {
                check_non_negative(&mut errors, "weather.amplitude_c", w.amplitude_c);
                check_non_negative(&mut errors, "weather.noise_std", w.noise_std);
                if !(0.0..=24.0).contains(&w.coldest_hour) {
                    errors.push(ConfigError::new("weather.coldest_hour", "must be in [0, 24]"));
                }
            }
            _ => {}
        }

        errors
    }
}
