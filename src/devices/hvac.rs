use std::fmt;

use tracing::{debug, warn};

use crate::error::{SimError, require_non_negative};

/// Joules in one British thermal unit.
pub const JOULES_PER_BTU: f64 = 1055.05585;

/// British thermal units in one decatherm.
pub const BTU_PER_DTH: f64 = 1_000_000.0;

/// Converts a constant power draw over a duration into kilowatt-hours.
///
/// `kWh = W * seconds / 3600 / 1000`
pub fn watts_to_kwh(watts: f64, seconds: f64) -> f64 {
    watts * seconds / 3600.0 / 1000.0
}

/// Converts a constant power draw over a duration into decatherms of gas.
pub fn watts_to_dth(watts: f64, seconds: f64) -> f64 {
    watts * seconds / JOULES_PER_BTU / BTU_PER_DTH
}

/// Tri-state command accepted by the HVAC unit once per control tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HvacCommand {
    /// Both heating and cooling commanded off.
    #[default]
    Off,
    /// Heating commanded on (forces cooling off).
    Heat,
    /// Cooling commanded on (forces heating off).
    Cool,
}

impl fmt::Display for HvacCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            HvacCommand::Off => "off",
            HvacCommand::Heat => "heat",
            HvacCommand::Cool => "cool",
        })
    }
}

/// Equipment state derived from the commanded mode and the current ramp level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacState {
    Off,
    HeatingRampUp,
    HeatingSteady,
    HeatingRampDown,
    CoolingRampUp,
    CoolingSteady,
    CoolingRampDown,
}

/// Fixed capacity and ramp parameters of an HVAC unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HvacParameters {
    /// Maximum heat delivered by the furnace (W, >= 0).
    pub max_heating_power_w: f64,
    /// Maximum heat removed by the air conditioner (W, positive magnitude).
    pub max_cooling_power_w: f64,
    /// Seconds for power to climb from zero to max once commanded on.
    pub ramp_up_seconds: u32,
    /// Seconds for power to fall from max to zero once commanded off.
    pub ramp_down_seconds: u32,
    /// Share of heating power drawn as electricity by the blower (0.0 to 1.0).
    /// The rest is burned as gas.
    pub heating_electric_fraction: f64,
}

impl Default for HvacParameters {
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

impl HvacParameters {
    /// Validates every field, returning the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for negative or non-finite
    /// capacities, or an electric fraction outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), SimError> {
        require_non_negative("max_heating_power_w", self.max_heating_power_w)?;
        require_non_negative("max_cooling_power_w", self.max_cooling_power_w)?;
        let fraction = self.heating_electric_fraction;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(SimError::config(
                "heating_electric_fraction",
                format!("must be in [0.0, 1.0], got {fraction}"),
            ));
        }
        Ok(())
    }
}

/// A furnace plus air conditioner with ramped power output and energy meters.
///
/// Heating and cooling are never commanded on together. Power outputs are
/// non-negative magnitudes; the building decides the sign (heating adds heat,
/// cooling removes it).
///
/// # Examples
///
/// ```
/// use hvac_sim::devices::hvac::HvacUnit;
///
/// let mut hvac = HvacUnit::new(10_000.0, 5_000.0)?;
/// hvac.turn_heating_on();
/// hvac.simulate_one_second();
/// assert!(hvac.heating_on());
/// assert!(hvac.last_interval_heating_power() > 0.0);
/// # Ok::<(), hvac_sim::error::SimError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HvacUnit {
    params: HvacParameters,

    heating_on: bool,
    cooling_on: bool,

    heating_power_w: f64,
    cooling_power_w: f64,

    times_heating_turned_on: u32,
    times_cooling_turned_on: u32,
    total_duration_heating_on: u64,
    total_duration_cooling_on: u64,

    electric_kilowatt_hours: f64,
    gas_dth: f64,
    delivered_joules: f64,
    total_time_in_seconds: u64,
}

impl HvacUnit {
    /// Creates a unit with the given capacities and default ramp parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if either capacity is
    /// negative or not finite.
    pub fn new(max_heating_power_w: f64, max_cooling_power_w: f64) -> Result<Self, SimError> {
        Self::with_parameters(HvacParameters {
            max_heating_power_w,
            max_cooling_power_w,
            ..HvacParameters::default()
        })
    }

    /// Creates a unit from a full parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if the parameters are invalid.
    pub fn with_parameters(params: HvacParameters) -> Result<Self, SimError> {
        params.validate()?;
        Ok(Self {
            params,
            heating_on: false,
            cooling_on: false,
            heating_power_w: 0.0,
            cooling_power_w: 0.0,
            times_heating_turned_on: 0,
            times_cooling_turned_on: 0,
            total_duration_heating_on: 0,
            total_duration_cooling_on: 0,
            electric_kilowatt_hours: 0.0,
            gas_dth: 0.0,
            delivered_joules: 0.0,
            total_time_in_seconds: 0,
        })
    }

    pub fn parameters(&self) -> &HvacParameters {
        &self.params
    }

    /// Commands heating on. Cooling, if running or still coasting, is cut immediately.
    pub fn turn_heating_on(&mut self) {
        if self.heating_on {
            return;
        }
        if self.cooling_on || self.cooling_power_w > 0.0 {
            warn!(
                cooling_power_w = self.cooling_power_w,
                "heating requested while cooling active; forcing cooling off"
            );
            self.cooling_on = false;
            self.cooling_power_w = 0.0;
        }
        self.heating_on = true;
        self.times_heating_turned_on += 1;
        debug!(
            t = self.total_time_in_seconds,
            count = self.times_heating_turned_on,
            "heating on"
        );
    }

    /// Commands heating off. Power ramps down over the following seconds.
    pub fn turn_heating_off(&mut self) {
        if self.heating_on {
            self.heating_on = false;
            debug!(t = self.total_time_in_seconds, "heating off");
        }
    }

    /// Commands cooling on. Heating, if running or still coasting, is cut immediately.
    pub fn turn_cooling_on(&mut self) {
        if self.cooling_on {
            return;
        }
        if self.heating_on || self.heating_power_w > 0.0 {
            warn!(
                heating_power_w = self.heating_power_w,
                "cooling requested while heating active; forcing heating off"
            );
            self.heating_on = false;
            self.heating_power_w = 0.0;
        }
        self.cooling_on = true;
        self.times_cooling_turned_on += 1;
        debug!(
            t = self.total_time_in_seconds,
            count = self.times_cooling_turned_on,
            "cooling on"
        );
    }

    /// Commands cooling off. Power ramps down over the following seconds.
    pub fn turn_cooling_off(&mut self) {
        if self.cooling_on {
            self.cooling_on = false;
            debug!(t = self.total_time_in_seconds, "cooling off");
        }
    }

    /// Commands both modes off.
    pub fn turn_hvac_off(&mut self) {
        self.turn_heating_off();
        self.turn_cooling_off();
    }

    /// Applies a tri-state command.
    pub fn apply(&mut self, command: HvacCommand) {
        match command {
            HvacCommand::Off => self.turn_hvac_off(),
            HvacCommand::Heat => self.turn_heating_on(),
            HvacCommand::Cool => self.turn_cooling_on(),
        }
    }

    /// Advances ramp state and energy meters by one simulated second.
    pub fn simulate_one_second(&mut self) {
        let p = &self.params;
        let heating_target = if self.heating_on { p.max_heating_power_w } else { 0.0 };
        let heating_rate = if self.heating_on {
            ramp_rate(p.max_heating_power_w, p.ramp_up_seconds)
        } else {
            ramp_rate(p.max_heating_power_w, p.ramp_down_seconds)
        };
        self.heating_power_w = ramp_toward(self.heating_power_w, heating_target, heating_rate);

        let cooling_target = if self.cooling_on { p.max_cooling_power_w } else { 0.0 };
        let cooling_rate = if self.cooling_on {
            ramp_rate(p.max_cooling_power_w, p.ramp_up_seconds)
        } else {
            ramp_rate(p.max_cooling_power_w, p.ramp_down_seconds)
        };
        self.cooling_power_w = ramp_toward(self.cooling_power_w, cooling_target, cooling_rate);

        self.total_time_in_seconds += 1;
        if self.heating_on {
            self.total_duration_heating_on += 1;
        }
        if self.cooling_on {
            self.total_duration_cooling_on += 1;
        }

        let fraction = p.heating_electric_fraction;
        let electric_w = self.heating_power_w * fraction + self.cooling_power_w;
        let gas_w = self.heating_power_w * (1.0 - fraction);
        self.electric_kilowatt_hours += watts_to_kwh(electric_w, 1.0);
        self.gas_dth += watts_to_dth(gas_w, 1.0);
        self.delivered_joules += self.heating_power_w + self.cooling_power_w;
    }

    /// Turns everything off and zeroes counters, meters, and ramp state.
    pub fn reset(&mut self) {
        *self = Self {
            params: self.params,
            heating_on: false,
            cooling_on: false,
            heating_power_w: 0.0,
            cooling_power_w: 0.0,
            times_heating_turned_on: 0,
            times_cooling_turned_on: 0,
            total_duration_heating_on: 0,
            total_duration_cooling_on: 0,
            electric_kilowatt_hours: 0.0,
            gas_dth: 0.0,
            delivered_joules: 0.0,
            total_time_in_seconds: 0,
        };
    }

    pub fn heating_on(&self) -> bool {
        self.heating_on
    }

    pub fn cooling_on(&self) -> bool {
        self.cooling_on
    }

    /// `true` while heating is commanded off but the furnace is still delivering heat.
    pub fn heating_shutting_down(&self) -> bool {
        !self.heating_on && self.heating_power_w > 0.0
    }

    /// `true` while cooling is commanded off but the compressor is still running down.
    pub fn cooling_shutting_down(&self) -> bool {
        !self.cooling_on && self.cooling_power_w > 0.0
    }

    /// Current equipment state.
    pub fn state(&self) -> HvacState {
        let p = &self.params;
        if self.heating_on {
            if self.heating_power_w < p.max_heating_power_w {
                HvacState::HeatingRampUp
            } else {
                HvacState::HeatingSteady
            }
        } else if self.cooling_on {
            if self.cooling_power_w < p.max_cooling_power_w {
                HvacState::CoolingRampUp
            } else {
                HvacState::CoolingSteady
            }
        } else if self.heating_power_w > 0.0 {
            HvacState::HeatingRampDown
        } else if self.cooling_power_w > 0.0 {
            HvacState::CoolingRampDown
        } else {
            HvacState::Off
        }
    }

    /// Heat delivered during the last simulated second (W).
    pub fn last_interval_heating_power(&self) -> f64 {
        self.heating_power_w
    }

    /// Heat removed during the last simulated second (W, positive magnitude).
    pub fn last_interval_cooling_power(&self) -> f64 {
        self.cooling_power_w
    }

    /// Net thermal power into the building: `+heating`, `-cooling` (W).
    pub fn signed_power(&self) -> f64 {
        self.heating_power_w - self.cooling_power_w
    }

    pub fn max_heating_power(&self) -> f64 {
        self.params.max_heating_power_w
    }

    pub fn max_cooling_power(&self) -> f64 {
        self.params.max_cooling_power_w
    }

    /// Gas burn rate at full heating output (W).
    pub fn max_heating_gas_power(&self) -> f64 {
        self.params.max_heating_power_w * (1.0 - self.params.heating_electric_fraction)
    }

    /// Blower electric draw at full heating output (W).
    pub fn max_heating_electric_power(&self) -> f64 {
        self.params.max_heating_power_w * self.params.heating_electric_fraction
    }

    /// Cumulative mean of delivered HVAC power since the last reset (W).
    ///
    /// Heating and cooling both count as positive magnitudes. Returns `0.0`
    /// before the first simulated second.
    pub fn average_watts_per_second(&self) -> f64 {
        if self.total_time_in_seconds == 0 {
            0.0
        } else {
            self.delivered_joules / self.total_time_in_seconds as f64
        }
    }

    pub fn times_heating_turned_on(&self) -> u32 {
        self.times_heating_turned_on
    }

    pub fn times_cooling_turned_on(&self) -> u32 {
        self.times_cooling_turned_on
    }

    /// Seconds heating has been commanded on since the last reset.
    pub fn total_duration_heating_on(&self) -> u64 {
        self.total_duration_heating_on
    }

    /// Seconds cooling has been commanded on since the last reset.
    pub fn total_duration_cooling_on(&self) -> u64 {
        self.total_duration_cooling_on
    }

    pub fn electric_kilowatt_hours(&self) -> f64 {
        self.electric_kilowatt_hours
    }

    pub fn gas_dth(&self) -> f64 {
        self.gas_dth
    }

    pub fn total_time_in_seconds(&self) -> u64 {
        self.total_time_in_seconds
    }
}

/// Power change per second for a ramp of `seconds` to `max`.
/// A zero-length ramp switches instantly.
fn ramp_rate(max: f64, seconds: u32) -> f64 {
    if seconds == 0 { max } else { max / f64::from(seconds) }
}

/// Moves `current` one rate-step toward `target`, snapping when within one step.
fn ramp_toward(current: f64, target: f64, rate: f64) -> f64 {
    let gap = target - current;
    // absorb accumulated rounding so the ramp lands on target in whole seconds
    if gap.abs() <= rate * (1.0 + 1e-9) {
        target
    } else if gap > 0.0 {
        current + rate
    } else {
        current - rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(max_heat: f64, max_cool: f64) -> HvacUnit {
        HvacUnit::with_parameters(HvacParameters {
            max_heating_power_w: max_heat,
            max_cooling_power_w: max_cool,
            ramp_up_seconds: 0,
            ramp_down_seconds: 0,
            heating_electric_fraction: 0.0,
        })
        .expect("valid parameters")
    }

    #[test]
    fn new_unit_is_off() {
        let hvac = HvacUnit::new(10_000.0, 5_000.0).expect("valid");
        assert!(!hvac.heating_on());
        assert!(!hvac.cooling_on());
        assert_eq!(hvac.state(), HvacState::Off);
        assert_eq!(hvac.total_time_in_seconds(), 0);
        assert_eq!(hvac.average_watts_per_second(), 0.0);
    }

    #[test]
    fn negative_capacity_is_rejected() {
        assert!(matches!(
            HvacUnit::new(-1.0, 5_000.0),
            Err(SimError::InvalidConfiguration { field: "max_heating_power_w", .. })
        ));
        assert!(HvacUnit::new(1.0, -5_000.0).is_err());
        assert!(HvacUnit::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn electric_fraction_out_of_range_is_rejected() {
        let params = HvacParameters {
            heating_electric_fraction: 1.5,
            ..HvacParameters::default()
        };
        assert!(HvacUnit::with_parameters(params).is_err());
    }

    #[test]
    fn cooling_on_forces_heating_off() {
        let mut hvac = HvacUnit::new(10_000.0, 5_000.0).expect("valid");
        hvac.turn_heating_on();
        hvac.simulate_one_second();
        hvac.turn_cooling_on();
        assert!(hvac.cooling_on());
        assert!(!hvac.heating_on());
        assert_eq!(hvac.last_interval_heating_power(), 0.0);
        assert!(!hvac.heating_shutting_down());
    }

    #[test]
    fn heating_on_forces_cooling_off() {
        let mut hvac = HvacUnit::new(10_000.0, 5_000.0).expect("valid");
        hvac.turn_cooling_on();
        hvac.simulate_one_second();
        hvac.turn_heating_on();
        assert!(hvac.heating_on());
        assert!(!hvac.cooling_on());
        assert_eq!(hvac.last_interval_cooling_power(), 0.0);
    }

    #[test]
    fn turn_on_counts_only_transitions() {
        let mut hvac = HvacUnit::new(10_000.0, 5_000.0).expect("valid");
        hvac.turn_heating_on();
        hvac.turn_heating_on();
        assert_eq!(hvac.times_heating_turned_on(), 1);
        hvac.turn_hvac_off();
        hvac.turn_heating_on();
        assert_eq!(hvac.times_heating_turned_on(), 2);
        hvac.apply(HvacCommand::Cool);
        hvac.apply(HvacCommand::Cool);
        assert_eq!(hvac.times_cooling_turned_on(), 1);
    }

    #[test]
    fn ramp_up_reaches_max_after_ramp_seconds() {
        let params = HvacParameters {
            max_heating_power_w: 20_000.0,
            ramp_up_seconds: 60,
            ..HvacParameters::default()
        };
        let mut hvac = HvacUnit::with_parameters(params).expect("valid");
        hvac.turn_heating_on();
        for _ in 0..59 {
            hvac.simulate_one_second();
            assert_eq!(hvac.state(), HvacState::HeatingRampUp);
        }
        hvac.simulate_one_second();
        assert_eq!(hvac.last_interval_heating_power(), 20_000.0);
        assert_eq!(hvac.state(), HvacState::HeatingSteady);
    }

    #[test]
    fn shutting_down_while_power_remains() {
        let params = HvacParameters {
            max_heating_power_w: 900.0,
            ramp_up_seconds: 0,
            ramp_down_seconds: 3,
            ..HvacParameters::default()
        };
        let mut hvac = HvacUnit::with_parameters(params).expect("valid");
        hvac.turn_heating_on();
        hvac.simulate_one_second();
        assert!(!hvac.heating_shutting_down());

        hvac.turn_heating_off();
        hvac.simulate_one_second();
        assert!((hvac.last_interval_heating_power() - 600.0).abs() < 1e-9);
        assert!(hvac.heating_shutting_down());
        assert_eq!(hvac.state(), HvacState::HeatingRampDown);
        hvac.simulate_one_second();
        assert!(hvac.heating_shutting_down());
        hvac.simulate_one_second();
        assert_eq!(hvac.last_interval_heating_power(), 0.0);
        assert!(!hvac.heating_shutting_down());
        assert_eq!(hvac.state(), HvacState::Off);
    }

    #[test]
    fn cooling_ramp_down_state() {
        let params = HvacParameters {
            max_cooling_power_w: 1_000.0,
            ramp_up_seconds: 0,
            ramp_down_seconds: 2,
            ..HvacParameters::default()
        };
        let mut hvac = HvacUnit::with_parameters(params).expect("valid");
        hvac.turn_cooling_on();
        hvac.simulate_one_second();
        assert_eq!(hvac.state(), HvacState::CoolingSteady);
        hvac.turn_cooling_off();
        hvac.simulate_one_second();
        assert_eq!(hvac.state(), HvacState::CoolingRampDown);
        assert!(hvac.cooling_shutting_down());
        hvac.simulate_one_second();
        assert_eq!(hvac.state(), HvacState::Off);
    }

    #[test]
    fn durations_and_time_accumulate() {
        let mut hvac = instant(1_000.0, 1_000.0);
        hvac.turn_heating_on();
        for _ in 0..5 {
            hvac.simulate_one_second();
        }
        hvac.turn_cooling_on();
        for _ in 0..3 {
            hvac.simulate_one_second();
        }
        hvac.turn_hvac_off();
        hvac.simulate_one_second();
        assert_eq!(hvac.total_duration_heating_on(), 5);
        assert_eq!(hvac.total_duration_cooling_on(), 3);
        assert_eq!(hvac.total_time_in_seconds(), 9);
    }

    #[test]
    fn average_watts_is_cumulative_mean() {
        let mut hvac = instant(1_000.0, 500.0);
        hvac.turn_heating_on();
        for _ in 0..10 {
            hvac.simulate_one_second();
        }
        assert!((hvac.average_watts_per_second() - 1_000.0).abs() < 1e-9);

        hvac.turn_hvac_off();
        for _ in 0..10 {
            hvac.simulate_one_second();
        }
        assert!((hvac.average_watts_per_second() - 500.0).abs() < 1e-9);

        hvac.turn_cooling_on();
        for _ in 0..20 {
            hvac.simulate_one_second();
        }
        // (10 * 1000 + 10 * 0 + 20 * 500) / 40
        assert!((hvac.average_watts_per_second() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn energy_split_between_gas_and_electric() {
        let params = HvacParameters {
            max_heating_power_w: 3_600_000.0,
            max_cooling_power_w: 0.0,
            ramp_up_seconds: 0,
            ramp_down_seconds: 0,
            heating_electric_fraction: 0.25,
        };
        let mut hvac = HvacUnit::with_parameters(params).expect("valid");
        hvac.turn_heating_on();
        hvac.simulate_one_second();
        // 900 kJ electric = 0.25 kWh
        assert!((hvac.electric_kilowatt_hours() - 0.25).abs() < 1e-12);
        let expected_dth = 2_700_000.0 / JOULES_PER_BTU / BTU_PER_DTH;
        assert!((hvac.gas_dth() - expected_dth).abs() < 1e-15);
    }

    #[test]
    fn cooling_uses_electricity_only() {
        let mut hvac = instant(0.0, 3_600.0);
        hvac.turn_cooling_on();
        for _ in 0..1000 {
            hvac.simulate_one_second();
        }
        assert!((hvac.electric_kilowatt_hours() - 1.0).abs() < 1e-9);
        assert_eq!(hvac.gas_dth(), 0.0);
    }

    #[test]
    fn energy_is_monotonic_across_modes() {
        let mut hvac = HvacUnit::new(12_000.0, 8_000.0).expect("valid");
        let commands = [HvacCommand::Heat, HvacCommand::Off, HvacCommand::Cool, HvacCommand::Off];
        let mut last = (0.0, 0.0);
        for command in commands {
            hvac.apply(command);
            for _ in 0..120 {
                hvac.simulate_one_second();
                let now = (hvac.electric_kilowatt_hours(), hvac.gas_dth());
                assert!(now.0 >= last.0 && now.1 >= last.1);
                last = now;
            }
        }
    }

    #[test]
    fn reset_clears_everything() {
        let mut hvac = HvacUnit::new(10_000.0, 5_000.0).expect("valid");
        hvac.turn_heating_on();
        for _ in 0..30 {
            hvac.simulate_one_second();
        }
        hvac.reset();
        assert_eq!(hvac.state(), HvacState::Off);
        assert_eq!(hvac.times_heating_turned_on(), 0);
        assert_eq!(hvac.electric_kilowatt_hours(), 0.0);
        assert_eq!(hvac.gas_dth(), 0.0);
        assert_eq!(hvac.total_time_in_seconds(), 0);
        assert_eq!(hvac.last_interval_heating_power(), 0.0);
        assert_eq!(hvac.max_heating_power(), 10_000.0);
    }

    #[test]
    fn unit_conversions_are_linear() {
        assert!((watts_to_kwh(1_000.0, 3_600.0) - 1.0).abs() < 1e-12);
        assert!((watts_to_kwh(2_000.0, 1_800.0) - 1.0).abs() < 1e-12);
        let one_dth_joules = JOULES_PER_BTU * BTU_PER_DTH;
        assert!((watts_to_dth(one_dth_joules, 1.0) - 1.0).abs() < 1e-12);
        assert!((watts_to_dth(one_dth_joules / 10.0, 10.0) - 1.0).abs() < 1e-12);
    }
}
