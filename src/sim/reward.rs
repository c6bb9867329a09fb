//! Energy cost accounting and reward strategies for control-policy evaluation.

use crate::devices::HvacUnit;
use crate::devices::hvac::{watts_to_dth, watts_to_kwh};

/// Default electricity price ($/kWh).
pub const DEFAULT_DOLLARS_PER_KWH: f64 = 0.1149;

/// Default natural gas price ($/DTH).
pub const DEFAULT_DOLLARS_PER_DTH: f64 = 6.53535;

/// Temperature the directional and deviation strategies steer toward (°C).
pub const DEFAULT_SETPOINT_C: f64 = 20.0;

/// Energy tariffs used to turn metered energy into dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyPrices {
    pub dollars_per_kwh: f64,
    pub dollars_per_dth: f64,
}

impl Default for EnergyPrices {
    fn default() -> Self {
        Self {
            dollars_per_kwh: DEFAULT_DOLLARS_PER_KWH,
            dollars_per_dth: DEFAULT_DOLLARS_PER_DTH,
        }
    }
}

impl EnergyPrices {
    /// Cost of `kwh` kilowatt-hours of electricity.
    pub fn electric_cost_of(&self, kwh: f64) -> f64 {
        kwh * self.dollars_per_kwh
    }

    /// Cost of `dth` decatherms of gas.
    pub fn gas_cost_of(&self, dth: f64) -> f64 {
        dth * self.dollars_per_dth
    }

    /// Cumulative electric cost of everything the unit has metered since reset.
    pub fn electric_cost(&self, hvac: &HvacUnit) -> f64 {
        self.electric_cost_of(hvac.electric_kilowatt_hours())
    }

    /// Cumulative gas cost of everything the unit has metered since reset.
    pub fn gas_cost(&self, hvac: &HvacUnit) -> f64 {
        self.gas_cost_of(hvac.gas_dth())
    }

    /// Worst-case cost of running the unit's furnace flat out for `seconds`.
    pub fn max_heating_cost(&self, hvac: &HvacUnit, seconds: f64) -> f64 {
        let electric = watts_to_kwh(hvac.max_heating_electric_power(), seconds);
        let gas = watts_to_dth(hvac.max_heating_gas_power(), seconds);
        self.electric_cost_of(electric) + self.gas_cost_of(gas)
    }

    /// Worst-case cost of running the unit's air conditioner flat out for `seconds`.
    pub fn max_cooling_cost(&self, hvac: &HvacUnit, seconds: f64) -> f64 {
        self.electric_cost_of(watts_to_kwh(hvac.max_cooling_power(), seconds))
    }
}

/// Closed temperature interval `[low, high]` considered comfortable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortBand {
    pub low: f64,
    pub high: f64,
}

impl ComfortBand {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Both edges are inside the band.
    pub fn contains(&self, temperature: f64) -> bool {
        (self.low..=self.high).contains(&temperature)
    }
}

/// Everything a reward strategy may look at for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RewardInput {
    pub previous_temperature: f64,
    pub current_temperature: f64,
    pub heating_on: bool,
    pub heating_shutting_down: bool,
    pub cooling_on: bool,
    /// Cumulative electric cost to date ($).
    pub electric_cost: f64,
    /// Cumulative gas cost to date ($).
    pub gas_cost: f64,
    /// Cost attributed to the last action ($), if the caller tracks it.
    pub action_cost: Option<f64>,
}

impl RewardInput {
    /// Snapshot of the unit's mode flags and cumulative costs.
    pub fn from_hvac(
        hvac: &HvacUnit,
        prices: &EnergyPrices,
        previous_temperature: f64,
        current_temperature: f64,
    ) -> Self {
        Self {
            previous_temperature,
            current_temperature,
            heating_on: hvac.heating_on(),
            heating_shutting_down: hvac.heating_shutting_down(),
            cooling_on: hvac.cooling_on(),
            electric_cost: prices.electric_cost(hvac),
            gas_cost: prices.gas_cost(hvac),
            action_cost: None,
        }
    }

    pub fn with_action_cost(mut self, action_cost: f64) -> Self {
        self.action_cost = Some(action_cost);
        self
    }

    pub fn total_cost(&self) -> f64 {
        self.electric_cost + self.gas_cost
    }
}

/// Reward policy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewardStrategy {
    /// 1 when the temperature moves toward the setpoint or the right equipment works on it.
    Directional { setpoint: f64 },
    /// Cost-discounted reward while inside the band.
    BandCost {
        band: ComfortBand,
        /// Cumulative cost above which the reward saturates.
        cost_ceiling: f64,
        /// Reward paid inside the band once the ceiling is exceeded.
        saturated_reward: f64,
        /// Reward paid outside the band.
        outside_reward: f64,
    },
    /// Baseline max cost minus the action cost; minus the baseline outside the band.
    MaxCostNormalized { band: ComfortBand },
    /// Falls off linearly with distance from the setpoint; ignores cost.
    Deviation {
        setpoint: f64,
        tolerance: f64,
        scale: f64,
        floor: f64,
    },
}

impl RewardStrategy {
    pub fn directional() -> Self {
        Self::Directional {
            setpoint: DEFAULT_SETPOINT_C,
        }
    }

    pub fn band_cost() -> Self {
        Self::BandCost {
            band: ComfortBand::new(18.0, 22.0),
            cost_ceiling: 0.75,
            saturated_reward: 0.25,
            outside_reward: 0.0,
        }
    }

    pub fn max_cost_normalized() -> Self {
        Self::MaxCostNormalized {
            band: ComfortBand::new(15.0, 25.0),
        }
    }

    pub fn deviation() -> Self {
        Self::Deviation {
            setpoint: DEFAULT_SETPOINT_C,
            tolerance: 1.0,
            scale: 10.0,
            floor: 0.0,
        }
    }

    /// The band this strategy treats as comfortable, if it has one.
    pub fn comfort_band(&self) -> Option<ComfortBand> {
        match self {
            Self::BandCost { band, .. } | Self::MaxCostNormalized { band } => Some(*band),
            Self::Directional { .. } | Self::Deviation { .. } => None,
        }
    }

    /// Evaluates the strategy. `max_cost_baseline` is only read by
    /// [`RewardStrategy::MaxCostNormalized`].
    pub fn evaluate(&self, input: &RewardInput, max_cost_baseline: f64) -> f64 {
        match *self {
            Self::Directional { setpoint } => directional(input, setpoint),
            Self::BandCost {
                band,
                cost_ceiling,
                saturated_reward,
                outside_reward,
            } => band_cost(input, band, cost_ceiling, saturated_reward, outside_reward),
            Self::MaxCostNormalized { band } => max_cost_normalized(input, band, max_cost_baseline),
            Self::Deviation {
                setpoint,
                tolerance,
                scale,
                floor,
            } => deviation(input.current_temperature, setpoint, tolerance, scale, floor),
        }
    }
}

fn directional(input: &RewardInput, setpoint: f64) -> f64 {
    let current = input.current_temperature;
    let previous = input.previous_temperature;
    let correcting = if current < setpoint {
        previous < current || input.heating_on
    } else if current > setpoint {
        previous > current || input.cooling_on || input.heating_shutting_down
    } else {
        false
    };
    if correcting { 1.0 } else { 0.0 }
}

fn band_cost(
    input: &RewardInput,
    band: ComfortBand,
    cost_ceiling: f64,
    saturated_reward: f64,
    outside_reward: f64,
) -> f64 {
    if !band.contains(input.current_temperature) {
        return outside_reward;
    }
    let cost = input.total_cost();
    if cost <= 0.0 {
        // zero cumulative cost pays nothing
        0.0
    } else if cost > cost_ceiling {
        saturated_reward
    } else {
        1.0 - cost
    }
}

fn max_cost_normalized(input: &RewardInput, band: ComfortBand, baseline: f64) -> f64 {
    if band.contains(input.current_temperature) {
        baseline - input.action_cost.unwrap_or(0.0)
    } else {
        -baseline
    }
}

fn deviation(temperature: f64, setpoint: f64, tolerance: f64, scale: f64, floor: f64) -> f64 {
    let off_by = (temperature - setpoint).abs();
    if off_by < tolerance {
        1.0
    } else {
        (1.0 - off_by / scale).clamp(floor, 1.0)
    }
}

/// Prices plus the selected strategy and its cached max-cost baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardEngine {
    prices: EnergyPrices,
    strategy: RewardStrategy,
    max_cost_baseline: f64,
}

impl RewardEngine {
    pub fn new(strategy: RewardStrategy, prices: EnergyPrices) -> Self {
        Self {
            prices,
            strategy,
            max_cost_baseline: 0.0,
        }
    }

    pub fn prices(&self) -> &EnergyPrices {
        &self.prices
    }

    pub fn strategy(&self) -> &RewardStrategy {
        &self.strategy
    }

    pub fn max_cost_baseline(&self) -> f64 {
        self.max_cost_baseline
    }

    pub fn electric_cost(&self, hvac: &HvacUnit) -> f64 {
        self.prices.electric_cost(hvac)
    }

    pub fn gas_cost(&self, hvac: &HvacUnit) -> f64 {
        self.prices.gas_cost(hvac)
    }

    pub fn total_cost(&self, hvac: &HvacUnit) -> f64 {
        self.electric_cost(hvac) + self.gas_cost(hvac)
    }

    /// Highest cost the unit could incur in `seconds`, running either mode flat out.
    ///
    /// The result is cached as the baseline for the max-cost-normalized strategy.
    pub fn max_cost_for_horizon(&mut self, hvac: &HvacUnit, seconds: f64) -> f64 {
        let heating = self.prices.max_heating_cost(hvac, seconds);
        let cooling = self.prices.max_cooling_cost(hvac, seconds);
        self.max_cost_baseline = heating.max(cooling);
        self.max_cost_baseline
    }

    pub fn reward(&self, input: &RewardInput) -> f64 {
        self.strategy.evaluate(input, self.max_cost_baseline)
    }
}
