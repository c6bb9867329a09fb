//! Outside air temperature profiles fed to the building each second.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::SimError;

const SECONDS_PER_HOUR: f64 = 3_600.0;
const HOURS_PER_DAY: usize = 24;

/// Hourly outside temperatures (°C) for a cold winter day, midnight to midnight.
pub const WINTER_DAY_C: [f64; 25] = [
    -6.1, -6.7, -7.2, -7.8, -8.3, -8.9, -8.9, -8.3, -7.2, -5.6, -3.9, -2.2, -1.1, 0.0, 0.6, 0.6,
    0.0, -1.1, -2.2, -3.3, -3.9, -4.4, -5.0, -5.6, -6.1,
];

/// Hourly outside temperatures (°C) for a hot summer day, midnight to midnight.
pub const SUMMER_DAY_C: [f64; 25] = [
    22.2, 21.7, 21.1, 20.6, 20.0, 20.0, 20.6, 22.2, 24.4, 26.7, 28.9, 30.6, 32.2, 33.3, 33.9,
    34.4, 33.9, 33.3, 31.7, 29.4, 27.2, 25.6, 24.4, 23.3, 22.2,
];

/// Standard-normal noise scaled by `std_dev`, via Box-Muller.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Number of hours before an hourly table repeats.
///
/// A table whose last entry equals its first closes its own cycle (25 entries
/// for 0h..24h inclusive repeat every 24 hours). Any other table wraps from
/// its last entry back to the first.
fn cycle_hours(points: &[f64]) -> usize {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 && first == last => points.len() - 1,
        _ => points.len(),
    }
}

/// Linear interpolation over hourly points, repeating every [`cycle_hours`].
fn interpolate_hourly(points: &[f64], time_s: u64) -> f64 {
    let cycle_s = cycle_hours(points) as u64 * SECONDS_PER_HOUR as u64;
    let hours = (time_s % cycle_s) as f64 / SECONDS_PER_HOUR;
    let idx = hours.floor() as usize;
    let next = (idx + 1) % points.len();
    let frac = hours.fract();
    points[idx] + (points[next] - points[idx]) * frac
}

/// Source of outside air temperature as a function of simulated time.
#[derive(Debug, Clone, PartialEq)]
pub enum OutsideTemperature {
    /// The same temperature at every second.
    Constant(f64),
    /// One entry per hour, interpolated linearly in between.
    Hourly(Vec<f64>),
    /// Cosine day/night swing with seeded hourly noise.
    Diurnal(DiurnalProfile),
}

impl OutsideTemperature {
    /// Builds an hourly table profile.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for an empty table or any
    /// non-finite entry.
    pub fn hourly(table: &[f64]) -> Result<Self, SimError> {
        if table.is_empty() {
            return Err(SimError::config("hourly_c", "must not be empty"));
        }
        if let Some(bad) = table.iter().find(|t| !t.is_finite()) {
            return Err(SimError::config(
                "hourly_c",
                format!("entries must be finite, got {bad}"),
            ));
        }
        Ok(Self::Hourly(table.to_vec()))
    }

    /// Builds a constant profile.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for a non-finite value.
    pub fn constant(temperature: f64) -> Result<Self, SimError> {
        if temperature.is_finite() {
            Ok(Self::Constant(temperature))
        } else {
            Err(SimError::config(
                "constant_c",
                format!("must be finite, got {temperature}"),
            ))
        }
    }

    /// Outside temperature at `time_s` seconds into the run (°C).
    pub fn temperature_at(&self, time_s: u64) -> f64 {
        match self {
            Self::Constant(t) => *t,
            Self::Hourly(table) => interpolate_hourly(table, time_s),
            Self::Diurnal(profile) => profile.temperature_at(time_s),
        }
    }
}

/// A daily cosine temperature swing with reproducible hourly noise.
///
/// The coldest point of the day falls at `coldest_hour`; noise is drawn once
/// per hour at construction so the profile is smooth and deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct DiurnalProfile {
    points: Vec<f64>,
}

impl DiurnalProfile {
    /// Creates a diurnal profile.
    ///
    /// # Arguments
    ///
    /// * `mean_c` - Daily mean temperature (°C)
    /// * `amplitude_c` - Half the day/night swing (°C, >= 0)
    /// * `coldest_hour` - Hour of the daily minimum (0.0 to 24.0)
    /// * `noise_std` - Standard deviation of hourly noise (°C)
    /// * `seed` - Random seed for reproducible noise
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for non-finite inputs,
    /// a negative amplitude or noise, or an hour outside `[0, 24]`.
    pub fn new(
        mean_c: f64,
        amplitude_c: f64,
        coldest_hour: f64,
        noise_std: f64,
        seed: u64,
    ) -> Result<Self, SimError> {
        if !mean_c.is_finite() {
            return Err(SimError::config("mean_c", "must be finite"));
        }
        crate::error::require_non_negative("amplitude_c", amplitude_c)?;
        crate::error::require_non_negative("noise_std", noise_std)?;
        if !(0.0..=24.0).contains(&coldest_hour) {
            return Err(SimError::config(
                "coldest_hour",
                format!("must be in [0, 24], got {coldest_hour}"),
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let points = (0..HOURS_PER_DAY)
            .map(|h| {
                let angle = 2.0 * std::f64::consts::PI * (h as f64 - coldest_hour)
                    / HOURS_PER_DAY as f64;
                mean_c - amplitude_c * angle.cos() + gaussian_noise(&mut rng, noise_std)
            })
            .collect();
        Ok(Self { points })
    }

    /// Hourly anchor points (24 entries, one per hour).
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn temperature_at(&self, time_s: u64) -> f64 {
        interpolate_hourly(&self.points, time_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_is_constant() {
        let w = OutsideTemperature::constant(4.0).expect("finite");
        assert_eq!(w.temperature_at(0), 4.0);
        assert_eq!(w.temperature_at(1_000_000), 4.0);
        assert!(OutsideTemperature::constant(f64::NAN).is_err());
    }

    #[test]
    fn hourly_interpolates_between_entries() {
        let w = OutsideTemperature::hourly(&[0.0, 10.0, 20.0]).expect("valid table");
        assert_eq!(w.temperature_at(0), 0.0);
        assert!((w.temperature_at(1_800) - 5.0).abs() < 1e-12);
        assert_eq!(w.temperature_at(3_600), 10.0);
        // past the last entry: wraps to interpolate from entry 0 again
        assert!((w.temperature_at(3 * 3_600 + 900) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn hourly_wraps_back_to_first_entry() {
        let w = OutsideTemperature::hourly(&[0.0, 10.0]).expect("valid table");
        // between entry 1 (10.0) and wrapped entry 0 (0.0)
        assert!((w.temperature_at(3_600 + 1_800) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn hourly_rejects_bad_tables() {
        assert!(OutsideTemperature::hourly(&[]).is_err());
        assert!(OutsideTemperature::hourly(&[1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn winter_table_covers_whole_day() {
        let w = OutsideTemperature::hourly(&WINTER_DAY_C).expect("valid table");
        assert_eq!(w.temperature_at(24 * 3_600), WINTER_DAY_C[24]);
        assert!(WINTER_DAY_C.iter().all(|t| *t < 1.0));
        assert!(SUMMER_DAY_C.iter().all(|t| *t >= 20.0));
    }

    #[test]
    fn closed_tables_repeat_every_24_hours() {
        for table in [WINTER_DAY_C, SUMMER_DAY_C] {
            let w = OutsideTemperature::hourly(&table).expect("valid table");
            for day in 1..4_u64 {
                for hour in 0..24_u64 {
                    let t = (day * 24 + hour) * 3_600;
                    assert_eq!(w.temperature_at(t), table[hour as usize], "day {day} hour {hour}");
                    assert_eq!(w.temperature_at(t + 1_234), w.temperature_at(hour * 3_600 + 1_234));
                }
            }
        }
        let w = OutsideTemperature::hourly(&WINTER_DAY_C).expect("valid table");
        assert_eq!(w.temperature_at(25 * 3_600), WINTER_DAY_C[1]);
        assert_eq!(w.temperature_at(29 * 3_600), WINTER_DAY_C[5]);
    }

    #[test]
    fn single_entry_table_is_constant() {
        let w = OutsideTemperature::hourly(&[7.5]).expect("valid table");
        assert_eq!(w.temperature_at(0), 7.5);
        assert_eq!(w.temperature_at(90_000), 7.5);
    }

    #[test]
    fn diurnal_without_noise_peaks_opposite_coldest_hour() {
        let p = DiurnalProfile::new(10.0, 5.0, 5.0, 0.0, 1).expect("valid");
        assert!((p.temperature_at(5 * 3_600) - 5.0).abs() < 1e-9);
        assert!((p.temperature_at(17 * 3_600) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn diurnal_noise_is_deterministic_per_seed() {
        let a = DiurnalProfile::new(10.0, 5.0, 5.0, 1.0, 42).expect("valid");
        let b = DiurnalProfile::new(10.0, 5.0, 5.0, 1.0, 42).expect("valid");
        let c = DiurnalProfile::new(10.0, 5.0, 5.0, 1.0, 43).expect("valid");
        assert_eq!(a, b);
        assert_ne!(a.points(), c.points());
        assert_eq!(a.points().len(), 24);
    }

    #[test]
    fn diurnal_rejects_bad_inputs() {
        assert!(DiurnalProfile::new(f64::NAN, 5.0, 5.0, 0.0, 0).is_err());
        assert!(DiurnalProfile::new(10.0, -1.0, 5.0, 0.0, 0).is_err());
        assert!(DiurnalProfile::new(10.0, 5.0, 25.0, 0.0, 0).is_err());
    }
}
