use super::types::StepSample;

/// Append-only record of building samples, one per simulated second.
///
/// Attached to a [`Building`](super::building::Building), which appends on
/// every step. Readers borrow it through the building; it is never cleared by
/// a building reset, only by an explicit [`SampleTracker::clear`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleTracker {
    samples: Vec<StepSample>,
}

impl SampleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample.
    pub fn add_sample(&mut self, sample: StepSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[StepSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drops all recorded samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Building temperature series (°C).
    pub fn house_temperatures(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.building_temperature).collect()
    }

    /// Outside temperature series (°C).
    pub fn outside_temperatures(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.outside_temperature).collect()
    }

    /// Average HVAC power series (W).
    pub fn average_watts(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.avg_watts_per_second).collect()
    }
}
