/// Decision clock that counts control intervals and the simulated seconds they cover.
///
/// # Examples
///
/// ```
/// use hvac_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3, 30);
/// let mut starts = Vec::new();
///
/// clock.run(|step, start_s| starts.push((step, start_s)));
/// assert_eq!(starts, vec![(0, 0), (1, 30), (2, 60)]);
/// assert_eq!(clock.elapsed_seconds(), 90);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Next decision index
    current: usize,
    /// Decisions in the run
    total: usize,
    seconds_per_step: u32,
}

impl Clock {
    /// Creates a clock for `total` decisions spaced `seconds_per_step` apart.
    pub fn new(total: usize, seconds_per_step: u32) -> Self {
        Self {
            current: 0,
            total,
            seconds_per_step,
        }
    }

    /// Advances by one decision.
    ///
    /// # Returns
    ///
    /// * `Some((step, start_s))` - The decision index and its start time in seconds
    /// * `None` - If every decision has been issued
    pub fn tick(&mut self) -> Option<(usize, u64)> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some((step, step as u64 * u64::from(self.seconds_per_step)))
        } else {
            None
        }
    }

    /// Runs `f` for every remaining decision.
    pub fn run(&mut self, mut f: impl FnMut(usize, u64)) {
        while let Some((step, start_s)) = self.tick() {
            f(step, start_s);
        }
    }

    /// Simulated seconds covered by the decisions issued so far.
    pub fn elapsed_seconds(&self) -> u64 {
        self.current as u64 * u64::from(self.seconds_per_step)
    }

}
