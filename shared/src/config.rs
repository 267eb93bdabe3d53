use std::time::Duration;

/// Contains Config properties used on both sides of a synchronized session
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Simulated delivery delay applied to received packets before they are
    /// processed. A debug-only feature for testing against network jitter;
    /// it has no effect unless `debug_level` is at least 1.
    pub artificial_lag: Duration,
    /// Period of the authority's broadcast tick, and of the observer's
    /// input flush tick
    pub update_cadence: Duration,
    /// Period of the observer's input sampling tick
    pub input_cadence: Duration,
    /// Duration after which retained deltas are irreversibly folded into
    /// the baseline
    pub retention_window: Duration,
    /// How far into the past the observer renders. Must exceed the expected
    /// one-way update latency plus one update period, so that frames are
    /// interpolated between received samples rather than extrapolated.
    pub display_delay: Duration,
    /// 0 = off, 1 = trace, 2 = trace + snapshot-diff logging
    pub debug_level: u8,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            artificial_lag: Duration::ZERO,
            update_cadence: Duration::from_millis(30),
            input_cadence: Duration::from_millis(30),
            retention_window: Duration::from_millis(2000),
            display_delay: Duration::from_millis(200),
            debug_level: 0,
        }
    }
}

impl SyncConfig {
    /// Whether received packets should be routed through the artificial-lag
    /// queue. Lag simulation is only honored in debug mode.
    pub fn simulates_lag(&self) -> bool {
        self.debug_level > 0 && !self.artificial_lag.is_zero()
    }
}
