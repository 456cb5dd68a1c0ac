//! Construction hints for the chained hash table.

/// Bucket count used when no capacity hint is given.
pub const DEFAULT_CAPACITY: usize = 16;
/// Load-factor threshold used when no usable hint is given.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;
/// The load check runs at most once per this many mutations.
pub const DEFAULT_CHECK_INTERVAL: usize = 100;
/// Hard ceiling on the bucket count; tables at the ceiling grow their chains
/// instead.
pub const MAX_CAPACITY: usize = 1 << 30;

/// Hints for sizing a hash table.
///
/// Zero, negative or non-finite hints fall back to the defaults above when
/// the table is built; see [`TableConfig::normalized`].
///
/// ```
/// use assoc_containers::TableConfig;
///
/// let cfg = TableConfig::default().capacity(4).load_factor(0.75);
/// assert_eq!(cfg.normalized().initial_capacity(), 4);
/// assert_eq!(TableConfig::default().capacity(0).normalized().initial_capacity(), 16);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    capacity: usize,
    load_factor: f64,
    check_interval: usize,
    max_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            check_interval: DEFAULT_CHECK_INTERVAL,
            max_capacity: MAX_CAPACITY,
        }
    }
}

impl TableConfig {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn check_interval(mut self, mutations: usize) -> Self {
        self.check_interval = mutations;
        self
    }

    pub fn max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Apply the fallbacks: 0 capacity, 0 interval and 0 ceiling take their
    /// defaults; a load factor that is not a positive finite number becomes
    /// 0.75; the capacity is clamped to the ceiling.
    pub fn normalized(self) -> Self {
        let max_capacity = match self.max_capacity {
            0 => MAX_CAPACITY,
            n => n,
        };
        let capacity = match self.capacity {
            0 => DEFAULT_CAPACITY,
            n => n,
        }
        .min(max_capacity);
        let load_factor = if self.load_factor.is_finite() && self.load_factor > 0.0 {
            self.load_factor
        } else {
            DEFAULT_LOAD_FACTOR
        };
        let check_interval = match self.check_interval {
            0 => DEFAULT_CHECK_INTERVAL,
            n => n,
        };
        Self {
            capacity,
            load_factor,
            check_interval,
            max_capacity,
        }
    }

    pub fn initial_capacity(&self) -> usize {
        self.capacity
    }

    pub fn threshold(&self) -> f64 {
        self.load_factor
    }

    pub fn interval(&self) -> usize {
        self.check_interval
    }

    pub fn ceiling(&self) -> usize {
        self.max_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_already_normal() {
        let cfg = TableConfig::default();
        assert_eq!(cfg.normalized(), cfg);
        assert_eq!(cfg.initial_capacity(), 16);
        assert_eq!(cfg.threshold(), 0.75);
        assert_eq!(cfg.interval(), 100);
        assert_eq!(cfg.ceiling(), MAX_CAPACITY);
    }

    /// Invariant: unusable hints fall back to the documented defaults.
    #[test]
    fn bad_hints_fall_back() {
        let cfg = TableConfig::default()
            .capacity(0)
            .load_factor(-1.0)
            .check_interval(0)
            .max_capacity(0)
            .normalized();
        assert_eq!(cfg, TableConfig::default());

        let nan = TableConfig::default().load_factor(f64::NAN).normalized();
        assert_eq!(nan.threshold(), DEFAULT_LOAD_FACTOR);
    }

    #[test]
    fn capacity_is_clamped_to_ceiling() {
        let cfg = TableConfig::default()
            .capacity(1000)
            .max_capacity(64)
            .normalized();
        assert_eq!(cfg.initial_capacity(), 64);
        assert_eq!(cfg.ceiling(), 64);
    }
}
