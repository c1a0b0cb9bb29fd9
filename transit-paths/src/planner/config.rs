//! Search configuration for the planner.

/// Configuration parameters for shortest-path search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Maximum number of nodes a single search may settle.
    /// `None` means unbounded. Exceeding the bound is an error, not an
    /// "unreachable" result.
    pub max_settled: Option<usize>,

    /// Cost units per kilometre of great-circle distance, used by the
    /// geographic heuristic. The heuristic stays admissible only while this
    /// does not exceed the cheapest cost per kilometre of any route in the
    /// network.
    pub cost_per_km: f64,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_settled: Option<usize>, cost_per_km: f64) -> Self {
        Self {
            max_settled,
            cost_per_km,
        }
    }

    /// Bound the number of settled nodes per search.
    pub fn with_max_settled(mut self, max_settled: usize) -> Self {
        self.max_settled = Some(max_settled);
        self
    }

    /// Set the geographic heuristic scale.
    pub fn with_cost_per_km(mut self, cost_per_km: f64) -> Self {
        self.cost_per_km = cost_per_km;
        self
    }

    /// Check the configuration can drive a correct search.
    pub fn validate(&self) -> Result<(), String> {
        if !self.cost_per_km.is_finite() || self.cost_per_km < 0.0 {
            return Err(format!(
                "cost_per_km must be finite and non-negative, got {}",
                self.cost_per_km
            ));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_settled: None,
            cost_per_km: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.max_settled, None);
        assert_eq!(config.cost_per_km, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig::new(Some(100), 0.5);

        assert_eq!(config.max_settled, Some(100));
        assert_eq!(config.cost_per_km, 0.5);
    }

    #[test]
    fn builder_methods() {
        let config = SearchConfig::default()
            .with_max_settled(10)
            .with_cost_per_km(2.0);

        assert_eq!(config, SearchConfig::new(Some(10), 2.0));
    }

    #[test]
    fn rejects_bad_scale() {
        assert!(SearchConfig::default().with_cost_per_km(-1.0).validate().is_err());
        assert!(SearchConfig::default().with_cost_per_km(f64::NAN).validate().is_err());
        assert!(SearchConfig::default().with_cost_per_km(0.0).validate().is_ok());
    }
}
