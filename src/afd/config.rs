// # Discovery Configuration
//
// Plain, serde-serialisable knobs consumed by `discover()`. Kept separate
// from the engine itself so a caller (CLI, embedding application, or a
// future experiment-runner collaborator) can build one from a config file
// or command-line flags without touching search internals.

use super::measures::MeasureKind;
use super::sampling::SamplingKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// ε: the error threshold an LHS must not exceed to count as valid.
    pub max_error: f64,
    /// Which error measure classifies validity.
    pub measure: MeasureKind,
    /// Sampling strategy used by the estimator path; `None` disables sampling
    /// and every estimate is an exact computation.
    pub sampling: SamplingKind,
    /// `< 1.0` is interpreted as a ratio of row count, `>= 1.0` as an
    /// absolute target sample size (capped at row count). Unused when
    /// `sampling` is `None`.
    pub sample_param: f64,
    /// PRNG seed for sampling; `None` seeds from the system clock, so runs
    /// are nondeterministic unless a seed is supplied.
    pub seed: Option<u64>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            max_error: 0.0,
            measure: MeasureKind::G3,
            sampling: SamplingKind::None,
            sample_param: 1.0,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_disables_sampling_and_requires_exactness() {
        let cfg = DiscoveryConfig::default();
        assert_eq!(cfg.sampling, SamplingKind::None);
        assert_eq!(cfg.measure, MeasureKind::G3);
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = DiscoveryConfig { max_error: 0.1, ..Default::default() };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: DiscoveryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_error, 0.1);
    }
}
