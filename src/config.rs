//! Filepath: src/config.rs
//!
//! Benchmark run configuration from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `FAIRBENCH_MIN_ELEMENTS` | `0` (no minimum) | smallest ladder size to run |
//! | `FAIRBENCH_MAX_ELEMENTS` | `0` (no maximum) | largest ladder size to run |
//! | `FAIRBENCH_SAMPLE_SIZE` | `50` | criterion samples per case, at least 10 |
//! | `FAIRBENCH_MEASUREMENT_MS` | `2000` | criterion measurement time |
//! | `FAIRBENCH_WARMUP_MS` | `500` | criterion warm-up time |

use std::env;
use std::fmt as StdFmt;
use std::num::ParseIntError;
use std::time::Duration;

use crate::matrix::SIZE_LADDER;
use crate::tracing_helpers::warn_log;

/// Environment variable bounding the smallest size.
pub const MIN_ELEMENTS_VAR: &str = "FAIRBENCH_MIN_ELEMENTS";
/// Environment variable bounding the largest size.
pub const MAX_ELEMENTS_VAR: &str = "FAIRBENCH_MAX_ELEMENTS";
/// Environment variable for the criterion sample count.
pub const SAMPLE_SIZE_VAR: &str = "FAIRBENCH_SAMPLE_SIZE";
/// Environment variable for the criterion measurement time.
pub const MEASUREMENT_MS_VAR: &str = "FAIRBENCH_MEASUREMENT_MS";
/// Environment variable for the criterion warm-up time.
pub const WARMUP_MS_VAR: &str = "FAIRBENCH_WARMUP_MS";

/// Criterion refuses fewer samples than this.
pub const MIN_SAMPLE_SIZE: usize = 10;

// ============================================================================
//  ConfigError
// ============================================================================

/// Errors reading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to something that is not a non-negative integer.
    NotANumber {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// Parser error.
        source: ParseIntError,
    },

    /// The sample count is below [`MIN_SAMPLE_SIZE`].
    SampleSizeTooSmall(usize),

    /// A nonzero minimum exceeds a nonzero maximum.
    InvertedBounds {
        /// Requested minimum.
        min: usize,
        /// Requested maximum.
        max: usize,
    },
}

impl StdFmt::Display for ConfigError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::NotANumber { var, value, .. } => {
                write!(f, "{var}={value:?} is not a non-negative integer")
            }

            Self::SampleSizeTooSmall(n) => {
                write!(f, "sample size {n} is below the minimum of {MIN_SAMPLE_SIZE}")
            }

            Self::InvertedBounds { min, max } => {
                write!(f, "minimum element count {min} exceeds maximum {max}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotANumber { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
//  BenchConfig
// ============================================================================

/// Size bounds and criterion timing for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Smallest size to run; 0 for no minimum.
    pub min_elements: usize,
    /// Largest size to run; 0 for no maximum.
    pub max_elements: usize,
    /// Criterion samples per case.
    pub sample_size: usize,
    /// Criterion measurement time per case.
    pub measurement_time: Duration,
    /// Criterion warm-up time per case.
    pub warm_up_time: Duration,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            min_elements: 0,
            max_elements: 0,
            sample_size: 50,
            measurement_time: Duration::from_millis(2000),
            warm_up_time: Duration::from_millis(500),
        }
    }
}

impl BenchConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unparsable or inconsistent values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value if set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unparsable or inconsistent values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |var: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(var) {
                None => Ok(default),
                Some(raw) => raw.trim().parse::<u64>().map_err(|source| ConfigError::NotANumber {
                    var,
                    value: raw,
                    source,
                }),
            }
        };
        let read_usize = |var: &'static str, default: usize| -> Result<usize, ConfigError> {
            read(var, default as u64).map(|v| usize::try_from(v).unwrap_or(usize::MAX))
        };

        let config = Self {
            min_elements: read_usize(MIN_ELEMENTS_VAR, defaults.min_elements)?,
            max_elements: read_usize(MAX_ELEMENTS_VAR, defaults.max_elements)?,
            sample_size: read_usize(SAMPLE_SIZE_VAR, defaults.sample_size)?,
            measurement_time: Duration::from_millis(read(
                MEASUREMENT_MS_VAR,
                duration_ms(defaults.measurement_time),
            )?),
            warm_up_time: Duration::from_millis(read(
                WARMUP_MS_VAR,
                duration_ms(defaults.warm_up_time),
            )?),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants between fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the sample size is too small or the
    /// bounds are inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_size < MIN_SAMPLE_SIZE {
            return Err(ConfigError::SampleSizeTooSmall(self.sample_size));
        }
        if self.min_elements != 0 && self.max_elements != 0 && self.min_elements > self.max_elements {
            return Err(ConfigError::InvertedBounds {
                min: self.min_elements,
                max: self.max_elements,
            });
        }
        Ok(())
    }

    /// Whether `n` lies inside the configured bounds.
    #[must_use]
    pub const fn admits(&self, n: usize) -> bool {
        let above_min = self.min_elements == 0 || n >= self.min_elements;
        let below_max = self.max_elements == 0 || n <= self.max_elements;
        above_min && below_max
    }

    /// The size ladder filtered by the bounds.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        let sizes: Vec<usize> = SIZE_LADDER.into_iter().filter(|&n| self.admits(n)).collect();
        if sizes.is_empty() {
            warn_log!(
                min = self.min_elements,
                max = self.max_elements,
                "element bounds exclude every ladder size"
            );
        }
        sizes
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<BenchConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        BenchConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_cover_whole_ladder() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config, BenchConfig::default());
        assert_eq!(config.sizes(), SIZE_LADDER.to_vec());
    }

    #[test]
    fn bounds_filter_ladder() {
        let config = from_pairs(&[(MIN_ELEMENTS_VAR, "64"), (MAX_ELEMENTS_VAR, "512")]).unwrap();
        assert_eq!(config.sizes(), vec![64, 128, 256, 512]);
    }

    #[test]
    fn timings_are_read_in_millis() {
        let config = from_pairs(&[(MEASUREMENT_MS_VAR, "100"), (WARMUP_MS_VAR, " 20 ")]).unwrap();
        assert_eq!(config.measurement_time, Duration::from_millis(100));
        assert_eq!(config.warm_up_time, Duration::from_millis(20));
    }

    #[test]
    fn garbage_is_reported_with_variable() {
        let err = from_pairs(&[(SAMPLE_SIZE_VAR, "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::NotANumber { var: SAMPLE_SIZE_VAR, .. }));
        assert!(err.to_string().contains("FAIRBENCH_SAMPLE_SIZE"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn small_sample_size_rejected() {
        let err = from_pairs(&[(SAMPLE_SIZE_VAR, "5")]).unwrap_err();
        assert_eq!(err, ConfigError::SampleSizeTooSmall(5));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let err = from_pairs(&[(MIN_ELEMENTS_VAR, "1024"), (MAX_ELEMENTS_VAR, "8")]).unwrap_err();
        assert_eq!(err, ConfigError::InvertedBounds { min: 1024, max: 8 });
    }

    #[test]
    fn bounds_between_rungs_can_empty_the_ladder() {
        let config = from_pairs(&[(MIN_ELEMENTS_VAR, "5"), (MAX_ELEMENTS_VAR, "7")]).unwrap();
        assert!(config.sizes().is_empty());
    }
}
