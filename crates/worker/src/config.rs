use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Datelike, Utc};
use ppscc_core::decimal::{self, Decimal};
use ppscc_core::emission::EmissionMetric;
use ppscc_core::types::DbId;
use ppscc_core::validation::{validate_positive, validate_year};

use crate::error::WorkerError;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    /// Directory holding the three fixture files (default: `.`).
    pub data_dir: PathBuf,
    /// Year to recalculate (default: current UTC year).
    pub year: i32,
    /// Capacity used for vessels without one. Unset means such vessels fail.
    pub default_capacity: Option<Decimal>,
    /// Emission total compared against the baseline.
    pub metric: EmissionMetric,
    /// Restrict the run to these vessel ids. Empty means every vessel.
    pub vessel_ids: Vec<DbId>,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default            |
    /// |--------------------------|--------------------|
    /// | `PPSCC_DATA_DIR`         | `.`                |
    /// | `PPSCC_YEAR`             | current UTC year   |
    /// | `PPSCC_DEFAULT_CAPACITY` | unset              |
    /// | `PPSCC_EMISSION_METRIC`  | `tot_w2w_co2`      |
    /// | `PPSCC_VESSEL_IDS`       | unset (all)        |
    pub fn from_env() -> Result<Self, WorkerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `get`.
    pub fn from_lookup<F>(get: F) -> Result<Self, WorkerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_dir = var("PPSCC_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let year = match var("PPSCC_YEAR") {
            Some(raw) => raw
                .parse()
                .map_err(|_| invalid("PPSCC_YEAR", &raw, "an integer year"))?,
            None => Utc::now().year(),
        };
        validate_year(year).map_err(|e| WorkerError::Config(format!("PPSCC_YEAR: {e}")))?;

        let default_capacity = match var("PPSCC_DEFAULT_CAPACITY") {
            Some(raw) => {
                let capacity = decimal::parse_str(&raw)
                    .ok_or_else(|| invalid("PPSCC_DEFAULT_CAPACITY", &raw, "a decimal number"))?;
                validate_positive(capacity, "PPSCC_DEFAULT_CAPACITY")
                    .map_err(|e| WorkerError::Config(e.to_string()))?;
                Some(capacity)
            }
            None => None,
        };

        let metric = match var("PPSCC_EMISSION_METRIC") {
            Some(raw) => EmissionMetric::from_str(&raw)
                .map_err(|e| WorkerError::Config(format!("PPSCC_EMISSION_METRIC: {e}")))?,
            None => EmissionMetric::default(),
        };

        let vessel_ids = match var("PPSCC_VESSEL_IDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<DbId>()
                        .map_err(|_| invalid("PPSCC_VESSEL_IDS", s, "comma-separated integers"))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            data_dir,
            year,
            default_capacity,
            metric,
            vessel_ids,
        })
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> WorkerError {
    WorkerError::Config(format!("{key} must be {expected}, got {value:?}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<WorkerConfig, WorkerError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WorkerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.year, Utc::now().year());
        assert_eq!(config.default_capacity, None);
        assert_eq!(config.metric, EmissionMetric::TotW2wCo2);
        assert!(config.vessel_ids.is_empty());
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("PPSCC_DATA_DIR", "/data/fixtures"),
            ("PPSCC_YEAR", "2024"),
            ("PPSCC_DEFAULT_CAPACITY", "50000"),
            ("PPSCC_EMISSION_METRIC", "tot_t2w_co2"),
            ("PPSCC_VESSEL_IDS", "3, 1,,2"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/data/fixtures"));
        assert_eq!(config.year, 2024);
        assert_eq!(config.default_capacity, Some(dec!(50000)));
        assert_eq!(config.metric, EmissionMetric::TotT2wCo2);
        assert_eq!(config.vessel_ids, vec![3, 1, 2]);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("PPSCC_YEAR", "  "), ("PPSCC_DEFAULT_CAPACITY", "")]).unwrap();
        assert_eq!(config.year, Utc::now().year());
        assert_eq!(config.default_capacity, None);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert_matches!(load(&[("PPSCC_YEAR", "twenty")]), Err(WorkerError::Config(_)));
        assert_matches!(load(&[("PPSCC_YEAR", "0")]), Err(WorkerError::Config(_)));
        assert_matches!(
            load(&[("PPSCC_DEFAULT_CAPACITY", "-5")]),
            Err(WorkerError::Config(_))
        );
        assert_matches!(
            load(&[("PPSCC_DEFAULT_CAPACITY", "lots")]),
            Err(WorkerError::Config(_))
        );
        assert_matches!(
            load(&[("PPSCC_EMISSION_METRIC", "tot_co")]),
            Err(WorkerError::Config(_))
        );
        assert_matches!(
            load(&[("PPSCC_VESSEL_IDS", "1,two")]),
            Err(WorkerError::Config(_))
        );
    }
}
