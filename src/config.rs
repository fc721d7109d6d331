//! Configuration for the kitchen simulation.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{KitchenError, Result};
use crate::models::{fixed_duration, per_topping_duration, DurationFn, StageSequence, StageSpec};
use crate::validation::validate_config;

/// Main configuration for a kitchen run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenConfig {
    /// Number of orders in the startup batch
    #[serde(default = "default_orders")]
    pub orders: usize,

    /// Exclusive upper bound for random topping counts: toppings are drawn
    /// uniformly from `[0, max_toppings)`
    #[serde(default = "default_max_toppings")]
    pub max_toppings: u32,

    /// Stations in pipeline order
    #[serde(default = "default_stations")]
    pub stations: Vec<StationConfig>,

    /// Wall-clock length of one time unit, in milliseconds
    #[serde(default = "default_time_unit_ms")]
    pub time_unit_ms: u64,

    /// RNG seed for topping counts; random if unset
    #[serde(default)]
    pub seed: Option<u64>,
}

/// One station of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Station name
    pub name: String,

    /// Number of workers at this station
    pub workers: usize,

    /// Base processing duration in time units
    pub base_duration: u64,

    /// How the duration depends on the order
    #[serde(default)]
    pub scaling: DurationScaling,
}

/// Duration rule for a station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationScaling {
    /// Always the base duration.
    #[default]
    Fixed,
    /// `ceil(base * toppings / 2)`.
    PerTopping,
}

impl DurationScaling {
    /// Function implementing this rule.
    pub fn as_fn(self) -> DurationFn {
        match self {
            DurationScaling::Fixed => fixed_duration,
            DurationScaling::PerTopping => per_topping_duration,
        }
    }
}

impl StationConfig {
    /// Station with a fixed duration.
    pub fn fixed(name: impl Into<String>, workers: usize, base_duration: u64) -> Self {
        Self {
            name: name.into(),
            workers,
            base_duration,
            scaling: DurationScaling::Fixed,
        }
    }

    /// Station whose duration scales with the topping count.
    pub fn per_topping(name: impl Into<String>, workers: usize, base_duration: u64) -> Self {
        Self {
            scaling: DurationScaling::PerTopping,
            ..Self::fixed(name, workers, base_duration)
        }
    }

    fn to_spec(&self) -> StageSpec {
        StageSpec::new(self.name.clone(), self.workers, self.base_duration)
            .with_duration_fn(self.scaling.as_fn())
    }
}

fn default_orders() -> usize {
    10
}

fn default_max_toppings() -> u32 {
    14
}

fn default_time_unit_ms() -> u64 {
    1000
}

fn default_stations() -> Vec<StationConfig> {
    vec![
        StationConfig::fixed("dough", 2, 7),
        StationConfig::per_topping("toppings", 3, 4),
        StationConfig::fixed("oven", 1, 10),
        StationConfig::fixed("waiter", 2, 5),
    ]
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            orders: default_orders(),
            max_toppings: default_max_toppings(),
            stations: default_stations(),
            time_unit_ms: default_time_unit_ms(),
            seed: None,
        }
    }
}

impl KitchenConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON for this configuration.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_config(self).map_err(KitchenError::InvalidConfig)
    }

    /// Stage table built from the stations.
    pub fn stage_sequence(&self) -> StageSequence {
        StageSequence::new(self.stations.iter().map(StationConfig::to_spec).collect())
    }

    /// Total number of workers across all stations.
    pub fn total_workers(&self) -> usize {
        self.stations.iter().map(|s| s.workers).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Order, Stage};

    #[test]
    fn test_defaults() {
        let config = KitchenConfig::default();
        assert_eq!(config.orders, 10);
        assert_eq!(config.max_toppings, 14);
        assert_eq!(config.time_unit_ms, 1000);
        let workers: Vec<_> = config.stations.iter().map(|s| s.workers).collect();
        assert_eq!(workers, vec![2, 3, 1, 2]);
        let bases: Vec<_> = config.stations.iter().map(|s| s.base_duration).collect();
        assert_eq!(bases, vec![7, 4, 10, 5]);
        assert_eq!(config.total_workers(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = KitchenConfig::from_json(r#"{ "orders": 3, "seed": 42 }"#).unwrap();
        assert_eq!(config.orders, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.stations.len(), 4);
        assert_eq!(config.stations[1].scaling, DurationScaling::PerTopping);
    }

    #[test]
    fn test_json_roundtrip_of_stations() {
        let json = r#"{
            "stations": [
                { "name": "prep", "workers": 1, "base_duration": 3 },
                { "name": "decorate", "workers": 2, "base_duration": 6, "scaling": "per_topping" }
            ]
        }"#;
        let config = KitchenConfig::from_json(json).unwrap();
        assert_eq!(config.stations[0].scaling, DurationScaling::Fixed);

        let seq = config.stage_sequence();
        let order = Order::new(0, 5);
        assert_eq!(seq.spec(Stage::Station(0)).unwrap().duration_for(&order), 3);
        assert_eq!(seq.spec(Stage::Station(1)).unwrap().duration_for(&order), 15);
        assert_eq!(seq.next(Stage::Station(1)).unwrap(), Stage::Done);

        let back = KitchenConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back.stations, config.stations);
    }

    #[test]
    fn test_invalid_config_error() {
        let config = KitchenConfig {
            orders: 0,
            ..KitchenConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(KitchenError::InvalidConfig(errors)) if errors.len() == 1
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            KitchenConfig::from_json("{ orders: "),
            Err(KitchenError::Json(_))
        ));
    }
}
