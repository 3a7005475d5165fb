/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::ConfigError;
use crate::shared::Floor;

/***************************************/
/*             Constants               */
/***************************************/
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_DOOR_OPEN_TICKS: u32 = 3;
pub const MAX_FLOORS: Floor = 100;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub buildings: Vec<BuildingConfig>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SchedulerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_door_open_ticks")]
    pub door_open_ticks: u32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BuildingConfig {
    pub name: String,
    pub owner: String,
    pub floors: Floor,
    pub elevators: u32,
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_door_open_ticks() -> u32 {
    DEFAULT_DOOR_OPEN_TICKS
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            door_open_ticks: DEFAULT_DOOR_OPEN_TICKS,
        }
    }
}

impl SchedulerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/***************************************/
/*             Public API              */
/***************************************/
impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Config::from_toml_str(&config_str)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.tick_interval_ms must be positive".into(),
            ));
        }
        if self.scheduler.door_open_ticks == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.door_open_ticks must be at least 1".into(),
            ));
        }

        for building in &self.buildings {
            if building.floors == 0 || building.floors > MAX_FLOORS {
                return Err(ConfigError::Invalid(format!(
                    "building '{}' has {} floors, expected 1..={}",
                    building.name, building.floors, MAX_FLOORS
                )));
            }
            if building.elevators == 0 {
                return Err(ConfigError::Invalid(format!(
                    "building '{}' needs at least one elevator",
                    building.name
                )));
            }
        }
        Ok(())
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_config_defaults_scheduler_section() {
        // Purpose: A file without [scheduler] falls back to a 5 s tick and 3 door ticks

        // Arrange
        let raw = r#"
            [[buildings]]
            name = "Main"
            owner = "admin"
            floors = 10
            elevators = 2
        "#;

        // Act
        let config = Config::from_toml_str(raw).unwrap();

        // Assert
        assert_eq!(config.scheduler.tick_interval(), Duration::from_secs(5));
        assert_eq!(config.scheduler.door_open_ticks, 3);
        assert_eq!(config.buildings.len(), 1);
        assert_eq!(config.buildings[0].floors, 10);
    }

    #[test]
    fn test_config_rejects_floor_count_out_of_range() {
        // Purpose: Buildings must have between 1 and 100 floors

        let raw = r#"
            [[buildings]]
            name = "Tower"
            owner = "admin"
            floors = 101
            elevators = 1
        "#;

        match Config::from_toml_str(raw) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("Tower")),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn test_config_rejects_building_without_elevators() {
        let raw = r#"
            [[buildings]]
            name = "Shed"
            owner = "admin"
            floors = 1
            elevators = 0
        "#;

        assert!(matches!(
            Config::from_toml_str(raw),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_config_reports_parse_error() {
        assert!(matches!(
            Config::from_toml_str("[scheduler\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
