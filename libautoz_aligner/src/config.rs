use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::machine::MachineType;

/// Structure representing the application configuration. Contains the machine type and
/// the paths of the log pair to analyze.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub machine: MachineType,
    pub autoz_log_path: PathBuf,
    pub all_log_path: PathBuf,
    #[serde(default)]
    pub report_path: Option<PathBuf>,
    /// Completion marker searched for in ETS88 and Accotest AutoZ logs
    #[serde(default)]
    pub ets88_marker: Option<String>,
}

impl Default for Config {
    /// Generate a new Config object. All paths will be empty/invalid
    fn default() -> Self {
        Self {
            machine: MachineType::default(),
            autoz_log_path: PathBuf::from("None"),
            all_log_path: PathBuf::from("None"),
            report_path: None,
            ets88_marker: None,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        match Config::read_config_file(&dir.path().join("config.yml")) {
            Err(ConfigError::BadFilePath(_)) => (),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_template_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        let mut config = Config::default();
        config.machine = MachineType::Accotest;
        config.ets88_marker = Some(String::from("AutoZ Done"));
        config.write_config_file(&path).unwrap();
        assert_eq!(Config::read_config_file(&path).unwrap(), config);
    }

    #[test]
    fn test_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "machine: T2K\nautoz_log_path: /data/AutoZLog.txt\nall_log_path: /data/ALL.txt\n",
        )
        .unwrap();
        let config = Config::read_config_file(&path).unwrap();
        assert_eq!(config.machine, MachineType::T2k);
        assert!(config.report_path.is_none());
        assert!(config.ets88_marker.is_none());
    }

    #[test]
    fn test_bad_machine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "machine: V93000\nautoz_log_path: a.txt\nall_log_path: b.txt\n",
        )
        .unwrap();
        assert!(matches!(
            Config::read_config_file(&path),
            Err(ConfigError::ParsingError(_))
        ));
    }
}
