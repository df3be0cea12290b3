use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::machine::Mode;
use crate::render::DEFAULT_FIELD_WIDTH;

/// Which half of the settled beans to keep after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Keep {
    Upper,
    Lower,
}

/// Machine and experiment configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub slot_count: usize,
    pub bean_count: usize,
    pub mode: Mode,
    /// Fixed seed for reproducible runs; OS entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Characters per slot when printing the board.
    pub field_width: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep: Option<Keep>,
    /// Extra runs of the same beans after the first one.
    pub repeats: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            slot_count: 10,
            bean_count: 400,
            mode: Mode::Luck,
            seed: None,
            field_width: DEFAULT_FIELD_WIDTH,
            keep: None,
            repeats: 0,
        }
    }
}

impl MachineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: MachineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_count == 0 {
            return Err(ConfigError::Validation(
                "slot_count must be >= 1".into(),
            ));
        }
        if self.field_width < 2 {
            return Err(ConfigError::Validation(
                "field_width must be >= 2".into(),
            ));
        }
        // Rows are indented by half a field.
        if self.field_width % 2 != 0 {
            return Err(ConfigError::Validation(
                "field_width must be even".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&MachineConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = MachineConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
slot_count = 20
mode = "skill"
"#;
        let config: MachineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.slot_count, 20);
        assert_eq!(config.mode, Mode::Skill);
        assert_eq!(config.bean_count, 400);
        assert_eq!(config.seed, None);
        assert_eq!(config.keep, None);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: MachineConfig = toml::from_str("").unwrap();
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn test_keep_and_seed_parse() {
        let config: MachineConfig = toml::from_str("keep = \"lower\"\nseed = 42\n").unwrap();
        assert_eq!(config.keep, Some(Keep::Lower));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result: Result<MachineConfig, _> = toml::from_str("mode = \"chance\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_slots() {
        let mut config = MachineConfig::default();
        config.slot_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_narrow_field() {
        let mut config = MachineConfig::default();
        config.field_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_odd_field() {
        let mut config = MachineConfig::default();
        config.field_width = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            MachineConfig::load_or_default(Path::new("nonexistent_bean_counter.toml")).unwrap();
        assert_eq!(config.slot_count, 10);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bean_counter.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
bean_count = 25
repeats = 2
"#
        )
        .unwrap();

        let config = MachineConfig::load(&path).unwrap();
        assert_eq!(config.bean_count, 25);
        assert_eq!(config.repeats, 2);
        assert_eq!(config.slot_count, 10);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bean_counter.toml");
        std::fs::write(&path, "slot_count = 0\n").unwrap();
        assert!(matches!(
            MachineConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = MachineConfig::default_toml();
        let config: MachineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, MachineConfig::default());
    }
}
