use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Numeric type the machine runs the program on.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    #[default]
    I8,
    I16,
    I32,
    I64,
    F64,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum number of values on the operand stack. Unbounded when absent.
    pub max_stack_depth: Option<usize>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Assembly source to run.
    pub program_file: String,
    #[serde(default)]
    pub numeric: NumericKind,
    #[serde(default)]
    pub vm: VmConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.program_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "program_file must not be empty".to_string(),
            ));
        }
        if self.vm.max_stack_depth == Some(0) {
            return Err(ConfigError::Invalid(
                "vm.max_stack_depth must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::parse(r#"program_file = "programs/composite.asm""#).unwrap();
        assert_eq!(config.program_file, "programs/composite.asm");
        assert_eq!(config.numeric, NumericKind::I8);
        assert_eq!(config.vm, VmConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            program_file = "prog.asm"
            numeric = "f64"

            [vm]
            max_stack_depth = 32
            "#,
        )
        .unwrap();
        assert_eq!(config.numeric, NumericKind::F64);
        assert_eq!(config.vm.max_stack_depth, Some(32));
    }

    #[test]
    fn test_unknown_numeric_kind_is_rejected() {
        let result = Config::parse(
            r#"
            program_file = "prog.asm"
            numeric = "u8"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = Config::parse(r#"program_file = "  ""#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.program_file = "prog.asm".to_string();
        config.vm.max_stack_depth = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(ConfigError::FileReadError(_))));
    }
}
