use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Clause keywords the structural validator accepts by default.
pub const DEFAULT_CLAUSE_KEYWORDS: [&str; 10] = [
    "MATCH", "CREATE", "MERGE", "RETURN", "WITH", "WHERE", "UNWIND", "SET", "DELETE", "REMOVE",
];

/// Query builder configuration with validation
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Run the structural validator in `build()`
    pub validate_on_build: bool,

    /// Report `$name` references that have no bound value
    pub strict_mode: bool,

    /// Variable-length upper bound above which a warning is logged
    #[validate(range(
        min = 1,
        max = 1000,
        message = "Max hops warning threshold must be between 1 and 1000"
    ))]
    pub max_hops_warning: u32,

    /// Keywords that count as a valid clause for the structural check
    #[validate(length(min = 1, message = "At least one clause keyword is required"))]
    pub clause_keywords: Vec<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            validate_on_build: true,
            strict_mode: false,
            max_hops_warning: 100,
            clause_keywords: DEFAULT_CLAUSE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl BuilderConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            validate_on_build: parse_env_var("CYPHER_NORM_VALIDATE_ON_BUILD", "true")?,
            strict_mode: parse_env_var("CYPHER_NORM_STRICT_MODE", "false")?,
            max_hops_warning: parse_env_var("CYPHER_NORM_MAX_HOPS_WARNING", "100")?,
            clause_keywords: match env_value("CYPHER_NORM_CLAUSE_KEYWORDS")? {
                Some(list) => split_keywords(&list),
                None => Self::default().clause_keywords,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file. Missing keys take their defaults.
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

fn split_keywords(list: &str) -> Vec<String> {
    list.split(',')
        .map(|k| k.trim().to_uppercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Unset is `None`; a value that is not valid UTF-8 is an error.
fn env_value(key: &str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env_value(key)?.unwrap_or_else(|| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
