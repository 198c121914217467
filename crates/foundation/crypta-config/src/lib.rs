//! Crypta analysis configuration
//!
//! Settings shared by the cryptanalysis pipeline: the key-size search
//! range, how many block pairs the estimator averages, the ECB block size
//! and the reference corpus used to build a frequency model.
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - `~/.config/crypta/config.yaml` (or an explicit path)
//! - `CRYPTA_*` environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_MIN_KEY_SIZE: &str = "CRYPTA_MIN_KEY_SIZE";
pub const ENV_MAX_KEY_SIZE: &str = "CRYPTA_MAX_KEY_SIZE";
pub const ENV_KEY_SIZE_SAMPLES: &str = "CRYPTA_KEY_SIZE_SAMPLES";
pub const ENV_BLOCK_SIZE: &str = "CRYPTA_BLOCK_SIZE";
pub const ENV_CORPUS: &str = "CRYPTA_CORPUS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: String, value: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for crypta_core::Error {
    fn from(err: ConfigError) -> Self {
        crypta_core::Error::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Smallest repeating-key length to try (inclusive)
    pub min_key_size: usize,
    /// Largest repeating-key length to try (inclusive)
    pub max_key_size: usize,
    /// 1 compares the first block pair only; larger values average over
    /// `max_key_size * 4 * (samples + 1)` bytes of ciphertext
    pub key_size_samples: usize,
    /// Block size for ECB detection
    pub block_size: usize,
    /// Reference text for the character frequency model
    pub corpus_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_key_size: 2,
            max_key_size: 40,
            key_size_samples: 1,
            block_size: 16,
            corpus_path: None,
        }
    }
}

impl AnalysisConfig {
    /// `~/.config/crypta/config.yaml` on Linux; platform equivalent elsewhere
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("crypta").join("config.yaml"))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), "Loaded analysis config");
        Ok(config)
    }

    /// Read the default config file if there is one.
    ///
    /// A missing file is not an error. A broken one is logged and ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Apply `CRYPTA_*` environment variables on top of this config
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|var| std::env::var(var).ok())
    }

    /// Same as [`with_env_overrides`](Self::with_env_overrides) with an
    /// explicit variable lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |var: &str| -> Result<Option<usize>> {
            match lookup(var) {
                Some(value) => value
                    .trim()
                    .parse::<usize>()
                    .map(Some)
                    .map_err(|_| ConfigError::InvalidEnv {
                        var: var.to_string(),
                        value,
                    }),
                None => Ok(None),
            }
        };

        if let Some(n) = number(ENV_MIN_KEY_SIZE)? {
            self.min_key_size = n;
        }
        if let Some(n) = number(ENV_MAX_KEY_SIZE)? {
            self.max_key_size = n;
        }
        if let Some(n) = number(ENV_KEY_SIZE_SAMPLES)? {
            self.key_size_samples = n;
        }
        if let Some(n) = number(ENV_BLOCK_SIZE)? {
            self.block_size = n;
        }
        if let Some(path) = lookup(ENV_CORPUS) {
            self.corpus_path = Some(PathBuf::from(path));
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_key_size == 0 {
            return Err(ConfigError::Invalid("min_key_size must be at least 1".into()));
        }
        if self.min_key_size > self.max_key_size {
            return Err(ConfigError::Invalid(format!(
                "min_key_size ({}) exceeds max_key_size ({})",
                self.min_key_size, self.max_key_size
            )));
        }
        if self.key_size_samples == 0 {
            return Err(ConfigError::Invalid("key_size_samples must be at least 1".into()));
        }
        if self.block_size == 0 {
            return Err(ConfigError::Invalid("block_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Ciphertext bytes needed to run the configured key-size search
    pub fn min_ciphertext_len(&self) -> usize {
        self.max_key_size
            .saturating_mul(4)
            .saturating_mul(self.key_size_samples.saturating_add(1))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.min_key_size, 2);
        assert_eq!(config.max_key_size, 40);
        assert_eq!(config.key_size_samples, 1);
        assert_eq!(config.block_size, 16);
        assert!(config.corpus_path.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.min_ciphertext_len(), 320);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AnalysisConfig::from_yaml_str("max_key_size: 12\nkey_size_samples: 3\n").unwrap();
        assert_eq!(config.min_key_size, 2);
        assert_eq!(config.max_key_size, 12);
        assert_eq!(config.key_size_samples, 3);
        assert_eq!(config.min_ciphertext_len(), 12 * 4 * 4);
    }

    #[test]
    fn test_yaml_rejects_inverted_range() {
        let err = AnalysisConfig::from_yaml_str("min_key_size: 9\nmax_key_size: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_yaml_parse_error() {
        let err = AnalysisConfig::from_yaml_str("max_key_size: [oops").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "block_size: 8").unwrap();
        writeln!(file, "corpus_path: /data/english.txt").unwrap();

        let config = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(config.block_size, 8);
        assert_eq!(config.corpus_path, Some(PathBuf::from("/data/english.txt")));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AnalysisConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = AnalysisConfig {
            min_key_size: 3,
            max_key_size: 9,
            key_size_samples: 2,
            block_size: 8,
            corpus_path: Some(PathBuf::from("corpus.txt")),
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(AnalysisConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let config = AnalysisConfig::default()
            .with_overrides_from(lookup(&[
                (ENV_MAX_KEY_SIZE, "13"),
                (ENV_KEY_SIZE_SAMPLES, " 2 "),
                (ENV_CORPUS, "/tmp/corpus.txt"),
            ]))
            .unwrap();

        assert_eq!(config.min_key_size, 2);
        assert_eq!(config.max_key_size, 13);
        assert_eq!(config.key_size_samples, 2);
        assert_eq!(config.corpus_path, Some(PathBuf::from("/tmp/corpus.txt")));
    }

    #[test]
    fn test_env_override_not_a_number() {
        let err = AnalysisConfig::default()
            .with_overrides_from(lookup(&[(ENV_BLOCK_SIZE, "sixteen")]))
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                var: ENV_BLOCK_SIZE.to_string(),
                value: "sixteen".to_string(),
            }
        );
    }

    #[test]
    fn test_env_override_validated() {
        let err = AnalysisConfig::default()
            .with_overrides_from(lookup(&[(ENV_MIN_KEY_SIZE, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_into_core_error() {
        let err: crypta_core::Error = ConfigError::Invalid("block_size must be at least 1".into()).into();
        assert!(matches!(err, crypta_core::Error::InvalidConfig(_)));
    }
}
