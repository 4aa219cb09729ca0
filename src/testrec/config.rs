use crate::error::{RecordError, Result};
use crate::model::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATABASE: &str = "test_records.csv";
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

pub const CONFIG_KEYS: [&str; 3] = ["database", "capacity", "max-attempts"];

/// Configuration for testrec, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordConfig {
    /// Database file used when `--db` is not given
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Maximum number of records a database may hold
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// How many times an interactive prompt re-asks before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            capacity: default_capacity(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl RecordConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&config_path).map_err(|e| RecordError::file(&config_path, e))?;
        let config: RecordConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(|e| RecordError::file(config_dir, e))?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content).map_err(|e| RecordError::file(&config_path, e))?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "database" => Some(self.database.display().to_string()),
            "capacity" => Some(self.capacity.to_string()),
            "max-attempts" => Some(self.max_attempts.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "database" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(RecordError::Config("database cannot be empty".into()));
                }
                self.database = PathBuf::from(value);
            }
            "capacity" => self.capacity = parse_at_least_one(key, value)?,
            "max-attempts" => self.max_attempts = parse_at_least_one(key, value)?,
            _ => return Err(RecordError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }
}

fn parse_at_least_one<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
{
    match value.trim().parse::<T>() {
        Ok(n) if n >= T::from(1) => Ok(n),
        _ => Err(RecordError::Config(format!(
            "{} must be a whole number of at least 1, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RecordConfig::default();
        assert_eq!(config.capacity, 10_000);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.database, PathBuf::from("test_records.csv"));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = RecordConfig::load(dir.path().join("absent")).unwrap();
        assert_eq!(config, RecordConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();

        let mut config = RecordConfig::default();
        config.set("capacity", "250").unwrap();
        config.set("database", "/tmp/runs.csv").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = RecordConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.capacity, 250);
        assert_eq!(loaded.database, PathBuf::from("/tmp/runs.csv"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"capacity": 5}"#).unwrap();

        let loaded = RecordConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.capacity, 5);
        assert_eq!(loaded.max_attempts, 3);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = RecordConfig::default();
        assert!(config.set("capacity", "0").is_err());
        assert!(config.set("max-attempts", "lots").is_err());
        assert!(config.set("database", "  ").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, RecordConfig::default());
    }

    #[test]
    fn test_get_known_keys() {
        let config = RecordConfig::default();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_some(), "{} should be readable", key);
        }
        assert_eq!(config.get("nope"), None);
    }
}
