use crate::error::{MetricsError, Result as MetricsResult};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RANKEVAL_CONFIG";
/// Config file looked up in the current directory when `RANKEVAL_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "rankeval.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rankeval: RankevalConfig,
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

/// Application-wide settings
#[derive(Debug, Clone, Deserialize)]
pub struct RankevalConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RankevalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Cutoffs used when the command line does not give any
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    /// K for NDCG@K and Recall@K
    #[serde(default = "default_k")]
    pub default_k: usize,
    /// Cutoffs for the Recall@K sweep
    #[serde(default = "default_cutoffs")]
    pub cutoffs: Vec<usize>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            cutoffs: default_cutoffs(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Decimal places printed for each score
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default)]
    pub json: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            json: false,
        }
    }
}

/// Minimum acceptable scores; `eval run` exits non-zero when one is missed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdConfig {
    pub mrr: Option<f64>,
    pub ndcg: Option<f64>,
    pub recall: Option<f64>,
}

fn default_k() -> usize {
    10
}

fn default_cutoffs() -> Vec<usize> {
    vec![1, 3, 5, 10]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_precision() -> usize {
    4
}

impl Config {
    /// Load configuration
    ///
    /// Loads environment variables from .env file (if present) first.
    /// Looks for the config file in this order:
    /// 1. Path specified in RANKEVAL_CONFIG environment variable (must exist)
    /// 2. ./rankeval.toml in current directory
    ///
    /// Falls back to defaults when neither is present.
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_path(Path::new(&path));
        }

        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            return Self::from_path(&default_path);
        }

        Ok(Self::default())
    }

    /// Load and validate a config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> MetricsResult<()> {
        if self.eval.default_k == 0 {
            return Err(MetricsError::Config(
                "eval.default_k must be greater than 0".to_string(),
            ));
        }

        if self.eval.cutoffs.iter().any(|&k| k == 0) {
            return Err(MetricsError::Config(
                "eval.cutoffs must all be greater than 0".to_string(),
            ));
        }

        if self.report.precision > 10 {
            return Err(MetricsError::Config(
                "report.precision must be at most 10".to_string(),
            ));
        }

        let thresholds = [
            ("mrr", self.thresholds.mrr),
            ("ndcg", self.thresholds.ndcg),
            ("recall", self.thresholds.recall),
        ];
        for (name, value) in thresholds {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(MetricsError::Config(format!(
                        "thresholds.{} must be between 0.0 and 1.0, got {}",
                        name, v
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    /// Restores cwd when dropped (e.g. on panic).
    struct CwdGuard(PathBuf);
    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    /// Runs `f` with RANKEVAL_CONFIG unset and cwd inside `dir`, restoring both afterwards.
    fn with_cwd_and_no_env<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        let original_env = std::env::var(CONFIG_ENV).ok();
        std::env::remove_var(CONFIG_ENV);
        let _cwd = CwdGuard(std::env::current_dir().unwrap());
        std::env::set_current_dir(dir).unwrap();
        let out = f();
        if let Some(v) = original_env {
            std::env::set_var(CONFIG_ENV, v);
        }
        out
    }

    fn write_config(temp_dir: &TempDir, content: &str) -> PathBuf {
        let path = temp_dir.path().join("rankeval.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.eval.default_k, 10);
        assert_eq!(config.eval.cutoffs, vec![1, 3, 5, 10]);
        assert_eq!(config.report.precision, 4);
        assert_eq!(config.rankeval.log_level, "info");
        assert!(config.thresholds.mrr.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_path_full() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"
[rankeval]
log_level = "debug"

[eval]
default_k = 5
cutoffs = [1, 2]

[report]
precision = 2
json = true

[thresholds]
mrr = 0.8
recall = 0.9
"#,
        );
        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.eval.default_k, 5);
        assert_eq!(config.eval.cutoffs, vec![1, 2]);
        assert_eq!(config.rankeval.log_level, "debug");
        assert!(config.report.json);
        assert_eq!(config.thresholds.mrr, Some(0.8));
        assert_eq!(config.thresholds.ndcg, None);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[report]\nprecision = 3\n");
        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.report.precision, 3);
        assert_eq!(config.eval.default_k, 10);
    }

    #[test]
    fn test_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[eval]\ndefault_k = 0\n");
        let err = Config::from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("default_k"));

        let path = write_config(&temp_dir, "[eval]\ncutoffs = [3, 0]\n");
        assert!(Config::from_path(&path).is_err());

        let path = write_config(&temp_dir, "[thresholds]\nndcg = 1.5\n");
        let err = Config::from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("thresholds.ndcg"));
    }

    #[test]
    fn test_negative_cutoff_rejected_at_parse() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[eval]\ndefault_k = -3\n");
        assert!(Config::from_path(&path).is_err());
    }

    #[test]
    fn test_load_from_env_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[eval]\ndefault_k = 7\n");
        let original = std::env::var(CONFIG_ENV).ok();
        std::env::set_var(CONFIG_ENV, &path);
        let config = Config::load();
        std::env::remove_var(CONFIG_ENV);
        if let Some(v) = original {
            std::env::set_var(CONFIG_ENV, v);
        }
        assert_eq!(config.unwrap().eval.default_k, 7);
    }

    #[test]
    fn test_load_invalid_env_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var(CONFIG_ENV).ok();
        std::env::set_var(CONFIG_ENV, "nonexistent.toml");
        let config = Config::load();
        std::env::remove_var(CONFIG_ENV);
        if let Some(v) = original {
            std::env::set_var(CONFIG_ENV, v);
        }
        assert!(config.is_err());
    }

    #[test]
    fn test_load_defaults_without_any_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config = with_cwd_and_no_env(temp_dir.path(), Config::load).unwrap();
        let defaults = Config::default();
        assert_eq!(config.eval.default_k, defaults.eval.default_k);
        assert_eq!(config.eval.cutoffs, defaults.eval.cutoffs);
        assert_eq!(config.report.precision, defaults.report.precision);
        assert_eq!(config.rankeval.log_level, defaults.rankeval.log_level);
        assert!(config.thresholds.recall.is_none());
    }

    #[test]
    fn test_load_from_current_dir_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        write_config(
            &temp_dir,
            "[rankeval]\nlog_level = \"warn\"\n\n[eval]\ndefault_k = 3\n\n[thresholds]\nmrr = 0.5\n",
        );
        let config = with_cwd_and_no_env(temp_dir.path(), Config::load).unwrap();
        assert_eq!(config.eval.default_k, 3);
        assert_eq!(config.rankeval.log_level, "warn");
        assert_eq!(config.thresholds.mrr, Some(0.5));
    }
}
