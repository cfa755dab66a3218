use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional TOML config file. Every field has a CLI or built-in fallback,
/// so an empty file (or none at all) is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub directory: Option<DirectorySection>,
    pub batch: Option<BatchSection>,
    pub providers: Option<ProvidersSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySection {
    pub csv: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSection {
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersSection {
    pub timeout_secs: Option<u64>,
    pub ontopo_base_url: Option<String>,
    pub tabit_base_url: Option<String>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            CheckError::config(format!(
                "cannot read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed)
            .map_err(|e| CheckError::config(format!("TOML parsing error: {}", e)))
    }

    /// Replace `${VAR_NAME}` references with environment values; unknown
    /// variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn csv_path(&self) -> Option<&str> {
        self.directory.as_ref().and_then(|d| d.csv.as_deref())
    }

    pub fn workers(&self) -> Option<usize> {
        self.batch.as_ref().and_then(|b| b.workers)
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.providers.as_ref().and_then(|p| p.timeout_secs)
    }

    pub fn ontopo_base_url(&self) -> Option<&str> {
        self.providers
            .as_ref()
            .and_then(|p| p.ontopo_base_url.as_deref())
    }

    pub fn tabit_base_url(&self) -> Option<&str> {
        self.providers
            .as_ref()
            .and_then(|p| p.tabit_base_url.as_deref())
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(workers) = self.workers() {
            validation::validate_worker_count(workers)?;
        }
        if let Some(url) = self.ontopo_base_url() {
            validation::validate_url("providers.ontopo_base_url", url)?;
        }
        if let Some(url) = self.tabit_base_url() {
            validation::validate_url("providers.tabit_base_url", url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_config() {
        let toml_content = r#"
[directory]
csv = "data/restaurants.csv"

[batch]
workers = 4

[providers]
timeout_secs = 10
ontopo_base_url = "https://ontopo.example.com/api"
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.csv_path(), Some("data/restaurants.csv"));
        assert_eq!(config.workers(), Some(4));
        assert_eq!(config.timeout_secs(), Some(10));
        assert_eq!(
            config.ontopo_base_url(),
            Some("https://ontopo.example.com/api")
        );
        assert_eq!(config.tabit_base_url(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = FileConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.csv_path(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_TABIT_BASE", "https://tabit.test");

        let toml_content = r#"
[providers]
tabit_base_url = "${TEST_TABIT_BASE}"
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.tabit_base_url(), Some("https://tabit.test"));

        std::env::remove_var("TEST_TABIT_BASE");
    }

    #[test]
    fn test_invalid_url_fails_validation() {
        let toml_content = r#"
[providers]
ontopo_base_url = "not-a-url"
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_workers_fails_validation() {
        let config = FileConfig::from_toml_str("[batch]\nworkers = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[batch]\nworkers = 7\n")
            .unwrap();

        let config = FileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.workers(), Some(7));
    }
}
