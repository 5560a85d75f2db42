//! Settings and release input loading
//!
//! Settings are resolved with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. Config file (`--config <path>`, else `retag.yaml` / `retag.yml` in the working directory)
//! 3. Environment variables (RETAG_* prefix)
//!
//! Release inputs come from the CI environment through the CLI and are
//! handed to each operation as a plain value.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use tracing::debug;

/// Configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["retag.yaml", "retag.yml"];

/// Default repository namespace
pub const DEFAULT_REPOSITORY: &str = "temporalio/temporal";

/// Default name of the floating tag
pub const DEFAULT_LATEST_TAG: &str = "latest";

/// Release identifier for `resolve` and `check`
pub const ENV_RELEASE_TAG: &str = "RELEASE_TAG";

/// Version tag input for `update`
pub const ENV_INPUT_TAG: &str = "INPUT_TAG";

/// Digest input for `update`
pub const ENV_INPUT_SHA: &str = "INPUT_SHA";

/// Operational settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Repository namespace images are resolved into
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Name of the floating tag that gets moved
    #[serde(default = "default_latest_tag")]
    pub latest_tag: String,

    /// Registry tool binary (name looked up in PATH, or a path)
    #[serde(default = "default_docker_binary")]
    pub docker_binary: String,

    /// Upper bound on each registry tool invocation, in seconds
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            latest_tag: default_latest_tag(),
            docker_binary: default_docker_binary(),
            command_timeout_secs: default_command_timeout(),
        }
    }
}

fn default_repository() -> String {
    DEFAULT_REPOSITORY.to_string()
}

fn default_latest_tag() -> String {
    DEFAULT_LATEST_TAG.to_string()
}

fn default_docker_binary() -> String {
    "docker".to_string()
}

fn default_command_timeout() -> u64 {
    600
}

impl Settings {
    /// Check the settings are usable for building references
    pub fn validate(&self) -> Result<()> {
        if self.repository.trim().is_empty() {
            return Err(Error::invalid_config("repository must not be empty"));
        }
        let pinned = self.repository.contains('@')
            || self
                .repository
                .rsplit('/')
                .next()
                .is_some_and(|last| last.contains(':'));
        if pinned {
            return Err(Error::invalid_config(format!(
                "repository '{}' must not carry a tag or digest",
                self.repository
            )));
        }
        if self.latest_tag.trim().is_empty() {
            return Err(Error::invalid_config("latest-tag must not be empty"));
        }
        if self.docker_binary.trim().is_empty() {
            return Err(Error::invalid_config("docker-binary must not be empty"));
        }
        if self.command_timeout_secs == 0 {
            return Err(Error::invalid_config(
                "command-timeout-secs must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Settings loader with file discovery and environment overrides
pub struct SettingsLoader {
    /// Directory searched for retag.yaml
    working_dir: Utf8PathBuf,
}

impl SettingsLoader {
    /// Create a loader rooted at the current directory
    pub fn new() -> Result<Self> {
        let cwd = env::current_dir()?;
        let working_dir = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|p| Error::invalid_config(format!("Non UTF-8 working directory: {:?}", p)))?;
        Ok(Self { working_dir })
    }

    /// Create a loader rooted at a specific directory
    pub fn with_dir(working_dir: Utf8PathBuf) -> Self {
        Self { working_dir }
    }

    /// Load settings, honoring an explicit config path when given
    pub fn load(&self, explicit: Option<&Utf8Path>) -> Result<Settings> {
        let mut settings = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::config_not_found(path.as_str()));
                }
                Self::load_yaml_file(path)?
            }
            None => match self.find_config_file() {
                Some(path) => Self::load_yaml_file(&path)?,
                None => {
                    debug!("No retag config file found, using defaults");
                    Settings::default()
                }
            },
        };

        settings = Self::apply_env_overrides(settings)?;
        settings.validate()?;

        Ok(settings)
    }

    /// Find a config file in the working directory
    fn find_config_file(&self) -> Option<Utf8PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.working_dir.join(name))
            .find(|path| path.exists())
    }

    fn load_yaml_file(path: &Utf8Path) -> Result<Settings> {
        debug!("Loading settings from {}", path);
        let content = fs::read_to_string(path)?;
        // An empty file deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Apply RETAG_* environment overrides
    fn apply_env_overrides(mut settings: Settings) -> Result<Settings> {
        if let Some(val) = non_empty_var("RETAG_REPOSITORY") {
            settings.repository = val;
        }

        if let Some(val) = non_empty_var("RETAG_LATEST_TAG") {
            settings.latest_tag = val;
        }

        if let Some(val) = non_empty_var("RETAG_DOCKER") {
            settings.docker_binary = val;
        }

        if let Some(val) = non_empty_var("RETAG_TIMEOUT_SECS") {
            settings.command_timeout_secs = val
                .parse()
                .map_err(|_| Error::invalid_config("RETAG_TIMEOUT_SECS must be a valid number"))?;
        }

        Ok(settings)
    }

    /// Get the working directory
    pub fn working_dir(&self) -> &Utf8Path {
        &self.working_dir
    }
}

/// Inputs supplied by the calling pipeline
///
/// Empty strings are normalized to `None`, matching how CI runners pass
/// unset workflow inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseInputs {
    /// Release identifier (`RELEASE_TAG`)
    pub release_tag: Option<String>,
    /// Version tag to promote (`INPUT_TAG`)
    pub tag_input: Option<String>,
    /// Digest to promote (`INPUT_SHA`)
    pub sha_input: Option<String>,
}

impl ReleaseInputs {
    /// Build inputs, dropping empty values
    pub fn new(
        release_tag: Option<String>,
        tag_input: Option<String>,
        sha_input: Option<String>,
    ) -> Self {
        Self {
            release_tag: release_tag.and_then(non_empty),
            tag_input: tag_input.and_then(non_empty),
            sha_input: sha_input.and_then(non_empty),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().and_then(non_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_temp_loader() -> (SettingsLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        (SettingsLoader::with_dir(dir), temp_dir)
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        let (loader, _temp) = create_temp_loader();
        let settings = loader.load(None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.repository, "temporalio/temporal");
        assert_eq!(settings.latest_tag, "latest");
        assert_eq!(settings.command_timeout_secs, 600);
    }

    #[test]
    #[serial]
    fn test_load_from_discovered_file() {
        let (loader, _temp) = create_temp_loader();
        let config_content = r#"
repository: temporalio/admin-tools
command-timeout-secs: 120
"#;
        fs::write(loader.working_dir().join("retag.yaml"), config_content).unwrap();

        let settings = loader.load(None).unwrap();
        assert_eq!(settings.repository, "temporalio/admin-tools");
        assert_eq!(settings.command_timeout_secs, 120);
        assert_eq!(settings.latest_tag, "latest");
    }

    #[test]
    #[serial]
    fn test_explicit_path_missing() {
        let (loader, _temp) = create_temp_loader();
        let missing = loader.working_dir().join("nope.yaml");
        let err = loader.load(Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    #[serial]
    fn test_empty_file_uses_defaults() {
        let (loader, _temp) = create_temp_loader();
        let path = loader.working_dir().join("retag.yml");
        fs::write(&path, "").unwrap();
        assert_eq!(loader.load(Some(&path)).unwrap(), Settings::default());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("RETAG_REPOSITORY", "temporalio/server");
        env::set_var("RETAG_TIMEOUT_SECS", "30");

        let settings = loader.load(None).unwrap();
        assert_eq!(settings.repository, "temporalio/server");
        assert_eq!(settings.command_timeout_secs, 30);

        env::remove_var("RETAG_REPOSITORY");
        env::remove_var("RETAG_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_env_override_invalid_number() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("RETAG_TIMEOUT_SECS", "soon");
        let err = loader.load(None).unwrap_err();
        env::remove_var("RETAG_TIMEOUT_SECS");

        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_validate_rejects_tagged_repository() {
        let settings = Settings {
            repository: "temporalio/temporal:1.22.0".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            repository: "localhost:5000/temporal".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let settings = Settings {
            command_timeout_secs: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_release_inputs_drop_empty_values() {
        let inputs = ReleaseInputs::new(
            Some(String::new()),
            Some("v1.22.0".into()),
            Some("  ".into()),
        );
        assert_eq!(inputs.release_tag, None);
        assert_eq!(inputs.tag_input.as_deref(), Some("v1.22.0"));
        assert_eq!(inputs.sha_input, None);
    }
}
