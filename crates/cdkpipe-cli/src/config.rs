//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. `CDKPIPE_*` environment variables, `__` between sections
//!    (`CDKPIPE_DEFAULTS__REGION=us-east-1`)
//! 2. Config file (`--config`, or `config.toml` in the platform config dir)
//! 3. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use cdkpipe_core::domain::{GitProtocol, Region};

const ENV_PREFIX: &str = "CDKPIPE";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pre-selected answers offered by the prompts.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
    /// Child process settings.
    pub process: ProcessConfig,
    /// AWS tooling.
    pub aws: AwsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub region: Region,
    pub git_protocol: GitProtocol,
    pub bootstrap: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            region: Region::default(),
            git_protocol: GitProtocol::Https,
            bootstrap: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory whose files replace the built-in templates.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Kill a child command after this many seconds. Unset waits forever.
    pub timeout_secs: Option<u64>,
}

impl ProcessConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// The `aws` executable.
    pub cli: String,
    /// Shared credentials file used for profile discovery.
    pub credentials_file: Option<PathBuf>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            cli: "aws".into(),
            credentials_file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the file and the environment.
    ///
    /// `config_file` is the path passed via `--config`; it must exist. With
    /// `None`, the default location is used when present.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with(config_file, environment())
    }

    fn load_with(config_file: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path.to_path_buf())
                .format(FileFormat::Toml)
                .required(true),
            None => File::from(Self::config_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(env)
            .build()
            .context("cannot read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.cdkpipe.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "cdkpipe", "cdkpipe")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".cdkpipe.toml"))
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn no_env() -> Environment {
        environment().source(Some(config::Map::new()))
    }

    fn env_of(pairs: &[(&str, &str)]) -> Environment {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("cdkpipe.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn built_in_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.region, Region::EuWest1);
        assert_eq!(cfg.defaults.git_protocol, GitProtocol::Https);
        assert!(!cfg.defaults.bootstrap);
        assert_eq!(cfg.aws.cli, "aws");
        assert_eq!(cfg.process.timeout(), None);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[defaults]
region = "us-east-1"
git_protocol = "ssh"

[process]
timeout_secs = 900

[templates]
local_path = "/opt/cdkpipe/templates"
"#,
        );

        let cfg = AppConfig::load_with(Some(&path), no_env()).unwrap();
        assert_eq!(cfg.defaults.region, Region::UsEast1);
        assert_eq!(cfg.defaults.git_protocol, GitProtocol::Ssh);
        assert!(!cfg.defaults.bootstrap);
        assert_eq!(cfg.process.timeout(), Some(Duration::from_secs(900)));
        assert_eq!(
            cfg.templates.local_path,
            Some(PathBuf::from("/opt/cdkpipe/templates"))
        );
        assert_eq!(cfg.aws.cli, "aws");
    }

    #[test]
    fn environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[defaults]\nregion = \"us-east-1\"\n");

        let cfg = AppConfig::load_with(
            Some(&path),
            env_of(&[
                ("CDKPIPE_DEFAULTS__REGION", "ap-southeast-2"),
                ("CDKPIPE_DEFAULTS__BOOTSTRAP", "true"),
                ("CDKPIPE_AWS__CLI", "/usr/local/bin/aws"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.defaults.region, Region::ApSoutheast2);
        assert!(cfg.defaults.bootstrap);
        assert_eq!(cfg.aws.cli, "/usr/local/bin/aws");
    }

    #[test]
    fn unsupported_region_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[defaults]\nregion = \"mars-north-1\"\n");
        assert!(AppConfig::load_with(Some(&path), no_env()).is_err());
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(AppConfig::load_with(Some(&missing), no_env()).is_err());
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        let process = ProcessConfig {
            timeout_secs: Some(0),
        };
        assert_eq!(process.timeout(), None);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
