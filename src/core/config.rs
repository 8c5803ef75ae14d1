use crate::core::policy::PrunePolicy;
use crate::core::toolchain::{Materialize, Toolchain};
use crate::error::{Result, TcslimError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "tcslim.toml";
pub const PLATFORM_ARCHIVE_NAME: &str = "linux-x64.zip";

/// Per-toolchain settings from `tcslim.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainOverrides {
    pub version: Option<String>,
    pub url: Option<String>,
    /// Policy file, relative to the base directory unless absolute.
    pub policy: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    toolchains: BTreeMap<String, ToolchainOverrides>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub toolchains: BTreeMap<String, ToolchainOverrides>,
}

/// Everything a single toolchain job needs, resolved up front.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub toolchain: Toolchain,
    pub version: String,
    pub url: String,
    pub materialize: Materialize,
    /// Holds the fetched archive and, for installer toolchains, its unpacked contents.
    pub downloads_dir: PathBuf,
    pub archive_path: PathBuf,
    /// Tree that gets pruned and packaged.
    pub staging_dir: PathBuf,
    pub zip_path: PathBuf,
    pub policy: PrunePolicy,
}

impl Config {
    pub fn new(base_dir: PathBuf) -> Self {
        Config {
            base_dir,
            toolchains: BTreeMap::new(),
        }
    }

    /// Load `tcslim.toml` from `base_dir` if it exists.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let config_path = base_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::new(base_dir.to_path_buf()));
        }

        let content = std::fs::read_to_string(&config_path)?;
        let file: ConfigFile = toml::from_str(&content)?;

        for name in file.toolchains.keys() {
            if !Toolchain::ALL.iter().any(|t| t.name() == name) {
                return Err(TcslimError::config_error(format!(
                    "unknown toolchain '{name}' in {}",
                    config_path.display()
                )));
            }
        }

        tracing::debug!(path = %config_path.display(), "loaded configuration file");
        Ok(Config {
            base_dir: base_dir.to_path_buf(),
            toolchains: file.toolchains,
        })
    }

    pub fn downloads_dir(&self, toolchain: Toolchain) -> PathBuf {
        self.base_dir.join("downloads").join(toolchain.name())
    }

    pub fn staging_dir(&self, toolchain: Toolchain) -> PathBuf {
        self.base_dir.join("tools").join(toolchain.name())
    }

    pub fn zip_path(&self, toolchain: Toolchain, version: &str) -> PathBuf {
        self.base_dir
            .join("zips")
            .join(format!("{}-{version}", toolchain.name()))
            .join(PLATFORM_ARCHIVE_NAME)
    }

    fn overrides(&self, toolchain: Toolchain) -> Option<&ToolchainOverrides> {
        self.toolchains.get(toolchain.name())
    }

    /// Version from the environment, then the config file, then the built-in default.
    pub fn resolve_version<F>(&self, toolchain: Toolchain, env: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let version = env(toolchain.version_env_var())
            .filter(|v| !v.is_empty())
            .or_else(|| self.overrides(toolchain).and_then(|o| o.version.clone()))
            .unwrap_or_else(|| toolchain.default_version().to_string());

        validate_version(&version)?;
        Ok(version)
    }

    pub fn resolve_policy(&self, toolchain: Toolchain) -> Result<PrunePolicy> {
        match self.overrides(toolchain).and_then(|o| o.policy.as_ref()) {
            Some(path) => PrunePolicy::load(&self.base_dir.join(path)),
            None => PrunePolicy::builtin(toolchain),
        }
    }

    pub fn job(&self, toolchain: Toolchain) -> Result<JobConfig> {
        self.job_with_env(toolchain, |key| std::env::var(key).ok())
    }

    pub fn job_with_env<F>(&self, toolchain: Toolchain, env: F) -> Result<JobConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let version = self.resolve_version(toolchain, env)?;
        let url = self
            .overrides(toolchain)
            .and_then(|o| o.url.clone())
            .unwrap_or_else(|| toolchain.download_url(&version));
        let downloads_dir = self.downloads_dir(toolchain);

        Ok(JobConfig {
            toolchain,
            materialize: toolchain.materialize(&version),
            archive_path: downloads_dir.join(toolchain.archive_file_name(&version)),
            downloads_dir,
            staging_dir: self.staging_dir(toolchain),
            zip_path: self.zip_path(toolchain, &version),
            policy: self.resolve_policy(toolchain)?,
            url,
            version,
        })
    }
}

pub fn validate_version(version: &str) -> Result<()> {
    let valid = version.chars().any(|c| c.is_ascii_alphanumeric())
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if !valid {
        return Err(TcslimError::InvalidVersion {
            version: version.to_string(),
        });
    }
    Ok(())
}
