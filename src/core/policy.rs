use crate::core::toolchain::Toolchain;
use crate::error::{Result, TcslimError};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

const SEGGER_POLICY: &str = include_str!("../../policies/segger.toml");
const ARM_GNU_POLICY: &str = include_str!("../../policies/arm-gnu.toml");

/// Allow/deny rules applied to an installed toolchain tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrunePolicy {
    /// Directories, relative to the root, removed entirely.
    #[serde(default)]
    pub folders_to_delete: Vec<String>,
    /// Directories whose children are cleared except for the listed names.
    #[serde(default)]
    pub files_to_keep: Vec<KeepRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepRule {
    pub folder: String,
    pub keepers: Vec<String>,
}

impl KeepRule {
    pub fn keeps(&self, name: &str) -> bool {
        self.keepers.iter().any(|keeper| keeper == name)
    }
}

impl PrunePolicy {
    pub fn parse(content: &str) -> Result<Self> {
        let policy: PrunePolicy = toml::from_str(content)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            TcslimError::PolicyError { message } => {
                TcslimError::policy_error(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn builtin(toolchain: Toolchain) -> Result<Self> {
        let content = match toolchain {
            Toolchain::Segger => SEGGER_POLICY,
            Toolchain::ArmGnu => ARM_GNU_POLICY,
        };
        Self::parse(content)
    }

    pub fn validate(&self) -> Result<()> {
        for folder in &self.folders_to_delete {
            validate_folder(folder)?;
        }

        for rule in &self.files_to_keep {
            validate_folder(&rule.folder)?;
            for keeper in &rule.keepers {
                let mut components = Path::new(keeper).components();
                let is_bare_name = matches!(components.next(), Some(Component::Normal(_)))
                    && components.next().is_none();
                if !is_bare_name {
                    return Err(TcslimError::policy_error(format!(
                        "keeper '{keeper}' in '{}' must be a plain file name",
                        rule.folder
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn validate_folder(folder: &str) -> Result<()> {
    if folder.trim().is_empty() {
        return Err(TcslimError::policy_error("folder paths must not be empty"));
    }

    let path = Path::new(folder);
    let all_normal = path
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !all_normal || !path.components().any(|c| matches!(c, Component::Normal(_))) {
        return Err(TcslimError::policy_error(format!(
            "folder '{folder}' must be a relative path inside the toolchain root"
        )));
    }

    Ok(())
}
