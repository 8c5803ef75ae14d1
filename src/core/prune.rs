use crate::core::policy::PrunePolicy;
use crate::error::{Result, TcslimError};
use crate::utils::fs::remove_path;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    /// Whole folders removed via `folders_to_delete`.
    pub folders_removed: Vec<PathBuf>,
    /// Entries removed from keep-list folders.
    pub entries_removed: Vec<PathBuf>,
}

impl PruneReport {
    pub fn is_empty(&self) -> bool {
        self.folders_removed.is_empty() && self.entries_removed.is_empty()
    }
}

/// Apply `policy` to the tree under `root`.
///
/// Deleted folders that are already gone are skipped. A keep-list folder that
/// does not exist is an error, since the policy no longer matches the tree.
pub fn prune(root: &Path, policy: &PrunePolicy) -> Result<PruneReport> {
    if !root.is_dir() {
        return Err(TcslimError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    policy.validate()?;

    println!("Deleting unneeded files/folders");
    let mut report = PruneReport::default();

    for folder in &policy.folders_to_delete {
        let folder_path = root.join(folder);
        if std::fs::symlink_metadata(&folder_path).is_ok() {
            println!("... removing folder {}", folder_path.display());
            remove_path(&folder_path)?;
            report.folders_removed.push(folder_path);
        }
    }

    for rule in &policy.files_to_keep {
        let folder_path = root.join(&rule.folder);
        if !folder_path.is_dir() {
            return Err(TcslimError::DirectoryNotFound { path: folder_path });
        }

        println!("... removing files from {}", folder_path.display());
        let mut children = std::fs::read_dir(&folder_path)?.collect::<std::io::Result<Vec<_>>>()?;
        children.sort_by_key(|entry| entry.file_name());

        for child in children {
            let name = child.file_name();
            if name.to_str().is_some_and(|name| rule.keeps(name)) {
                continue;
            }

            let child_path = child.path();
            tracing::debug!(path = %child_path.display(), "removing entry outside keep-list");
            remove_path(&child_path)?;
            report.entries_removed.push(child_path);
        }
    }

    Ok(report)
}
