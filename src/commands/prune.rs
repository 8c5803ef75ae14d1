use crate::core::config::Config;
use crate::core::prune::prune;
use crate::core::toolchain::Toolchain;
use crate::error::Result;
use std::path::Path;

/// Apply the resolved policy of `toolchain` to an already installed tree.
pub fn prune_directory(config: &Config, toolchain: Toolchain, dir: &Path) -> Result<()> {
    let policy = config.resolve_policy(toolchain)?;
    let report = prune(dir, &policy)?;

    if report.is_empty() {
        println!("Nothing to remove, {} already matches the {toolchain} policy", dir.display());
    } else {
        println!(
            "Removed {} folders and {} entries",
            report.folders_removed.len(),
            report.entries_removed.len()
        );
    }
    Ok(())
}
