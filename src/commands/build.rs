use crate::core::config::{Config, JobConfig};
use crate::core::download::Downloader;
use crate::core::pipeline::run_jobs;
use crate::core::toolchain::Toolchain;
use crate::error::Result;
use crate::utils::fs::format_mib;

/// Build slim archives for `toolchains`, or for every known toolchain when
/// the list is empty.
pub fn build_toolchains(config: &Config, toolchains: &[Toolchain]) -> Result<()> {
    let selected: Vec<Toolchain> = if toolchains.is_empty() {
        Toolchain::ALL.to_vec()
    } else {
        let mut selected = Vec::new();
        for toolchain in toolchains {
            if !selected.contains(toolchain) {
                selected.push(*toolchain);
            }
        }
        selected
    };

    // Resolve every job before touching the network so a bad version or
    // policy fails fast.
    let jobs = selected
        .iter()
        .map(|toolchain| config.job(*toolchain))
        .collect::<Result<Vec<JobConfig>>>()?;

    let downloader = Downloader::new()?;
    let reports = run_jobs(&jobs, &downloader)?;

    println!();
    println!("Summary:");
    for (job, report) in jobs.iter().zip(&reports) {
        println!(
            "  • {} {}: downloaded {}, removed {} folders and {} entries, packaged {} entries ({}) -> {}",
            job.toolchain,
            job.version,
            format_mib(report.downloaded_bytes),
            report.prune.folders_removed.len(),
            report.prune.entries_removed.len(),
            report.package.entries,
            format_mib(report.package.archive_bytes),
            report.zip_path.display()
        );
    }

    Ok(())
}
