//! One toolchain job: download, materialize, prune, package.

use crate::core::config::JobConfig;
use crate::core::download::{resolve_single_root, Downloader};
use crate::core::installer::SilentInstaller;
use crate::core::package::{package, PackageReport};
use crate::core::prune::{prune, PruneReport};
use crate::core::toolchain::Materialize;
use crate::error::Result;
use crate::utils::fs::recreate_dir;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Download,
    Materialize,
    Prune,
    Package,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Download => "download",
            Stage::Materialize => "extract/install",
            Stage::Prune => "prune",
            Stage::Package => "package",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct JobReport {
    pub downloaded_bytes: u64,
    pub root: PathBuf,
    pub prune: PruneReport,
    pub package: PackageReport,
    pub zip_path: PathBuf,
}

pub fn run_job(job: &JobConfig, downloader: &Downloader) -> Result<JobReport> {
    println!(
        "==> {} {} ({})",
        job.toolchain,
        job.version,
        job.zip_path.display()
    );

    tracing::debug!(stage = %Stage::Download, toolchain = %job.toolchain);
    let downloaded_bytes = downloader.download_file(&job.url, &job.archive_path)?;

    tracing::debug!(stage = %Stage::Materialize, toolchain = %job.toolchain);
    let root = match &job.materialize {
        Materialize::Extract => {
            recreate_dir(&job.staging_dir)?;
            downloader.extract_archive(&job.archive_path, &job.staging_dir)?;
            resolve_single_root(&job.staging_dir)?
        }
        Materialize::Install { installer } => {
            downloader.extract_archive(&job.archive_path, &job.downloads_dir)?;
            let installer = job.downloads_dir.join(installer);
            SilentInstaller::new(&installer, &job.downloads_dir).install_into(&job.staging_dir)?;
            job.staging_dir.clone()
        }
    };

    tracing::debug!(stage = %Stage::Prune, root = %root.display());
    let prune_report = prune(&root, &job.policy)?;
    tracing::info!(
        folders = prune_report.folders_removed.len(),
        entries = prune_report.entries_removed.len(),
        "pruned {}",
        job.toolchain
    );

    tracing::debug!(stage = %Stage::Package, output = %job.zip_path.display());
    let package_report = package(&root, &job.zip_path)?;

    println!("Done!");
    Ok(JobReport {
        downloaded_bytes,
        root,
        prune: prune_report,
        package: package_report,
        zip_path: job.zip_path.clone(),
    })
}

/// Run jobs back to back. The first failure stops the run; later jobs never start.
pub fn run_jobs(jobs: &[JobConfig], downloader: &Downloader) -> Result<Vec<JobReport>> {
    let mut reports = Vec::with_capacity(jobs.len());
    for job in jobs {
        reports.push(run_job(job, downloader)?);
    }
    Ok(reports)
}
