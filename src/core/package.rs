use crate::error::{Result, TcslimError};
use crate::utils::fs::{ensure_dir_exists, format_mib, remove_path};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageReport {
    pub entries: usize,
    pub archive_bytes: u64,
}

/// Zip the contents of `source` into `output`.
///
/// Entry names are relative to `source`, sorted, and stamped with the zip
/// epoch so the same tree always yields the same bytes. Any existing archive
/// at `output` is replaced.
pub fn package(source: &Path, output: &Path) -> Result<PackageReport> {
    if !source.is_dir() {
        return Err(TcslimError::DirectoryNotFound {
            path: source.to_path_buf(),
        });
    }

    println!("Zipping");
    println!("... from {}", source.display());
    println!("... to {}", output.display());

    if let Some(parent) = output.parent() {
        ensure_dir_exists(parent)?;
    }
    remove_path(output)?;

    let entries = match write_archive(source, output) {
        Ok(entries) => entries,
        Err(e) => {
            remove_path(output)?;
            return Err(e);
        }
    };

    let archive_bytes = std::fs::metadata(output)?.len();
    println!("... {entries} entries, {}", format_mib(archive_bytes));
    Ok(PackageReport {
        entries,
        archive_bytes,
    })
}

fn write_archive(source: &Path, output: &Path) -> Result<usize> {
    let mut zip = ZipWriter::new(BufWriter::new(File::create(output)?));
    // The archive may live inside the tree being packaged; it must not be
    // added to itself.
    let own_archive = output.canonicalize()?;
    let source_root = source.canonicalize()?;
    let mut entries = 0;

    for entry in WalkDir::new(source)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| TcslimError::extraction_error(entry.path(), e.to_string()))?;
        if source_root.join(relative) == own_archive {
            tracing::debug!(entry = %relative.display(), "skipping the archive being written");
            continue;
        }
        let name = archive_name(relative)?;
        let metadata = entry.path().symlink_metadata()?;
        let options = entry_options(unix_mode(&metadata));

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            let target = std::fs::read_link(entry.path())?;
            zip.add_symlink(name, target.to_string_lossy().into_owned(), options)?;
        } else if file_type.is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
        } else {
            zip.start_file(name, options)?;
            let mut file = File::open(entry.path())?;
            std::io::copy(&mut file, &mut zip)?;
        }

        tracing::trace!(entry = %relative.display(), "added to archive");
        entries += 1;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(entries)
}

fn entry_options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(mode)
}

/// Forward-slash separated, root-relative entry name.
fn archive_name(relative: &Path) -> Result<String> {
    let parts = relative
        .components()
        .map(|component| {
            component.as_os_str().to_str().ok_or_else(|| {
                TcslimError::extraction_error(relative, "path is not valid UTF-8")
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("/"))
}

#[cfg(unix)]
fn unix_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn unix_mode(metadata: &std::fs::Metadata) -> u32 {
    if metadata.is_dir() {
        0o755
    } else {
        0o644
    }
}
