use crate::error::{Result, TcslimError};
use crate::utils::fs::{ensure_dir_exists, format_mib, remove_path};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tar::Archive;
use xz2::read::XzDecoder;
use zip::ZipArchive;

const USER_AGENT: &str = concat!("tcslim/", env!("CARGO_PKG_VERSION"));

pub struct Downloader {
    client: reqwest::blocking::Client,
}

impl Downloader {
    pub fn new() -> Result<Self> {
        // Vendor archives run to several hundred MiB; no overall deadline.
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(Self { client })
    }

    /// Stream `url` into `destination`, returning the number of bytes written.
    pub fn download_file(&self, url: &str, destination: &Path) -> Result<u64> {
        println!("Downloading");
        println!("... from {url}");
        println!("... to {}", destination.display());

        if let Some(parent) = destination.parent() {
            ensure_dir_exists(parent)?;
        }

        let result = self.fetch_to(url, destination);
        if result.is_err() {
            if let Err(cleanup) = remove_path(destination) {
                tracing::warn!(path = %destination.display(), error = %cleanup, "could not remove partial download");
            }
        }
        let written = result?;

        let size = std::fs::metadata(destination)?.len();
        tracing::debug!(url, bytes = written, "download finished");
        println!("... Download complete {}", format_mib(size));
        Ok(size)
    }

    fn fetch_to(&self, url: &str, destination: &Path) -> Result<u64> {
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        tracing::debug!(url, %status, content_length = ?response.content_length(), "response received");

        if !status.is_success() {
            return Err(TcslimError::DownloadError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut writer = BufWriter::new(File::create(destination)?);
        let written = response.copy_to(&mut writer)?;
        writer.flush()?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        Ok(written)
    }

    pub fn extract_archive(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        println!("Unpacking");
        println!("... {}", archive_path.display());

        ensure_dir_exists(destination)?;

        let file_name = archive_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| TcslimError::extraction_error(archive_path, "invalid archive file name"))?;

        if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
            let file = BufReader::new(File::open(archive_path)?);
            self.extract_tar(GzDecoder::new(file), archive_path, destination)?;
        } else if file_name.ends_with(".tar.xz") || file_name.ends_with(".txz") {
            let file = BufReader::new(File::open(archive_path)?);
            self.extract_tar(XzDecoder::new(file), archive_path, destination)?;
        } else if file_name.ends_with(".zip") {
            self.extract_zip(archive_path, destination)?;
        } else {
            return Err(TcslimError::UnsupportedArchive {
                name: file_name.to_string(),
            });
        }

        println!("... Unpacked into {}", destination.display());
        Ok(())
    }

    fn extract_tar<R: Read>(&self, reader: R, archive_path: &Path, destination: &Path) -> Result<()> {
        let mut archive = Archive::new(reader);
        archive.set_preserve_permissions(true);
        archive
            .unpack(destination)
            .map_err(|e| TcslimError::extraction_error(archive_path, e.to_string()))?;
        Ok(())
    }

    fn extract_zip(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file)?;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let outpath = match file.enclosed_name() {
                Some(path) => destination.join(path),
                None => {
                    tracing::warn!(entry = file.name(), "skipping zip entry with unsafe path");
                    continue;
                }
            };

            if file.is_dir() {
                std::fs::create_dir_all(&outpath)?;
            } else {
                if let Some(parent) = outpath.parent() {
                    ensure_dir_exists(parent)?;
                }
                let mut outfile = File::create(&outpath)?;
                std::io::copy(&mut file, &mut outfile)?;
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                }
            }
        }
        Ok(())
    }
}

/// Vendor tarballs usually wrap everything in one versioned folder. When
/// `dir` contains exactly one directory and nothing else, that directory is
/// the toolchain root; otherwise `dir` itself is.
pub fn resolve_single_root(dir: &Path) -> Result<PathBuf> {
    let mut entries = std::fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;

    if entries.len() == 1 {
        let entry = entries.remove(0);
        if entry.file_type()?.is_dir() {
            return Ok(entry.path());
        }
    }

    Ok(dir.to_path_buf())
}
