use crate::error::{Result, TcslimError};
use std::io;
use std::path::Path;

fn map_io_error(path: &Path, e: io::Error) -> TcslimError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => TcslimError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => TcslimError::from(e),
    }
}

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e))?;
    }
    Ok(())
}

/// Removes a file, symlink or directory tree. Missing paths are not an error.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(map_io_error(path, e)),
    };

    if metadata.is_dir() {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e))?;
    } else {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e))?;
    }
    Ok(())
}

/// Deletes `path` if present and creates it again, empty.
pub fn recreate_dir(path: &Path) -> Result<()> {
    remove_path(path)?;
    std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e))?;
    Ok(())
}

pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(perms.mode() | 0o755);
        std::fs::set_permissions(path, perms)?;
    }

    #[cfg(windows)]
    {
        let _ = path;
    }

    Ok(())
}

pub fn format_mib(bytes: u64) -> String {
    format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
}
