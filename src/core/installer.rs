use crate::error::{Result, TcslimError};
use crate::utils::fs::{ensure_dir_exists, make_executable, recreate_dir};
use crate::utils::process::run_with_stdin_file;
use std::path::Path;

pub const RESPONSE_FILE_NAME: &str = "inputs.txt";

/// Runs a vendor installer that asks for license confirmation on stdin and
/// copies its payload to `--copy-files-to <target>`.
pub struct SilentInstaller<'a> {
    pub installer: &'a Path,
    /// Where the canned `yes` answer is written.
    pub work_dir: &'a Path,
}

impl<'a> SilentInstaller<'a> {
    pub fn new(installer: &'a Path, work_dir: &'a Path) -> Self {
        Self {
            installer,
            work_dir,
        }
    }

    pub fn install_into(&self, target: &Path) -> Result<()> {
        if !self.installer.is_file() {
            return Err(TcslimError::InstallerNotFound {
                path: self.installer.to_path_buf(),
            });
        }

        ensure_dir_exists(self.work_dir)?;
        let response_file = self.work_dir.join(RESPONSE_FILE_NAME);
        std::fs::write(&response_file, "yes\n")?;

        recreate_dir(target)?;
        make_executable(self.installer)?;

        println!("Installing");
        println!("... into {}", target.display());
        run_with_stdin_file(
            self.installer,
            [std::ffi::OsStr::new("--copy-files-to"), target.as_os_str()],
            &response_file,
        )
    }
}
