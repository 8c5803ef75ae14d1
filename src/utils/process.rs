//! External command execution.
//!
//! Commands run to completion with stdout/stderr inherited so vendor tool
//! output reaches the terminal; a non-zero exit becomes
//! [`TcslimError::CommandFailed`].

use crate::error::{Result, TcslimError};
use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

fn check_status(program: &Path, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(TcslimError::CommandFailed {
        program: program.display().to_string(),
        code: status.code().unwrap_or(-1),
    })
}

/// Run `program` with `args`, feeding the contents of `stdin_file` to its
/// standard input.
pub fn run_with_stdin_file<I, S>(program: &Path, args: I, stdin_file: &Path) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let stdin = File::open(stdin_file)?;
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::from(stdin))
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    tracing::debug!(command = ?cmd, "running external command");
    let status = cmd.status()?;
    check_status(program, status)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stdin_is_fed_from_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.txt");
        let output = temp.path().join("output.txt");
        std::fs::write(&input, "yes\n").unwrap();

        let script = format!("read answer; echo \"$answer\" > {}", output.display());
        run_with_stdin_file(Path::new("/bin/sh"), ["-c", script.as_str()], &input).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "yes\n");
    }

    #[test]
    fn test_non_zero_exit_is_reported() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.txt");
        std::fs::write(&input, "").unwrap();

        let err = run_with_stdin_file(Path::new("/bin/sh"), ["-c", "exit 3"], &input).unwrap_err();
        match err {
            TcslimError::CommandFailed { program, code } => {
                assert_eq!(program, "/bin/sh");
                assert_eq!(code, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.txt");
        std::fs::write(&input, "").unwrap();

        let err = run_with_stdin_file(
            &temp.path().join("does-not-exist"),
            Vec::<&str>::new(),
            &input,
        )
        .unwrap_err();
        assert!(matches!(err, TcslimError::Io(_)));
    }
}
