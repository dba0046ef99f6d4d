//! Commit execution through the `git` binary.
//!
//! Commits go through the real binary rather than git2 so hooks, signing and
//! the user's identity configuration all apply.

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;

use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info};

use crate::commit::CommitCandidate;
use crate::error::ShellError;

/// Write the formatted message to a temporary file and run `git commit -F`.
///
/// Returns git's trimmed stdout (the commit summary).
pub async fn commit(workdir: &Path, candidate: &CommitCandidate) -> Result<String, ShellError> {
    let message = candidate.format();

    let mut file = NamedTempFile::new().map_err(ShellError::MessageFile)?;
    file.write_all(message.as_bytes())
        .map_err(ShellError::MessageFile)?;
    file.flush().map_err(ShellError::MessageFile)?;

    info!("Committing: {}", candidate.subject);
    let args = [OsStr::new("commit"), OsStr::new("-F"), file.path().as_os_str()];
    let stdout = run_git(workdir, &args, "commit").await?;

    Ok(stdout.trim().to_string())
}

/// Run git with `args` in `workdir`, returning stdout on success.
async fn run_git(
    workdir: &Path,
    args: &[&OsStr],
    operation: &str,
) -> Result<String, ShellError> {
    let git = which::which("git").map_err(|_| ShellError::NotInstalled)?;
    debug!("Running {} {:?} in {}", git.display(), args, workdir.display());

    let output = Command::new(git)
        .args(args)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(ShellError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(ShellError::NonZeroExit {
            operation: operation.to_string(),
            code,
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
