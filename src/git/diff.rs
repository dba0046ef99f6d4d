//! Staged diff collection using git2.

use git2::{DiffFormat, ErrorCode, Repository, Tree};

use crate::error::ShellError;

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// `Ok(Some(tree))` for repos with a valid HEAD, or `Err(ShellError::Repository)`
/// for real errors (corrupt HEAD, missing objects).
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, ShellError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(ShellError::Repository(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(ShellError::Repository)?;
    Ok(Some(tree))
}

/// Collect the staged changes (HEAD tree versus index) as unified patch text.
///
/// The equivalent of `git diff --staged`. Returns an empty string when nothing
/// is staged.
pub fn staged_diff(repo: &Repository) -> Result<String, ShellError> {
    let head_tree = resolve_head_tree(repo)?;

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(ShellError::Repository)?;

    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        // File and hunk headers carry their own text; content lines need the origin.
        let origin = line.origin();
        if matches!(origin, '+' | '-' | ' ') {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .map_err(ShellError::Repository)?;

    Ok(text)
}
