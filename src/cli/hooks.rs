//! Pre-commit hook installation and removal.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Error;

const BLOCK_START: &str = "# >>> commit-guard pre-commit checks >>>";
const BLOCK_END: &str = "# <<< commit-guard pre-commit checks <<<";

const SHEBANG: &str = "#!/bin/sh";

/// Managed hook block. Each guard runs only if the previous one passed.
fn managed_block(auto_fix: bool) -> String {
    let docs = if auto_fix {
        "commit-guard scattered-docs --auto-fix"
    } else {
        "commit-guard scattered-docs"
    };
    format!(
        "{}\n\
         commit-guard nul-guard || exit $?\n\
         commit-guard agent-pointers || exit $?\n\
         {} || exit $?\n\
         {}\n",
        BLOCK_START, docs, BLOCK_END
    )
}

/// Byte range of the managed block, including its trailing newline.
fn block_range(content: &str) -> Result<Option<(usize, usize)>, Error> {
    let (Some(start), Some(end)) = (content.find(BLOCK_START), content.find(BLOCK_END)) else {
        return Ok(None);
    };
    if end < start {
        return Err(Error::other("Hook block markers are in wrong order"));
    }
    let mut end = end + BLOCK_END.len();
    if content[end..].starts_with('\n') {
        end += 1;
    }
    Ok(Some((start, end)))
}

/// Put the block right after the shebang so it runs before any early exit
/// in the existing hook.
fn insert_block(existing: &str, block: &str) -> String {
    match existing.split_once('\n') {
        Some((first, rest)) if first.starts_with("#!") => {
            format!("{}\n{}{}", first, block, rest)
        }
        None if existing.starts_with("#!") => format!("{}\n{}", existing, block),
        _ => format!("{}\n{}{}", SHEBANG, block, existing),
    }
}

/// Check if git is initialized in the project.
pub fn has_git(repo_root: &Path) -> bool {
    repo_root.join(".git").is_dir()
}

fn pre_commit_path(repo_root: &Path) -> PathBuf {
    repo_root.join(".git").join("hooks").join("pre-commit")
}

/// Check if our pre-commit section is installed.
pub fn hooks_installed(repo_root: &Path) -> bool {
    fs::read_to_string(pre_commit_path(repo_root))
        .map(|content| content.contains(BLOCK_START))
        .unwrap_or(false)
}

/// Install the pre-commit hook, keeping any existing hook content.
///
/// Returns false when the repository has no `.git` directory.
pub fn install(repo_root: &Path, auto_fix: bool) -> Result<bool, Error> {
    if !has_git(repo_root) {
        return Ok(false);
    }

    let path = pre_commit_path(repo_root);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let block = managed_block(auto_fix);
    let content = if path.exists() {
        let existing = fs::read_to_string(&path)?;
        match block_range(&existing)? {
            Some((start, end)) => format!("{}{}{}", &existing[..start], block, &existing[end..]),
            None => insert_block(&existing, &block),
        }
    } else {
        format!("{}\n{}", SHEBANG, block)
    };

    fs::write(&path, content)?;
    make_executable(&path)?;
    info!(path = %path.display(), "Installed pre-commit hook");
    Ok(true)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), Error> {
    Ok(())
}

/// Remove our block; delete the hook if nothing else is left.
///
/// Returns whether anything was removed.
pub fn uninstall(repo_root: &Path) -> Result<bool, Error> {
    let path = pre_commit_path(repo_root);
    if !path.exists() {
        return Ok(false);
    }

    let content = fs::read_to_string(&path)?;
    let Some((start, end)) = block_range(&content)? else {
        return Ok(false);
    };

    let cleaned = format!("{}{}", &content[..start], &content[end..]);
    let rest = cleaned.trim();
    if rest.is_empty() || rest == SHEBANG {
        fs::remove_file(&path)?;
    } else {
        fs::write(&path, cleaned)?;
    }
    info!(path = %path.display(), "Removed pre-commit hook block");
    Ok(true)
}
