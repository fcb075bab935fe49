//! Output directory resolution.
//!
//! Returns an absolute path for `<base>/<resource>` and creates it if needed.
//! The process working directory is read, never changed.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{AosdError, Result};
use crate::resolve::ResolvedResource;

/// Expands a leading `~` or `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    expand_home_with(path, home::home_dir().as_deref())
}

fn expand_home_with(path: &str, home: Option<&Path>) -> PathBuf {
    match home {
        Some(h) if path == "~" => h.to_path_buf(),
        Some(h) if path.starts_with("~/") => h.join(&path[2..]),
        _ => PathBuf::from(path),
    }
}

/// Drops root and prefix components so the path can be re-anchored elsewhere.
fn strip_root(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

fn directory_error(path: PathBuf, kind: io::ErrorKind, msg: &str) -> AosdError {
    AosdError::Directory {
        path,
        source: io::Error::new(kind, msg.to_string()),
    }
}

/// Resolves and creates `<base>/<resource>` relative to the current directory.
///
/// `base` may start with `~`. See [`prepare_output_directory_in`].
pub fn prepare_output_directory(base: &str, resource: &ResolvedResource) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|source| AosdError::Directory {
        path: PathBuf::from(base),
        source,
    })?;
    prepare_output_directory_in(&cwd, &expand_home(base), resource)
}

/// Resolves `<base>/<resource>` against `cwd` and makes sure it exists.
///
/// An existing directory is returned as-is. When creating the literal path
/// fails, the same path with its root stripped is created under `cwd` and
/// that fallback is returned instead.
pub fn prepare_output_directory_in(
    cwd: &Path,
    base: &Path,
    resource: &ResolvedResource,
) -> Result<PathBuf> {
    let name = Path::new(resource.name());
    let single_component = matches!(
        name.components().collect::<Vec<_>>().as_slice(),
        [Component::Normal(_)]
    );
    if !single_component {
        return Err(directory_error(
            base.join(name),
            io::ErrorKind::InvalidInput,
            "resource name is not a plain directory name",
        ));
    }

    let relative = base.join(name);
    let target = cwd.join(&relative);
    if target.is_dir() {
        tracing::debug!(path = %target.display(), "reusing existing output directory");
        return Ok(target);
    }
    if target.exists() {
        return Err(directory_error(
            target,
            io::ErrorKind::AlreadyExists,
            "path exists and is not a directory",
        ));
    }

    let err = match fs::create_dir_all(&target) {
        Ok(()) => {
            tracing::info!(path = %target.display(), "created output directory");
            return Ok(target);
        }
        Err(err) => err,
    };

    let fallback = cwd.join(strip_root(&relative));
    if fallback == target {
        return Err(AosdError::Directory {
            path: target,
            source: err,
        });
    }
    tracing::warn!(
        path = %target.display(),
        fallback = %fallback.display(),
        error = %err,
        "cannot create output directory, falling back to working directory"
    );
    if fallback.is_dir() {
        return Ok(fallback);
    }
    fs::create_dir_all(&fallback).map_err(|source| AosdError::Directory {
        path: fallback.clone(),
        source,
    })?;
    Ok(fallback)
}
