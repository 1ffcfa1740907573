//! Engine binary lookup.
//!
//! Search order: the directory of the running executable, the current
//! directory, then each `PATH` entry.

use std::path::{Path, PathBuf};

use crate::domain::error::ExecutorError;

/// Find an executable named `name`.
///
/// A `name` containing a path separator is checked as given.
///
/// # Errors
///
/// Returns [`ExecutorError::BinaryNotFound`] listing every directory searched.
pub fn locate(name: &str) -> Result<PathBuf, ExecutorError> {
    let given = Path::new(name);
    if given.components().count() > 1 {
        return if is_executable(given) {
            Ok(given.to_path_buf())
        } else {
            Err(ExecutorError::BinaryNotFound {
                name: name.to_string(),
                searched: given.display().to_string(),
            })
        };
    }
    search(name, &search_dirs())
}

/// Find `name` in `dirs`, in order.
///
/// # Errors
///
/// Returns [`ExecutorError::BinaryNotFound`] if no directory has it.
pub fn search(name: &str, dirs: &[PathBuf]) -> Result<PathBuf, ExecutorError> {
    let file_name = executable_name(name);
    dirs.iter()
        .map(|d| d.join(&file_name))
        .find(|p| is_executable(p))
        .ok_or_else(|| ExecutorError::BinaryNotFound {
            name: name.to_string(),
            searched: dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(path) = std::env::var_os("PATH") {
        dirs.extend(std::env::split_paths(&path));
    }
    dirs
}

#[cfg(windows)]
fn executable_name(name: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.exe")
    }
}

#[cfg(not(windows))]
fn executable_name(name: &str) -> String {
    name.to_string()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
