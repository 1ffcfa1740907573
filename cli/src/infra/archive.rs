//! Gzip-compressed tar snapshots of a working directory.
//!
//! Entries keep their permission bits. Symlinks are stored as links when
//! their target stays inside the archived directory and skipped with a
//! warning otherwise, so an archive never carries content from outside it.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;

/// Archive `root` into `writer`.
///
/// With `include_top_level` every entry is nested under the directory's
/// own name. Top-level entries named in `skip` are left out.
///
/// # Errors
///
/// Returns an error if `root` cannot be walked or the archive cannot be written.
pub fn write_tar_gz<W: Write>(
    root: &Path,
    writer: W,
    include_top_level: bool,
    skip: &[&str],
) -> Result<()> {
    let root = root
        .canonicalize()
        .with_context(|| format!("resolving {}", root.display()))?;
    let prefix = if include_top_level {
        root.file_name().map(PathBuf::from).unwrap_or_default()
    } else {
        PathBuf::new()
    };

    let mut builder = tar::Builder::new(GzEncoder::new(writer, Compression::default()));
    builder.follow_symlinks(false);

    if !prefix.as_os_str().is_empty() {
        builder
            .append_dir(&prefix, &root)
            .with_context(|| format!("archiving {}", root.display()))?;
    }
    append_tree(&mut builder, &root, &root, &prefix, skip)?;

    builder
        .into_inner()
        .context("finishing archive")?
        .finish()
        .context("finishing compression")?;
    Ok(())
}

fn append_tree<W: Write>(
    builder: &mut tar::Builder<W>,
    root: &Path,
    dir: &Path,
    prefix: &Path,
    skip: &[&str],
) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("reading {}", dir.display()))?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(&path);
        if dir == root && skip.iter().any(|s| rel == Path::new(s)) {
            continue;
        }
        let name = prefix.join(rel);
        let meta = std::fs::symlink_metadata(&path)
            .with_context(|| format!("inspecting {}", path.display()))?;
        let file_type = meta.file_type();

        if file_type.is_symlink() {
            let target = std::fs::read_link(&path)
                .with_context(|| format!("reading link {}", path.display()))?;
            if !link_stays_inside(root, &path, &target) {
                tracing::warn!(
                    link = %path.display(),
                    target = %target.display(),
                    "skipping symlink that leaves the working directory"
                );
                continue;
            }
            let mut header = tar::Header::new_gnu();
            header.set_metadata(&meta);
            header.set_entry_type(tar::EntryType::Symlink);
            header.set_size(0);
            builder
                .append_link(&mut header, &name, &target)
                .with_context(|| format!("archiving link {}", path.display()))?;
        } else if file_type.is_dir() {
            builder
                .append_dir(&name, &path)
                .with_context(|| format!("archiving {}", path.display()))?;
            append_tree(builder, root, &path, prefix, skip)?;
        } else if file_type.is_file() {
            builder
                .append_path_with_name(&path, &name)
                .with_context(|| format!("archiving {}", path.display()))?;
        } else {
            tracing::debug!(path = %path.display(), "skipping special file");
        }
    }
    Ok(())
}

/// Whether `target`, read from the link at `link`, resolves inside `root`.
fn link_stays_inside(root: &Path, link: &Path, target: &Path) -> bool {
    let base = link.parent().unwrap_or(root);
    let joined = base.join(target);
    match joined.canonicalize() {
        Ok(resolved) => resolved.starts_with(root),
        // Dangling: judge the path lexically.
        Err(_) => normalize(&joined).starts_with(root),
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}
