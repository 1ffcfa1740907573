//! `stagehand archive` — snapshot a working directory for later inspection.

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;

/// Arguments for the archive command.
#[derive(Args)]
pub struct ArchiveArgs {
    /// Stage working directory
    #[arg(long)]
    pub dir: PathBuf,

    /// Output file (.tar.gz)
    #[arg(long)]
    pub out: PathBuf,

    /// Nest entries under the directory's own name
    #[arg(long)]
    pub top_level: bool,
}

/// Run the archive command.
///
/// # Errors
///
/// Returns an error if the directory does not exist, the output would land
/// inside it, or writing fails.
pub fn run(app: &AppContext, args: &ArchiveArgs) -> Result<()> {
    let exec = app.inspect_executor(&args.dir)?;
    let dir = args
        .dir
        .canonicalize()
        .with_context(|| format!("resolving {}", args.dir.display()))?;
    let out_parent = match args.out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if out_parent
        .canonicalize()
        .is_ok_and(|p| p.starts_with(&dir))
    {
        anyhow::bail!(
            "archive output {} is inside the archived directory",
            args.out.display()
        );
    }

    let file = std::fs::File::create(&args.out)
        .with_context(|| format!("cannot create {}", args.out.display()))?;
    let mut writer = BufWriter::new(file);
    exec.archive(&mut writer, args.top_level)?;
    writer
        .flush()
        .with_context(|| format!("cannot write {}", args.out.display()))?;

    app.output
        .success(&format!("archived {} to {}", args.dir.display(), args.out.display()));
    Ok(())
}
