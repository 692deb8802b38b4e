//! Sorts the files of a directory into category subfolders by extension.

mod table;

pub use table::{Category, CategoryTable};

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{BufRead, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Answers accepted by the confirmation prompt, compared case-insensitively.
pub const YES_ANSWERS: [&str; 5] = ["s", "si", "sí", "y", "yes"];

/// A single file that was moved.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Move {
    pub file: String,
    pub category: String,
    pub destination: PathBuf,
}

/// What happened during one `organize` run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizeReport {
    moves: Vec<Move>,
    errors: Vec<String>,
}

impl OrganizeReport {
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// One message per file that could not be moved.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Number of files moved into each category. Categories with no files are absent.
    pub fn counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for m in &self.moves {
            *counts.entry(m.category.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// Moves every regular file directly inside `dir` into `dir/<category>/`. Subdirectories are left
/// alone. A name collision in the destination is resolved by appending `_1`, `_2`, ... to the file
/// stem. A failure to move one file is recorded in the report and the remaining files are still
/// processed.
pub async fn organize(dir: &Path, table: &CategoryTable) -> Result<OrganizeReport> {
    ensure_folder(dir).await?;
    info!("Organizing files in {}", dir.display());

    let mut report = OrganizeReport::default();
    for file in list_files(dir).await? {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let category = table.classify(&file).to_string();
        match move_file(&file, &dir.join(&category)).await {
            Ok(destination) => {
                info!("{name} -> {category}/");
                report.moves.push(Move {
                    file: name,
                    category,
                    destination,
                });
            }
            Err(e) => {
                let message = format!("Unable to move {name}: {e:#}");
                warn!("{message}");
                report.errors.push(message);
            }
        }
    }
    Ok(report)
}

/// Fails unless `dir` is an existing folder.
pub async fn ensure_folder(dir: &Path) -> Result<()> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => bail!("{} is not a folder", dir.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            bail!("The folder {} does not exist", dir.display())
        }
        Err(e) => Err(e).with_context(|| format!("Unable to inspect {}", dir.display())),
    }
}

/// Returns the first name in `dir` not already taken, starting with `file_name` itself and then
/// trying `stem_1.ext`, `stem_2.ext`, ... Fails if a candidate cannot be checked.
pub async fn free_destination(dir: &Path, file_name: &Path) -> Result<PathBuf> {
    let candidate = dir.join(file_name);
    if !utils::exists(&candidate).await? {
        return Ok(candidate);
    }
    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = file_name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let mut n: u32 = 1;
    loop {
        let candidate = dir.join(format!("{stem}_{n}{extension}"));
        if !utils::exists(&candidate).await? {
            return Ok(candidate);
        }
        n = n
            .checked_add(1)
            .with_context(|| format!("No free name for {} in {}", file_name.display(), dir.display()))?;
    }
}

/// Asks `question` on `output` and reads one line from `input`. Returns true for any of
/// `YES_ANSWERS`. End of input counts as "no".
pub fn confirm(mut input: impl BufRead, mut output: impl Write, question: &str) -> Result<bool> {
    write!(output, "{question} (s/n): ").context("Unable to write the prompt")?;
    output.flush().context("Unable to write the prompt")?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Unable to read the answer")?;
    let answer = answer.trim().to_lowercase();
    Ok(YES_ANSWERS.contains(&answer.as_str()))
}

async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = utils::read_dir(dir).await?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .context("Failed to read directory entry")?
    {
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => debug!("Skipping {}: {e}", path.display()),
        }
    }
    files.sort();
    Ok(files)
}

async fn move_file(file: &Path, category_dir: &Path) -> Result<PathBuf> {
    utils::make_dir(category_dir).await?;
    let file_name = file
        .file_name()
        .with_context(|| format!("{} has no file name", file.display()))?;
    let destination = free_destination(category_dir, Path::new(file_name)).await?;
    utils::rename(file, &destination).await?;
    Ok(destination)
}
