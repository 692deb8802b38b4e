use crate::commands::Out;
use crate::organize::{self, CategoryTable, OrganizeReport};
use crate::Result;
use anyhow::Context;
use std::path::Path;

/// Organizes `dir` after asking for confirmation on the console, unless `yes` is set.
pub async fn organize(dir: &Path, table: &CategoryTable, yes: bool) -> Result<Out<OrganizeReport>> {
    organize::ensure_folder(dir).await?;
    if !yes {
        let question = format!("¿Organizar los archivos de {}?", dir.display());
        let confirmed = tokio::task::spawn_blocking(move || {
            organize::confirm(std::io::stdin().lock(), std::io::stdout(), &question)
        })
        .await
        .context("The confirmation prompt failed")??;
        if !confirmed {
            return Ok("Operation cancelled, no files were moved".into());
        }
    }
    let report = organize::organize(dir, table).await?;
    Ok(Out::new(render_report(dir, &report), report))
}

fn render_report(dir: &Path, report: &OrganizeReport) -> String {
    let mut lines = vec![format!(
        "Moved {} file(s) in {}",
        report.moves().len(),
        dir.display()
    )];
    for (category, count) in report.counts() {
        lines.push(format!("  {category}: {count}"));
    }
    if !report.errors().is_empty() {
        lines.push(format!("{} file(s) could not be moved:", report.errors().len()));
        lines.extend(report.errors().iter().map(|e| format!("  {e}")));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organize::Category;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_organize_with_yes() {
        let env = TestEnv::new().await;
        let dir = env.path("downloads");
        env.write("downloads/song.mp3", "la").await;
        env.write("downloads/clip.MP4", "..").await;

        let out = organize(&dir, &env.config().categories(), true).await.unwrap();

        assert!(out.message().starts_with("Moved 2 file(s)"));
        assert!(out.message().contains("Audio: 1"));
        assert!(out.message().contains("Videos: 1"));
        assert!(dir.join("Audio").join("song.mp3").is_file());
    }

    #[tokio::test]
    async fn test_organize_missing_dir() {
        let env = TestEnv::new().await;
        let err = organize(&env.path("missing"), &CategoryTable::default(), true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"), "{err:#}");
    }

    #[tokio::test]
    async fn test_organize_file_is_not_a_folder() {
        let env = TestEnv::new().await;
        let file = env.write("notes.txt", "x").await;
        let err = organize(&file, &CategoryTable::default(), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("is not a folder"), "{err:#}");
        assert!(file.is_file());
    }

    #[tokio::test]
    async fn test_report_lists_errors() {
        let env = TestEnv::new().await;
        let dir = env.path("downloads");
        env.write("downloads/a.png", "img").await;
        // A plain file where the pics folder should be.
        env.write("downloads/pics", "in the way").await;
        let table = CategoryTable::new(vec![Category::new("pics", ["png"])], "rest");

        let out = organize(&dir, &table, true).await.unwrap();

        let lines: Vec<&str> = out.message().lines().collect();
        assert_eq!(lines[0], format!("Moved 1 file(s) in {}", dir.display()));
        assert_eq!(lines[1], "  rest: 1");
        assert_eq!(lines[2], "1 file(s) could not be moved:");
        assert!(lines[3].starts_with("  Unable to move a.png"), "{}", lines[3]);
    }
}
