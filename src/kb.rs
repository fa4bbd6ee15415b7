//! Knowledge file management: `kbr add`, `list`, `clear`, `import`.

use anyhow::{Context, Result};
use kb_rank_core::models::format_ts_iso;
use kb_rank_core::store::KnowledgeStore;
use std::path::Path;

use crate::config::Config;
use crate::knowledge::FileKnowledgeStore;
use crate::progress::{ImportProgressEvent, ProgressReporter};

pub async fn run_add(config: &Config, text: &str) -> Result<()> {
    let store = FileKnowledgeStore::from_config(config);
    let record = store.add_knowledge(text).await?;
    println!("{}", record.id);
    Ok(())
}

pub async fn run_list(config: &Config, json: bool) -> Result<()> {
    let records = FileKnowledgeStore::from_config(config)
        .all_knowledge()
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No knowledge records.");
        return Ok(());
    }

    for r in &records {
        println!("{}  {}", r.id, format_ts_iso(r.created_at));
        println!("    {}", r.text.replace('\n', " "));
    }
    println!();
    println!("{} record(s)", records.len());
    Ok(())
}

pub async fn run_clear(config: &Config) -> Result<()> {
    let removed = FileKnowledgeStore::from_config(config)
        .clear_all_knowledge()
        .await?;
    println!("Removed {} record(s).", removed);
    Ok(())
}

/// Import one record per non-blank line of `path`.
///
/// Returns the number of records stored.
pub async fn import_file(
    config: &Config,
    path: &Path,
    progress: &dyn ProgressReporter,
) -> Result<usize> {
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    progress.report(ImportProgressEvent::Reading {
        source: source.clone(),
    });
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;

    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len() as u64;
    let mut texts = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let line = line.trim();
        if !line.is_empty() {
            texts.push(line.to_string());
        }
        let n = i as u64 + 1;
        if n % 1000 == 0 || n == total {
            progress.report(ImportProgressEvent::Parsed {
                source: source.clone(),
                n,
                total,
            });
        }
    }

    let stored = FileKnowledgeStore::from_config(config)
        .add_many(&texts)
        .await?
        .len();
    progress.report(ImportProgressEvent::Stored {
        source,
        stored: stored as u64,
    });
    Ok(stored)
}

pub async fn run_import(
    config: &Config,
    path: &Path,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    let stored = import_file(config, path, progress).await?;
    println!("Imported {} record(s).", stored);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<ImportProgressEvent>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn report(&self, event: ImportProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[tokio::test]
    async fn test_import_skips_blank_lines_and_reports() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = Config::minimal();
        cfg.knowledge.path = tmp.path().join("knowledge.json");
        let src = tmp.path().join("notes.txt");
        std::fs::write(&src, "Stringing blocks\n\n   \nConductor blocks\n").unwrap();

        let progress = RecordingProgress::default();
        let stored = import_file(&cfg, &src, &progress).await.unwrap();
        assert_eq!(stored, 2);

        let events = progress.events.lock().unwrap();
        assert_eq!(
            events.first(),
            Some(&ImportProgressEvent::Reading {
                source: "notes.txt".into()
            })
        );
        assert!(events.contains(&ImportProgressEvent::Parsed {
            source: "notes.txt".into(),
            n: 4,
            total: 4
        }));
        assert_eq!(
            events.last(),
            Some(&ImportProgressEvent::Stored {
                source: "notes.txt".into(),
                stored: 2
            })
        );

        let all = FileKnowledgeStore::from_config(&cfg)
            .all_knowledge()
            .await
            .unwrap();
        let texts: Vec<&str> = all.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Stringing blocks", "Conductor blocks"]);
    }

    #[tokio::test]
    async fn test_import_missing_file_errors() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = Config::minimal();
        cfg.knowledge.path = tmp.path().join("knowledge.json");
        let progress = RecordingProgress::default();
        let err = import_file(&cfg, &tmp.path().join("nope.txt"), &progress)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read import file"));
    }
}
