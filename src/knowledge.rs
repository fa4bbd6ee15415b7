//! JSON-file knowledge store.
//!
//! Records are kept as a JSON array in `[knowledge].path`. A missing file
//! reads as an empty store.
//!
//! Writers hold an advisory lock file (`<path>.lock`, created with
//! `create_new`) for the whole read-modify-write cycle, so concurrent `kbr`
//! processes never overwrite each other's records. The new contents go to a
//! uniquely named temp file in the same directory, which is then persisted
//! over the original. Readers take no lock; they always see a complete file.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use kb_rank_core::models::KnowledgeRecord;
use kb_rank_core::store::{validate_text, KnowledgeStore};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use crate::config::Config;

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(10);
const LOCK_TIMEOUT: Duration = Duration::from_secs(30);

pub struct FileKnowledgeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Held while a writer owns `<path>.lock`. Dropping it releases the lock.
struct FileLock {
    path: PathBuf,
}

impl FileLock {
    async fn acquire(target: &Path) -> Result<Self> {
        let mut name = target.as_os_str().to_owned();
        name.push(".lock");
        let path = PathBuf::from(name);

        let started = Instant::now();
        loop {
            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(mut file) => {
                    let _ = writeln!(file, "{}", std::process::id());
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if started.elapsed() >= LOCK_TIMEOUT {
                        bail!(
                            "Timed out waiting for lock {} (remove it if no kbr process is running)",
                            path.display()
                        );
                    }
                    tokio::time::sleep(LOCK_RETRY_INTERVAL).await;
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to create lock {}", path.display()))
                }
            }
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

impl FileKnowledgeStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::open(&config.knowledge.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append several records with a single write.
    ///
    /// Blank entries are skipped. Returns the stored records.
    pub async fn add_many(&self, texts: &[String]) -> Result<Vec<KnowledgeRecord>> {
        let added: Vec<KnowledgeRecord> = texts
            .iter()
            .filter(|t| validate_text(t).is_ok())
            .map(|t| KnowledgeRecord::new(t))
            .collect();
        self.modify(|records| records.extend(added.iter().cloned()))
            .await?;
        Ok(added)
    }

    /// Run `f` over the current records and write the result back, holding
    /// both the in-process mutex and the lock file.
    async fn modify<T>(&self, f: impl FnOnce(&mut Vec<KnowledgeRecord>) -> T) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        self.ensure_parent().await?;
        let _lock = FileLock::acquire(&self.path).await?;
        let mut records = self.read_all().await?;
        let out = f(&mut records);
        self.write_all(&records).await?;
        Ok(out)
    }

    async fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<KnowledgeRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read knowledge file: {}", self.path.display())
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse knowledge file: {}", self.path.display()))
    }

    async fn write_all(&self, records: &[KnowledgeRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || persist_atomically(&path, json.as_bytes()))
            .await
            .context("knowledge file writer panicked")?
    }
}

fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl KnowledgeStore for FileKnowledgeStore {
    async fn add_knowledge(&self, text: &str) -> Result<KnowledgeRecord> {
        validate_text(text)?;
        let record = KnowledgeRecord::new(text);
        let stored = record.clone();
        self.modify(move |records| records.push(stored)).await?;
        Ok(record)
    }

    async fn all_knowledge(&self) -> Result<Vec<KnowledgeRecord>> {
        self.read_all().await
    }

    async fn clear_all_knowledge(&self) -> Result<usize> {
        self.modify(|records| {
            let removed = records.len();
            records.clear();
            removed
        })
        .await
    }
}

/// Create the knowledge file if it does not exist. Safe to run repeatedly.
pub async fn init_store(config: &Config) -> Result<()> {
    let store = FileKnowledgeStore::from_config(config);
    let exists = tokio::fs::try_exists(store.path())
        .await
        .with_context(|| format!("Failed to check knowledge file: {}", store.path().display()))?;
    if exists {
        // Parse once so a corrupt file is reported at init time.
        store.all_knowledge().await?;
        return Ok(());
    }
    store.modify(|_| ()).await
}
