//! Storage backends for the to-do list.

use crate::model::TaskList;
use crate::{utils, Result};
use anyhow::bail;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Where a `TodoStore` loads its list from and saves it to. A save always writes the whole list.
#[async_trait::async_trait]
pub trait Persist: Send + Sync {
    /// Reads the persisted list. Absent storage yields an empty list.
    async fn load(&mut self) -> Result<TaskList>;

    /// Replaces the persisted list with `list`.
    async fn save(&mut self, list: &TaskList) -> Result<()>;
}

/// Persists the list as a pretty-printed JSON file. Saving overwrites the file in place; it is not
/// transactional.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Persist for JsonFile {
    async fn load(&mut self) -> Result<TaskList> {
        if !utils::is_file(&self.path).await? {
            debug!("No task file at {}, starting empty", self.path.display());
            return Ok(TaskList::default());
        }
        match utils::deserialize::<TaskList>(&self.path).await {
            Ok(list) => Ok(list),
            Err(e) => {
                // An unreadable file is replaced on the next save.
                warn!("Ignoring unreadable task file: {e:#}");
                Ok(TaskList::default())
            }
        }
    }

    async fn save(&mut self, list: &TaskList) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            utils::make_dir(parent).await?;
        }
        utils::serialize(&self.path, list).await
    }
}

/// Keeps the list in memory. Clones share the same state, so a test can hand one clone to a
/// `TodoStore` and inspect what was saved through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersist {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    list: Option<TaskList>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryPersist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `list` already persisted.
    pub fn with_list(list: TaskList) -> Self {
        let me = Self::default();
        me.lock().list = Some(list);
        me
    }

    /// The most recently saved list, if anything was ever saved or seeded.
    pub fn saved(&self) -> Option<TaskList> {
        self.lock().list.clone()
    }

    /// How many times `save` succeeded.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Makes every subsequent `save` fail.
    pub fn fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl Persist for MemoryPersist {
    async fn load(&mut self) -> Result<TaskList> {
        Ok(self.lock().list.clone().unwrap_or_default())
    }

    async fn save(&mut self, list: &TaskList) -> Result<()> {
        let mut state = self.lock();
        if state.fail_saves {
            bail!("Simulated save failure");
        }
        state.list = Some(list.clone());
        state.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    fn sample() -> TaskList {
        TaskList {
            tasks: vec![Task::new(1, "uno"), Task::new(2, "dos")],
            next_id: 3,
        }
    }

    #[tokio::test]
    async fn test_json_file_missing_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut file = JsonFile::new(dir.path().join("tareas.json"));
        assert_eq!(file.load().await.unwrap(), TaskList::default());
    }

    #[tokio::test]
    async fn test_json_file_path_is_a_folder() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tareas.json");
        utils::make_dir(&path).await.unwrap();
        let mut file = JsonFile::new(&path);
        assert_eq!(file.load().await.unwrap(), TaskList::default());
        assert!(file.save(&sample()).await.is_err());
    }

    #[tokio::test]
    async fn test_json_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut file = JsonFile::new(dir.path().join("nested").join("tareas.json"));
        file.save(&sample()).await.unwrap();
        assert_eq!(file.load().await.unwrap(), sample());

        let raw = utils::read(file.path()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["next_id"], 3);
        assert_eq!(value["tasks"][1]["text"], "dos");
    }

    #[tokio::test]
    async fn test_json_file_corrupt_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tareas.json");
        utils::write(&path, "{ not json").await.unwrap();
        let mut file = JsonFile::new(&path);
        assert_eq!(file.load().await.unwrap(), TaskList::default());
    }

    #[tokio::test]
    async fn test_memory_clones_share_state() {
        let observer = MemoryPersist::new();
        let mut persist = observer.clone();
        assert!(observer.saved().is_none());
        persist.save(&sample()).await.unwrap();
        assert_eq!(observer.saved(), Some(sample()));
        assert_eq!(observer.save_count(), 1);

        observer.fail_saves(true);
        assert!(persist.save(&TaskList::default()).await.is_err());
        assert_eq!(observer.saved(), Some(sample()));
    }
}
