use crate::model::{Task, TaskList};
use crate::todo::Persist;
use crate::Result;
use anyhow::Context;
use tracing::{debug, trace};

/// The to-do list together with the backend it is persisted to. Every mutation is saved
/// immediately, in full.
///
/// If a save fails the in-memory change is kept and the error is returned to the caller.
pub struct TodoStore<P: Persist> {
    list: TaskList,
    persist: P,
}

impl<P: Persist> TodoStore<P> {
    /// Loads the current list from `persist`.
    pub async fn open(mut persist: P) -> Result<Self> {
        let list = persist.load().await?;
        debug!(
            "Opened to-do list with {} task(s), next id {}",
            list.tasks.len(),
            list.next_id
        );
        Ok(Self { list, persist })
    }

    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    /// Appends a new task with the next id and returns it. Fails without changing the list once the
    /// ids are exhausted.
    pub async fn add(&mut self, text: impl Into<String>) -> Result<Task> {
        let id = self.list.next_id;
        let next_id = id
            .checked_add(1)
            .with_context(|| format!("No task ids are left after {id}"))?;
        let task = Task::new(id, text);
        trace!("Adding task {task:?}");
        self.list.tasks.push(task.clone());
        self.list.next_id = next_id;
        self.persist.save(&self.list).await?;
        Ok(task)
    }

    /// Marks the task with `id` as completed and returns it, or `None` if no such task exists.
    /// Completing an already completed task succeeds and saves again.
    pub async fn complete(&mut self, id: u32) -> Result<Option<Task>> {
        let task = match self.list.tasks.iter_mut().find(|t| t.id() == id) {
            Some(task) => {
                task.mark_completed();
                task.clone()
            }
            None => {
                debug!("No task with id {id}");
                return Ok(None);
            }
        };
        self.persist.save(&self.list).await?;
        Ok(Some(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::{JsonFile, MemoryPersist};

    #[tokio::test]
    async fn test_add_then_complete() {
        let mut store = TodoStore::open(MemoryPersist::new()).await.unwrap();
        let task = store.add("write report").await.unwrap();
        assert_eq!(task.id(), 1);
        assert!(!task.completed());

        let done = store.complete(task.id()).await.unwrap().unwrap();
        assert_eq!(done.id(), 1);
        assert!(done.completed());
        assert!(store.tasks()[0].completed());
    }

    #[tokio::test]
    async fn test_complete_unknown_is_noop() {
        let persist = MemoryPersist::new();
        let mut store = TodoStore::open(persist.clone()).await.unwrap();
        store.add("a").await.unwrap();
        let before = store.list().clone();
        assert!(store.complete(99).await.unwrap().is_none());
        assert_eq!(store.list(), &before);
        assert_eq!(persist.save_count(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_and_text_not_unique() {
        let mut store = TodoStore::open(MemoryPersist::new()).await.unwrap();
        let a = store.add("same").await.unwrap();
        let b = store.add("same").await.unwrap();
        let c = store.add("other").await.unwrap();
        assert_eq!((a.id(), b.id(), c.id()), (1, 2, 3));
        assert_eq!(store.list().next_id(), 4);
        assert_eq!(store.tasks().len(), 3);
    }

    #[tokio::test]
    async fn test_every_mutation_is_saved() {
        let persist = MemoryPersist::new();
        let mut store = TodoStore::open(persist.clone()).await.unwrap();
        store.add("a").await.unwrap();
        store.add("b").await.unwrap();
        store.complete(2).await.unwrap();
        assert_eq!(persist.save_count(), 3);
        assert_eq!(persist.saved().as_ref(), Some(store.list()));
    }

    #[tokio::test]
    async fn test_opens_existing_list() {
        let seeded = TaskList {
            tasks: vec![Task::new(5, "old")],
            next_id: 6,
        };
        let mut store = TodoStore::open(MemoryPersist::with_list(seeded)).await.unwrap();
        let task = store.add("new").await.unwrap();
        assert_eq!(task.id(), 6);
        assert_eq!(store.tasks()[0].text(), "old");
    }

    #[tokio::test]
    async fn test_add_when_ids_are_exhausted() {
        let seeded = TaskList {
            tasks: vec![Task::new(7, "old")],
            next_id: u32::MAX,
        };
        let persist = MemoryPersist::with_list(seeded.clone());
        let mut store = TodoStore::open(persist.clone()).await.unwrap();
        let err = store.add("x").await.unwrap_err();
        assert!(err.to_string().contains("No task ids are left"), "{err:#}");
        assert_eq!(store.list(), &seeded);
        assert_eq!(persist.save_count(), 0);
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let persist = MemoryPersist::new();
        let mut store = TodoStore::open(persist.clone()).await.unwrap();
        persist.fail_saves(true);
        assert!(store.add("a").await.is_err());
        assert_eq!(store.tasks().len(), 1);
        assert!(persist.saved().is_none());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tareas.json");
        {
            let mut store = TodoStore::open(JsonFile::new(&path)).await.unwrap();
            store.add("persisted").await.unwrap();
            store.add("also persisted").await.unwrap();
            store.complete(1).await.unwrap();
        }
        let store = TodoStore::open(JsonFile::new(&path)).await.unwrap();
        assert_eq!(store.tasks().len(), 2);
        assert!(store.tasks()[0].completed());
        assert!(!store.tasks()[1].completed());
        assert_eq!(store.list().next_id(), 3);
    }
}
