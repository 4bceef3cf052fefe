//! The reconciled task collection.
//!
//! `TaskBoard` owns the in-memory view of tasks: insertion order is the
//! server's order, and every mutation reconciles against the server's
//! returned representation. Snapshot fetches are discriminated by a
//! monotonically increasing sequence number so that when responses for
//! overlapping fetches arrive out of order, the last-issued fetch wins.

use super::model::Task;

/// The single-writer collection of tasks currently in view.
///
/// All mutation goes through this type; readers get slices or clones.
/// The board never talks to the network itself - callers fetch, then
/// apply results here atomically.
#[derive(Debug, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    /// Sequence number of the snapshot currently applied.
    applied_seq: u64,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the collection with a fetched snapshot.
    ///
    /// `seq` is the sequence number attached when the fetch was issued.
    /// A response whose sequence is not newer than the applied one is a
    /// superseded fetch that arrived late; it is discarded so the most
    /// recent filter's response always wins.
    ///
    /// # Returns
    ///
    /// `true` if the snapshot was applied, `false` if it was discarded
    /// as stale.
    pub fn apply_snapshot(&mut self, tasks: Vec<Task>, seq: u64) -> bool {
        if seq <= self.applied_seq {
            return false;
        }
        self.applied_seq = seq;
        self.tasks = tasks;
        true
    }

    /// Inserts a server-confirmed created task at the front.
    ///
    /// If the id is already present (the create raced a snapshot that
    /// included it), the existing entry is replaced in place instead of
    /// duplicated.
    pub fn apply_created(&mut self, task: Task) {
        if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
        } else {
            self.tasks.insert(0, task);
        }
    }

    /// Replaces a single entry with the server-confirmed representation,
    /// preserving its position. An update for an id not currently in
    /// view (filtered out, or deleted elsewhere) is dropped.
    pub fn apply_updated(&mut self, task: Task) {
        if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
        }
    }

    /// Removes a single entry after a server-confirmed delete.
    pub fn apply_deleted(&mut self, id: &str) {
        self.tasks.retain(|t| t.id != id);
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Empties the collection and resets the sequence floor, as part of
    /// the full reset on logout.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.applied_seq = 0;
    }
}
