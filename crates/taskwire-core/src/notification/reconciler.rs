//! Merge-by-id reconciliation of notification snapshots and push events.
//!
//! Two independently-arriving streams feed this collection: periodic
//! authoritative snapshots (request/response) and push events from the
//! persistent channel (at-least-once delivery, so duplicates happen).
//! The reconciler merges both into one deduplicated, most-recent-first
//! collection and owns the read/unread transitions.

use super::model::Notification;

/// What happened when a push event was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// New id: the notification was prepended to the collection. The
    /// caller should surface a toast and trigger a task re-fetch.
    Inserted,
    /// The id was already present - a duplicate delivery from the
    /// at-least-once channel. Dropped silently.
    DuplicateIgnored,
}

/// The single-writer, deduplicated notification collection.
///
/// Invariants:
/// - at most one entry per id
/// - ordered most-recent-first
/// - the unread count is always derived by counting, never tracked as
///   separate mutable state
#[derive(Debug, Default)]
pub struct NotificationReconciler {
    entries: Vec<Notification>,
}

impl NotificationReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the collection entirely with a fetched snapshot.
    ///
    /// The fetch is authoritative for full state - anything the push
    /// channel missed during a reconnect window is recovered here. The
    /// snapshot is ordered by `created_at` descending regardless of the
    /// order the server returned it in.
    pub fn apply_snapshot(&mut self, mut notifications: Vec<Notification>) {
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.entries = notifications;
    }

    /// Applies a push-delivered notification event.
    ///
    /// Events only ever announce creation, never a server-side read-state
    /// change, so a duplicate id carries no new information and is
    /// ignored outright.
    pub fn apply_push(&mut self, notification: Notification) -> PushOutcome {
        if self.entries.iter().any(|n| n.id == notification.id) {
            return PushOutcome::DuplicateIgnored;
        }
        self.entries.insert(0, notification);
        PushOutcome::Inserted
    }

    /// Optimistically flips a notification to read.
    ///
    /// # Returns
    ///
    /// `true` if an unread entry was flipped, `false` if the id was
    /// unknown or already read (no confirm call needed in that case).
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(n) if !n.is_read => {
                n.is_read = true;
                true
            }
            _ => false,
        }
    }

    /// Flips every unread entry to read.
    ///
    /// # Returns
    ///
    /// The ids that were flipped. An empty vec means nothing was unread
    /// and the caller must skip the batch confirm call entirely.
    pub fn mark_all_read(&mut self) -> Vec<String> {
        let mut flipped = Vec::new();
        for n in self.entries.iter_mut().filter(|n| !n.is_read) {
            n.is_read = true;
            flipped.push(n.id.clone());
        }
        flipped
    }

    /// The unread count, recomputed from the collection.
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.is_read).count()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the collection, as part of the full reset on logout.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn notification(id: &str, minutes_ago: i64) -> Notification {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        Notification {
            id: id.to_string(),
            user_id: "u1".to_string(),
            message: format!("Notification {}", id),
            is_read: false,
            related_task_id: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn ids(reconciler: &NotificationReconciler) -> Vec<&str> {
        reconciler.entries().iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_snapshot_orders_most_recent_first() {
        let mut reconciler = NotificationReconciler::new();
        reconciler.apply_snapshot(vec![
            notification("old", 30),
            notification("new", 1),
            notification("mid", 10),
        ]);
        assert_eq!(ids(&reconciler), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_push_prepends_new_ids() {
        let mut reconciler = NotificationReconciler::new();
        reconciler.apply_snapshot(vec![notification("a", 10)]);

        let outcome = reconciler.apply_push(notification("b", 0));
        assert_eq!(outcome, PushOutcome::Inserted);
        assert_eq!(ids(&reconciler), vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_push_is_idempotent() {
        let mut reconciler = NotificationReconciler::new();
        reconciler.apply_push(notification("n1", 0));
        let before: Vec<Notification> = reconciler.entries().to_vec();

        let outcome = reconciler.apply_push(notification("n1", 0));
        assert_eq!(outcome, PushOutcome::DuplicateIgnored);
        // Same entries, same order, as if delivered once.
        assert_eq!(reconciler.entries(), before.as_slice());
    }

    #[test]
    fn test_push_sequence_stays_most_recent_first() {
        let mut reconciler = NotificationReconciler::new();
        reconciler.apply_push(notification("first", 2));
        reconciler.apply_push(notification("second", 1));
        reconciler.apply_push(notification("third", 0));
        assert_eq!(ids(&reconciler), vec!["third", "second", "first"]);
    }

    #[test]
    fn test_snapshot_recovers_events_missed_while_disconnected() {
        // "n1" was pushed while the channel was down; the client never
        // saw the event. A snapshot fetched after reconnect includes it.
        let mut reconciler = NotificationReconciler::new();
        reconciler.apply_snapshot(vec![notification("n0", 20)]);

        reconciler.apply_snapshot(vec![notification("n0", 20), notification("n1", 1)]);
        assert_eq!(ids(&reconciler), vec!["n1", "n0"]);
    }

    #[test]
    fn test_mark_read_flips_once() {
        let mut reconciler = NotificationReconciler::new();
        reconciler.apply_push(notification("a", 0));

        assert!(reconciler.mark_read("a"));
        assert_eq!(reconciler.unread_count(), 0);
        // Already read: no flip, no confirm call needed.
        assert!(!reconciler.mark_read("a"));
        // Unknown id: same.
        assert!(!reconciler.mark_read("ghost"));
    }

    #[test]
    fn test_mark_all_read_reports_flipped_ids() {
        let mut reconciler = NotificationReconciler::new();
        reconciler.apply_push(notification("a", 2));
        reconciler.apply_push(notification("b", 1));
        reconciler.mark_read("a");

        let flipped = reconciler.mark_all_read();
        assert_eq!(flipped, vec!["b".to_string()]);
        assert_eq!(reconciler.unread_count(), 0);

        // Nothing unread: empty vec, caller skips the network call.
        assert!(reconciler.mark_all_read().is_empty());
    }

    #[test]
    fn test_unread_count_is_derived_after_every_operation() {
        let mut reconciler = NotificationReconciler::new();

        let check = |r: &NotificationReconciler| {
            let counted = r.entries().iter().filter(|n| !n.is_read).count();
            assert_eq!(r.unread_count(), counted);
        };

        reconciler.apply_snapshot(vec![notification("a", 5), notification("b", 4)]);
        check(&reconciler);
        reconciler.apply_push(notification("c", 0));
        check(&reconciler);
        reconciler.mark_read("b");
        check(&reconciler);
        reconciler.mark_all_read();
        check(&reconciler);
    }
}
