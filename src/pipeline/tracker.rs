//! Ordered scene collection and its status transitions.
//!
//! Positions are stable for the lifetime of a run. Every transition takes an
//! index; an index outside the collection is a caller bug and panics.
//! Callers that accept indices from users must bounds-check first.

use cinegen_core::{SceneItem, SceneSpec, SceneStatus, StageResult};

/// Proof that a request was issued for a scene.
///
/// Each [`SceneItemTracker::begin`] hands out a fresh token; only the
/// outcome of the most recent request for an index is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTicket {
    index: usize,
    scene_id: u32,
    token: u64,
}

impl ItemTicket {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn scene_id(&self) -> u32 {
        self.scene_id
    }
}

/// Per-status totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub success: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn of(items: &[SceneItem]) -> Self {
        let mut counts = Self::default();
        for item in items {
            match item.status {
                SceneStatus::Pending => counts.pending += 1,
                SceneStatus::Processing => counts.processing += 1,
                SceneStatus::Success => counts.success += 1,
                SceneStatus::Error => counts.error += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Default)]
pub struct SceneItemTracker {
    items: Vec<SceneItem>,
    tokens: Vec<u64>,
    next_token: u64,
}

impl SceneItemTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection with freshly pending items, in script order.
    pub fn seed(&mut self, specs: Vec<SceneSpec>) {
        self.items = specs.into_iter().map(SceneItem::pending).collect();
        self.tokens = vec![0; self.items.len()];
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read-only view of every item, in order.
    pub fn snapshot(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> &SceneItem {
        &self.items[self.checked(index)]
    }

    pub fn set_processing(&mut self, index: usize) {
        let index = self.checked(index);
        self.items[index].mark_processing();
    }

    pub fn set_success(&mut self, index: usize, artifact_path: &str) {
        let index = self.checked(index);
        self.items[index].mark_success(artifact_path);
    }

    pub fn set_error(&mut self, index: usize, message: &str, suggestion: Option<&str>) {
        let index = self.checked(index);
        self.items[index].mark_error(message, suggestion);
    }

    /// Mark `index` as processing and issue a ticket for the request.
    pub fn begin(&mut self, index: usize) -> ItemTicket {
        self.set_processing(index);
        self.next_token += 1;
        self.tokens[index] = self.next_token;
        ItemTicket {
            index,
            scene_id: self.items[index].id,
            token: self.next_token,
        }
    }

    /// Whether `ticket` belongs to the latest request for its index.
    pub fn is_current(&self, ticket: &ItemTicket) -> bool {
        self.tokens.get(ticket.index) == Some(&ticket.token)
    }

    /// Apply a request's outcome. Returns `false`, leaving the item
    /// untouched, when a newer request for the same index has been issued.
    pub fn settle(&mut self, ticket: &ItemTicket, outcome: &StageResult<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        match outcome {
            Ok(path) => self.set_success(ticket.index, path),
            Err(failure) => {
                self.set_error(ticket.index, &failure.error, failure.suggestion.as_deref())
            }
        }
        true
    }

    /// Artifact references of successful items, in scene order.
    pub fn successful_artifacts(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.status == SceneStatus::Success)
            .filter_map(|item| item.artifact_path.clone())
            .collect()
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::of(&self.items)
    }

    fn checked(&self, index: usize) -> usize {
        assert!(
            index < self.items.len(),
            "scene index {} out of range (tracker holds {} scenes)",
            index,
            self.items.len()
        );
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegen_core::StageFailure;

    fn specs(n: u32) -> Vec<SceneSpec> {
        (1..=n)
            .map(|id| SceneSpec {
                id: id * 10,
                title: None,
                content: format!("content {}", id),
            })
            .collect()
    }

    #[test]
    fn seed_preserves_order_and_sets_pending() {
        let mut tracker = SceneItemTracker::new();
        tracker.seed(specs(3));
        let ids: Vec<u32> = tracker.snapshot().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(tracker.counts().pending, 3);
    }

    #[test]
    fn transitions_touch_one_index() {
        let mut tracker = SceneItemTracker::new();
        tracker.seed(specs(3));
        tracker.set_processing(1);
        tracker.set_error(1, "policy violation", Some("rephrase scene"));

        assert_eq!(tracker.get(0).status, SceneStatus::Pending);
        assert_eq!(tracker.get(1).status, SceneStatus::Error);
        assert_eq!(tracker.get(2).status, SceneStatus::Pending);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_index_panics() {
        let mut tracker = SceneItemTracker::new();
        tracker.seed(specs(2));
        tracker.set_processing(2);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut tracker = SceneItemTracker::new();
        tracker.seed(specs(2));

        let first = tracker.begin(0);
        let second = tracker.begin(0);

        assert!(tracker.settle(&second, &Ok("/new.jpg".into())));
        assert!(!tracker.settle(&first, &Err(StageFailure::transport("late"))));
        assert_eq!(tracker.get(0).artifact_path.as_deref(), Some("/new.jpg"));
    }

    #[test]
    fn successful_artifacts_skip_errors() {
        let mut tracker = SceneItemTracker::new();
        tracker.seed(specs(3));
        tracker.set_success(0, "/a.jpg");
        tracker.set_error(1, "boom", None);
        tracker.set_success(2, "/c.jpg");
        assert_eq!(tracker.successful_artifacts(), vec!["/a.jpg", "/c.jpg"]);
    }

    #[test]
    fn reseed_resets_tokens() {
        let mut tracker = SceneItemTracker::new();
        tracker.seed(specs(2));
        let ticket = tracker.begin(1);
        tracker.seed(specs(2));
        assert!(!tracker.is_current(&ticket));
    }
}
