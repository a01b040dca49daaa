//! Single-worker queue feeding the image stage.

use std::collections::VecDeque;

/// Work queue for the image stage with exactly one worker.
///
/// Indices come out in ascending order, and the next one is only handed out
/// after the previous one has been completed, so at most one image request
/// is ever outstanding.
#[derive(Debug)]
pub struct ImageQueue {
    pending: VecDeque<usize>,
    in_flight: Option<usize>,
    completed: usize,
}

impl ImageQueue {
    pub fn new(total: usize) -> Self {
        Self {
            pending: (0..total).collect(),
            in_flight: None,
            completed: 0,
        }
    }

    /// Take the next index.
    ///
    /// # Panics
    ///
    /// If the previously dequeued index has not been completed.
    pub fn dequeue(&mut self) -> Option<usize> {
        assert!(
            self.in_flight.is_none(),
            "image {:?} still in flight; complete it before dequeuing",
            self.in_flight
        );
        let index = self.pending.pop_front()?;
        self.in_flight = Some(index);
        Some(index)
    }

    /// Record that the in-flight index has resolved.
    pub fn complete(&mut self, index: usize) {
        assert_eq!(
            self.in_flight,
            Some(index),
            "completed image {} was not the one in flight",
            index
        );
        self.in_flight = None;
        self.completed += 1;
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_none()
    }
}
