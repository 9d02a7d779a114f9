//! Bounded selection of assessments for comparison

use std::collections::VecDeque;

use serde::Serialize;

/// Default number of assessments that can be compared at once
pub const DEFAULT_SELECTION_SIZE: usize = 2;

/// Ordered set of at most `max` selected ids.
///
/// Selecting a new id when full evicts the oldest selection, so the window
/// always holds the most recently picked items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionWindow {
    max: usize,
    selected: VecDeque<String>,
}

impl Default for SelectionWindow {
    fn default() -> Self {
        Self::new(DEFAULT_SELECTION_SIZE)
    }
}

impl SelectionWindow {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            selected: VecDeque::with_capacity(max),
        }
    }

    /// Remove `id` if selected, otherwise select it (evicting the oldest when full).
    pub fn toggle(&mut self, id: impl Into<String>) {
        let id = id.into();

        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
            return;
        }

        if self.max == 0 {
            return;
        }

        if self.selected.len() >= self.max {
            self.selected.pop_front();
        }
        self.selected.push_back(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Window is full, i.e. a comparison can be made
    pub fn is_ready(&self) -> bool {
        self.max > 0 && self.selected.len() == self.max
    }

    /// The selected pair, oldest selection first, when exactly two are selected
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (self.selected.len(), self.selected.front(), self.selected.back()) {
            (2, Some(a), Some(b)) => Some((a.as_str(), b.as_str())),
            _ => None,
        }
    }
}
