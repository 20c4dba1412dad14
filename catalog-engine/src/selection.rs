//! Product selection tracking
//!
//! Session-local set of selected product ids. Rebuilt empty on every
//! page session, never persisted. Iteration order is only stable
//! between mutations.

use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one product in or out of the selection.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Replace the selection with the given ids.
    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
