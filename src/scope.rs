//! Category drill-down scope.
//!
//! At most one category is open at a time. Opening swaps in a fresh scoped
//! exercise collection behind a loading flag; closing discards it outright.
//! Every open/close bumps an epoch, and a scoped load result is applied only
//! if its epoch still matches, so a late response can never land in a closed
//! or re-targeted scope.

use crate::models::{Category, Exercise};
use crate::store::EntityStore;

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeSnapshot {
    pub category: Category,
    pub exercises: Vec<Exercise>,
    pub loading: bool,
}

#[derive(Debug)]
struct OpenScope {
    category: Category,
    exercises: EntityStore<Exercise>,
    loading: bool,
}

#[derive(Debug, Default)]
pub struct ScopeController {
    current: Option<OpenScope>,
    epoch: u64,
}

impl ScopeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a scope on the given category, replacing any prior scope.
    /// Returns the epoch token the eventual load result must present.
    pub fn open(&mut self, category: Category) -> u64 {
        self.epoch += 1;
        self.current = Some(OpenScope {
            category,
            exercises: EntityStore::new(),
            loading: true,
        });
        self.epoch
    }

    /// Discards the scoped collection entirely.
    pub fn close(&mut self) {
        self.epoch += 1;
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn open_category(&self) -> Option<&Category> {
        self.current.as_ref().map(|scope| &scope.category)
    }

    /// Applies a settled scoped load. Returns false when the result is
    /// stale (the scope was closed or re-targeted since the load started).
    pub fn apply_loaded(&mut self, epoch: u64, exercises: Vec<Exercise>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match self.current.as_mut() {
            Some(scope) => {
                scope.exercises.replace_all(exercises);
                scope.loading = false;
                true
            }
            None => false,
        }
    }

    /// Clears the loading flag after a failed scoped load, if still current.
    pub fn note_load_failed(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match self.current.as_mut() {
            Some(scope) => {
                scope.loading = false;
                true
            }
            None => false,
        }
    }

    /// Updates the held category snapshot in place (header label after a
    /// rename). Does not re-trigger the scoped load.
    pub fn rename_open(&mut self, category_id: &str, title: &str) -> bool {
        match self.current.as_mut() {
            Some(scope) if scope.category.id == category_id => {
                scope.category.title = title.to_string();
                true
            }
            _ => false,
        }
    }

    /// Forces the scope closed when its category was deleted.
    pub fn category_deleted(&mut self, category_id: &str) -> bool {
        let open_here = self
            .current
            .as_ref()
            .is_some_and(|scope| scope.category.id == category_id);
        if open_here {
            self.close();
        }
        open_here
    }

    /// Mutable access to the open scope's exercises. Used by the coordinator
    /// to patch mutation results in; patches on absent ids no-op downstream.
    pub fn exercises_mut(&mut self) -> Option<&mut EntityStore<Exercise>> {
        self.current.as_mut().map(|scope| &mut scope.exercises)
    }

    pub fn snapshot(&self) -> Option<ScopeSnapshot> {
        self.current.as_ref().map(|scope| ScopeSnapshot {
            category: scope.category.clone(),
            exercises: scope.exercises.to_vec(),
            loading: scope.loading,
        })
    }
}
