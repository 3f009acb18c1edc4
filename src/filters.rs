//! Set-list filter state and query composition.
//!
//! The composed query is the conjunction of every set field; unset fields
//! impose no constraint. Mutators report whether the composed query actually
//! changed so the caller can trigger exactly one reload per change.

use crate::models::{PageQuery, SetListQuery};
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetFilter {
    pub exercise_id: Option<String>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
}

impl SetFilter {
    pub fn is_empty(&self) -> bool {
        self.exercise_id.is_none() && self.created_from.is_none() && self.created_to.is_none()
    }

    pub fn to_query(&self, page_size: u32) -> SetListQuery {
        SetListQuery {
            exercise_id: self.exercise_id.clone(),
            created_from: self.created_from,
            created_to: self.created_to,
            page: PageQuery::sized(page_size),
        }
    }
}

#[derive(Debug, Default)]
pub struct FilterComposer {
    current: SetFilter,
}

impl FilterComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &SetFilter {
        &self.current
    }

    pub fn set_exercise(&mut self, exercise_id: Option<String>) -> bool {
        let changed = self.current.exercise_id != exercise_id;
        self.current.exercise_id = exercise_id;
        changed
    }

    pub fn set_created_from(&mut self, date: Option<NaiveDate>) -> bool {
        let changed = self.current.created_from != date;
        self.current.created_from = date;
        changed
    }

    pub fn set_created_to(&mut self, date: Option<NaiveDate>) -> bool {
        let changed = self.current.created_to != date;
        self.current.created_to = date;
        changed
    }

    /// Clears all fields atomically. One reload, not three.
    pub fn reset(&mut self) -> bool {
        let changed = !self.current.is_empty();
        self.current = SetFilter::default();
        changed
    }
}
