//! Calendar-day bucketing of set lists.
//!
//! The gateway defines the overall ordering; this is a single-pass stable
//! partition, not a sort. Group order is first-seen order, item order within
//! a group is input order.

use crate::models::SetItem;
use std::collections::HashMap;

/// Bucket key for sets whose creation timestamp never arrived.
pub const UNKNOWN_DAY_KEY: &str = "unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub day_key: String,
    pub items: Vec<SetItem>,
}

/// Derives the bucket key: the calendar-date portion of `created_at` as
/// recorded, or the `"unknown"` sentinel when the timestamp is missing.
pub fn day_key(set: &SetItem) -> String {
    match set.created_at {
        Some(timestamp) => timestamp.date().format("%Y-%m-%d").to_string(),
        None => UNKNOWN_DAY_KEY.to_string(),
    }
}

pub fn group_by_day(sets: &[SetItem]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for set in sets {
        let key = day_key(set);
        match slots.get(&key) {
            Some(&slot) => groups[slot].items.push(set.clone()),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push(DayGroup {
                    day_key: key,
                    items: vec![set.clone()],
                });
            }
        }
    }

    groups
}

/// Inverse of `group_by_day` for consumers that need the flat sequence back
/// (e.g. virtualized lists rendering group headers inline).
pub fn flatten(groups: &[DayGroup]) -> Vec<SetItem> {
    groups
        .iter()
        .flat_map(|group| group.items.iter().cloned())
        .collect()
}
