//! Fixed-capacity ordered slot lists
//!
//! The vault and the calendar staging list are both sequences of string slots
//! addressed by 1-based position (matching the persisted `repopostidea_{i}` /
//! `calpost_{i}` key scheme). After any mutation the list is left-packed: all
//! non-empty values occupy the lowest positions with no gaps between them.
//! Whitespace-only values count as empty. Data pushed past the last slot is
//! silently discarded; that lossy overflow is the intended policy.

use std::collections::BTreeMap;

/// A fixed-capacity ordered list of string slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotList {
    slots: Vec<String>,
}

impl SlotList {
    /// Create an all-empty list of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![String::new(); capacity],
        }
    }

    /// Build from an iterator of values. Values beyond capacity are dropped,
    /// missing positions are filled with empty strings.
    pub fn from_values<I>(capacity: usize, values: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut slots: Vec<String> = values.into_iter().take(capacity).collect();
        slots.resize(capacity, String::new());
        Self { slots }
    }

    /// Read positions 1..=capacity out of a keyed map (`{prefix}{i}`).
    /// Missing keys load as empty slots.
    pub fn from_map(capacity: usize, prefix: &str, map: &BTreeMap<String, String>) -> Self {
        Self::from_values(
            capacity,
            (1..=capacity).map(|i| {
                map.get(&format!("{}{}", prefix, i))
                    .cloned()
                    .unwrap_or_default()
            }),
        )
    }

    /// Write every position back into a keyed map, overwriting all
    /// `{prefix}{i}` keys so stale entries cannot survive a compaction.
    pub fn write_into(&self, prefix: &str, map: &mut BTreeMap<String, String>) {
        for (i, value) in self.slots.iter().enumerate() {
            map.insert(format!("{}{}", prefix, i + 1), value.clone());
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Get the value at a 1-based position.
    pub fn get(&self, position: usize) -> Option<&str> {
        if position == 0 {
            return None;
        }
        self.slots.get(position - 1).map(|s| s.as_str())
    }

    /// Overwrite the value at a 1-based position. Does not compact; in-place
    /// edits keep their slot.
    pub fn set(&mut self, position: usize, value: String) -> bool {
        if position == 0 || position > self.slots.len() {
            return false;
        }
        self.slots[position - 1] = value;
        true
    }

    /// Compact, shift every entry down one position, and place `value` at
    /// position 1. A value is only ever dropped on overflow, when the list
    /// is already full.
    pub fn insert_at_head(&mut self, value: String) {
        if self.slots.is_empty() {
            return;
        }
        self.compact();
        self.slots.pop();
        self.slots.insert(0, value);
        self.compact();
    }

    /// Clear the slot at a 1-based position, then compact.
    pub fn delete_at(&mut self, position: usize) -> bool {
        if position == 0 || position > self.slots.len() {
            return false;
        }
        self.slots[position - 1].clear();
        self.compact();
        true
    }

    /// Left-pack: rewrite all non-empty values starting at position 1,
    /// preserving their relative order, and fill the rest with empties.
    pub fn compact(&mut self) {
        let packed: Vec<String> = self
            .slots
            .iter()
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .collect();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = packed.get(i).cloned().unwrap_or_default();
        }
    }

    /// Number of non-empty slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|v| !v.trim().is_empty()).count()
    }

    /// True when every slot is empty or whitespace.
    pub fn is_vacant(&self) -> bool {
        self.occupied() == 0
    }

    /// All slots in position order, including empties.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Non-empty values in position order.
    pub fn non_empty(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.as_str())
    }
}
