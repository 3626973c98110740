//! Linear slot space.
//!
//! A slot is one (day, entry) pair, linearized as
//! `day * entries_per_day + index`. The id one past the last slot,
//! `total_slots`, is the "no match" sentinel, so every gene value lies in
//! `[0, total_slots]`.

use serde::{Deserialize, Serialize};

/// One scheduled dose on one wake-cycle day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Wake-cycle day index.
    pub day: usize,
    /// Schedule entry index within the day.
    pub index: usize,
}

impl Slot {
    /// Creates a slot for entry `index` on day `day`.
    pub fn new(day: usize, index: usize) -> Self {
        Self { day, index }
    }
}

/// Size and addressing of the slot space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotModel {
    entries_per_day: usize,
    days_spanned: usize,
}

impl SlotModel {
    /// Creates a slot model. Both dimensions are clamped to at least 1.
    pub fn new(entries_per_day: usize, days_spanned: usize) -> Self {
        Self {
            entries_per_day: entries_per_day.max(1),
            days_spanned: days_spanned.max(1),
        }
    }

    /// Derives the slot space from the last dose's day index.
    pub fn from_last_day(entries_per_day: usize, last_day: i64) -> Self {
        let days = usize::try_from(last_day).unwrap_or(0) + 1;
        Self::new(entries_per_day, days)
    }

    /// Schedule entries per wake-cycle day.
    #[inline]
    pub fn entries_per_day(&self) -> usize {
        self.entries_per_day
    }

    /// Wake-cycle days covered by the doses.
    #[inline]
    pub fn days_spanned(&self) -> usize {
        self.days_spanned
    }

    /// Number of addressable slots.
    #[inline]
    pub fn total_slots(&self) -> usize {
        self.days_spanned * self.entries_per_day
    }

    /// The "no match" gene value.
    #[inline]
    pub fn unmatched(&self) -> usize {
        self.total_slots()
    }

    /// Whether `gene` is the sentinel.
    #[inline]
    pub fn is_unmatched(&self, gene: usize) -> bool {
        gene == self.unmatched()
    }

    /// Whether `gene` is a legal gene value (a slot id or the sentinel).
    #[inline]
    pub fn is_legal(&self, gene: usize) -> bool {
        gene <= self.unmatched()
    }

    /// Linear id of `slot`.
    pub fn encode(&self, slot: Slot) -> usize {
        debug_assert!(slot.day < self.days_spanned && slot.index < self.entries_per_day);
        slot.day * self.entries_per_day + slot.index
    }

    /// Slot addressed by `gene`, or `None` for the sentinel.
    pub fn decode(&self, gene: usize) -> Option<Slot> {
        debug_assert!(self.is_legal(gene), "gene {gene} outside slot space");
        if gene >= self.unmatched() {
            return None;
        }
        Some(Slot::new(
            gene / self.entries_per_day,
            gene % self.entries_per_day,
        ))
    }
}
