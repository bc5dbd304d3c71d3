use std::collections::BTreeMap;

use crate::book::normalize_title;

/// Outstanding issue counts per normalized title.
///
/// A title with no outstanding issue has no entry. The ledger never refuses a
/// call; guarding `decrement` with `has_outstanding` is up to the caller.
#[derive(Debug, Clone, Default)]
pub struct CirculationLedger {
    /// Normalized title to a count that is always at least one
    counts: BTreeMap<String, u32>,
}

impl CirculationLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more issue of `title`
    pub fn increment(&mut self, title: &str) {
        let count = self.counts.entry(normalize_title(title)).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Record one return of `title`. An absent title is left alone.
    pub fn decrement(&mut self, title: &str) {
        let key = normalize_title(title);
        let Some(count) = self.counts.get_mut(&key) else {
            return;
        };

        if *count > 1 {
            *count = count.saturating_sub(1);
        } else {
            self.counts.remove(&key);
        }
    }

    /// Whether `title` has at least one copy out
    #[must_use]
    pub fn has_outstanding(&self, title: &str) -> bool {
        self.outstanding(title) > 0
    }

    /// Copies of `title` currently out
    #[must_use]
    pub fn outstanding(&self, title: &str) -> u32 {
        self.counts.get(&normalize_title(title)).copied().unwrap_or(0)
    }

    /// Sum over all titles
    #[must_use]
    pub fn total_outstanding(&self) -> u64 {
        self.counts.values().map(|&count| u64::from(count)).sum()
    }

    /// `(normalized title, count)` pairs in ascending title order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + Clone {
        self.counts.iter().map(|(title, &count)| (title.as_str(), count))
    }

    /// Whether nothing is on loan
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
