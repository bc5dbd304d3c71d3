use std::collections::{BTreeMap, VecDeque};

/// Per-user borrowing histories, newest title first.
///
/// Users are kept in ascending id order so listings are stable.
#[derive(Debug, Clone, Default)]
pub struct UserHistoryStore {
    /// User id to titles, most recent at the front
    histories: BTreeMap<String, VecDeque<String>>,
}

impl UserHistoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `title` as the user's most recent entry
    pub fn add_entry(&mut self, user_id: &str, title: &str) {
        self.histories.entry(user_id.to_string()).or_default().push_front(title.to_string());
    }

    /// Remove the most recent entry exactly equal to `title`.
    ///
    /// Matching is exact: no trimming, no case folding. Returns `false` when
    /// the user or the title is unknown. A user whose last entry is removed
    /// is forgotten.
    pub fn remove_entry(&mut self, user_id: &str, title: &str) -> bool {
        let Some(entries) = self.histories.get_mut(user_id) else {
            return false;
        };
        let Some(pos) = entries.iter().position(|entry| entry == title) else {
            return false;
        };

        entries.remove(pos);
        if entries.is_empty() {
            self.histories.remove(user_id);
        }
        true
    }

    /// The user's titles, most recent first. Unknown users yield nothing.
    pub fn history_of(&self, user_id: &str) -> impl Iterator<Item = &str> + Clone {
        self.histories.get(user_id).into_iter().flatten().map(String::as_str)
    }

    /// Users with at least one entry, ascending
    pub fn users(&self) -> impl Iterator<Item = &str> + Clone {
        self.histories.keys().map(String::as_str)
    }

    /// Whether no user has any history
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}
