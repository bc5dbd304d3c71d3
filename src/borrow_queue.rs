use std::{collections::VecDeque, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CirculationError, Conduit};

/// A pending request by a user to borrow a title
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct BorrowRequest {
    /// Who asked
    pub user_id: String,
    /// What they asked for, as typed
    pub title: String,
}

impl BorrowRequest {
    /// Create a new request
    #[must_use]
    pub fn new(user_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), title: title.into() }
    }

    /// Trimmed `(user, title)` if both are non-blank
    #[must_use]
    pub fn parts(&self) -> Option<(&str, &str)> {
        let user = self.user_id.trim();
        let title = self.title.trim();
        (!user.is_empty() && !title.is_empty()).then_some((user, title))
    }
}

/// Token form is `user|title`
impl fmt::Display for BorrowRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.user_id, self.title)
    }
}

/// Parses `user|title`, splitting at the first `|`. A token without a
/// separator becomes a request with an empty title, which is rejected as
/// malformed when it comes up for issue.
impl FromStr for BorrowRequest {
    type Err = std::convert::Infallible;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (user, title) = token.split_once('|').unwrap_or((token, ""));
        Ok(Self::new(user, title))
    }
}

/// Bounded FIFO of borrow requests
#[derive(Debug, Clone)]
pub struct BorrowConduit {
    /// Pending requests, oldest at the front
    requests: VecDeque<BorrowRequest>,
    /// Fixed bound, never grown
    capacity: usize,
}

impl BorrowConduit {
    /// Create an empty queue holding at most `capacity` requests
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { requests: VecDeque::with_capacity(capacity), capacity }
    }

    /// Append a request at the back.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::CapacityExceeded` if the queue is full; the
    /// request is dropped and the queue is unchanged.
    pub fn enqueue(&mut self, request: BorrowRequest) -> Result<(), CirculationError> {
        if self.is_full() {
            warn!(capacity = self.capacity, %request, "borrow queue full, request dropped");
            return Err(CirculationError::CapacityExceeded {
                conduit: Conduit::BorrowQueue,
                capacity: self.capacity,
            });
        }
        self.requests.push_back(request);
        Ok(())
    }

    /// Remove and return the oldest request, or `None` if nothing is pending
    pub fn dequeue(&mut self) -> Option<BorrowRequest> {
        self.requests.pop_front()
    }

    /// Pending requests front to back
    pub fn iter(&self) -> impl Iterator<Item = &BorrowRequest> + Clone {
        self.requests.iter()
    }

    /// Number of pending requests
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Whether another enqueue would be rejected
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.requests.len() >= self.capacity
    }

    /// The fixed bound
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> BorrowRequest {
        match s.parse() {
            Ok(request) => request,
            Err(never) => match never {},
        }
    }

    #[test]
    fn fifo_order() {
        let mut queue = BorrowConduit::with_capacity(100);
        assert_eq!(queue.enqueue(token("u1|A")), Ok(()));
        assert_eq!(queue.enqueue(token("u2|B")), Ok(()));

        assert_eq!(queue.dequeue(), Some(BorrowRequest::new("u1", "A")));
        assert_eq!(queue.dequeue(), Some(BorrowRequest::new("u2", "B")));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn rejects_when_full() {
        let mut queue = BorrowConduit::with_capacity(2);
        assert!(queue.enqueue(token("u1|A")).is_ok());
        assert!(queue.enqueue(token("u2|B")).is_ok());

        assert_eq!(
            queue.enqueue(token("u3|C")),
            Err(CirculationError::CapacityExceeded { conduit: Conduit::BorrowQueue, capacity: 2 })
        );
        assert_eq!(queue.len(), 2);

        // Freed slots are reusable
        queue.dequeue();
        assert!(queue.enqueue(token("u3|C")).is_ok());
        let order: Vec<String> = queue.iter().map(ToString::to_string).collect();
        assert_eq!(order, ["u2|B", "u3|C"]);
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let mut queue = BorrowConduit::with_capacity(4);
        assert!(queue.enqueue(token("u1|A")).is_ok());
        assert!(queue.enqueue(token("u1|A")).is_ok());

        let snapshot = queue.iter();
        assert_eq!(snapshot.clone().count(), 2);
        assert_eq!(snapshot.count(), 2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.iter().next(), Some(&BorrowRequest::new("u1", "A")));
    }

    #[test]
    fn token_parsing_splits_on_first_separator() {
        assert_eq!(token("u1|A|B"), BorrowRequest::new("u1", "A|B"));
        assert_eq!(token("lonely"), BorrowRequest::new("lonely", ""));
        assert_eq!(token(" u1 | Dune ").parts(), Some(("u1", "Dune")));
        assert_eq!(token("u1|  ").parts(), None);
        assert_eq!(token("|Dune").parts(), None);
    }
}
