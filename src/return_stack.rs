use tracing::warn;

use crate::error::{CirculationError, Conduit};

/// Bounded LIFO of returned titles awaiting processing
#[derive(Debug, Clone)]
pub struct ReturnConduit {
    /// Pending titles, most recent last
    titles: Vec<String>,
    /// Fixed bound, never grown
    capacity: usize,
}

impl ReturnConduit {
    /// Create an empty stack holding at most `capacity` titles
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { titles: Vec::with_capacity(capacity), capacity }
    }

    /// Push a title on top.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::CapacityExceeded` if the stack is full; the
    /// title is dropped and the stack is unchanged.
    pub fn push(&mut self, title: impl Into<String>) -> Result<(), CirculationError> {
        let title = title.into();
        if self.is_full() {
            warn!(capacity = self.capacity, %title, "return stack full, return dropped");
            return Err(CirculationError::CapacityExceeded {
                conduit: Conduit::ReturnStack,
                capacity: self.capacity,
            });
        }
        self.titles.push(title);
        Ok(())
    }

    /// Remove and return the most recently pushed title
    pub fn pop(&mut self) -> Option<String> {
        self.titles.pop()
    }

    /// Pending titles bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &str> + Clone {
        self.titles.iter().map(String::as_str)
    }

    /// Number of pending returns
    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Whether another push would be rejected
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.titles.len() >= self.capacity
    }

    /// The fixed bound
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
