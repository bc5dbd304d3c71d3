use serde::Serialize;

use crate::error::CirculationError;

/// Engine entry points, used to label rejections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Removing a record from the catalog
    RemoveBook,
    /// Queueing a borrow request
    RequestBorrow,
    /// Issuing the oldest borrow request
    IssueNext,
    /// Recording a returned title
    RecordReturn,
    /// Finalizing the most recent return
    ProcessReturn,
}

/// Something the engine did, or refused to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CirculationEvent {
    /// A record entered the catalog
    BookAdded {
        /// Its identifier
        id: String,
        /// Its title
        title: String,
    },
    /// An insert collided with an existing id and was ignored
    DuplicateIgnored {
        /// The colliding identifier
        id: String,
    },
    /// A record left the catalog
    BookRemoved {
        /// Its identifier
        id: String,
    },
    /// A borrow request joined the queue
    BorrowRequested {
        /// Requesting user
        user_id: String,
        /// Requested title
        title: String,
    },
    /// A title was issued and recorded in the user's history and the ledger
    Issued {
        /// Borrowing user
        user_id: String,
        /// Issued title
        title: String,
    },
    /// A return is waiting to be processed
    ReturnRecorded {
        /// Returned title
        title: String,
    },
    /// A return was finalized and the ledger decremented
    ReturnProcessed {
        /// Returned title
        title: String,
    },
    /// A title was removed from a user's history by hand
    HistoryEntryRemoved {
        /// Whose history
        user_id: String,
        /// Which title
        title: String,
    },
    /// An operation was refused; engine state is unchanged apart from any
    /// item that was consumed from a conduit
    Rejected {
        /// What was attempted
        operation: Operation,
        /// Why it was refused
        error: CirculationError,
    },
}

impl CirculationEvent {
    /// Whether this event records a refusal
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// A journaled event with its position in the engine's event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    /// Monotonic sequence number, starting at 1
    pub sequence: u64,
    /// What happened
    pub event: CirculationEvent,
}
