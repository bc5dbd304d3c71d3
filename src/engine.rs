use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
};

use serde::Serialize;
use tracing::debug;

use crate::{
    book::BookRecord,
    borrow_queue::{BorrowConduit, BorrowRequest},
    catalog::Catalog,
    config::EngineConfig,
    error::{CirculationError, Conduit},
    events::{CirculationEvent, JournalEntry, Operation},
    history::UserHistoryStore,
    ledger::CirculationLedger,
    observers::CirculationObserver,
    return_stack::ReturnConduit,
};

/// A successfully issued borrow request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loan {
    /// Borrowing user, trimmed
    pub user_id: String,
    /// Issued title, trimmed
    pub title: String,
}

/// Owned, serializable view of the whole engine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSnapshot {
    /// Catalog in ascending id order
    pub books: Vec<BookRecord>,
    /// Borrow requests, oldest first
    pub pending_borrows: Vec<BorrowRequest>,
    /// Borrow queue bound
    pub borrow_capacity: usize,
    /// Returns, bottom of the stack first
    pub pending_returns: Vec<String>,
    /// Return stack bound
    pub return_capacity: usize,
    /// User histories, newest title first
    pub histories: BTreeMap<String, Vec<String>>,
    /// Outstanding issues per normalized title
    pub on_loan: BTreeMap<String, u32>,
    /// Sum of `on_loan`
    pub total_on_loan: u64,
}

/// Catalog and circulation engine.
///
/// Owns the catalog, both conduits, the user histories and the issue ledger,
/// and is the only place that mutates more than one of them in a single
/// operation.
pub struct CirculationEngine {
    /// Books on the shelf list
    catalog: Catalog,
    /// Pending borrow requests
    borrow_queue: BorrowConduit,
    /// Returns awaiting processing
    return_stack: ReturnConduit,
    /// Per-user issue history
    history: UserHistoryStore,
    /// Outstanding issues per title
    ledger: CirculationLedger,
    /// Most recent events, oldest first
    journal: VecDeque<JournalEntry>,
    /// Maximum journal length
    journal_capacity: usize,
    /// Sequence number of the last emitted event
    last_sequence: u64,
    /// Registered event observers
    observers: Vec<Box<dyn CirculationObserver>>,
}

// Manual implementation of Debug for CirculationEngine
impl fmt::Debug for CirculationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CirculationEngine")
            .field("catalog", &self.catalog)
            .field("borrow_queue", &self.borrow_queue)
            .field("return_stack", &self.return_stack)
            .field("history", &self.history)
            .field("ledger", &self.ledger)
            .field("journal", &self.journal)
            .field("journal_capacity", &self.journal_capacity)
            .field("last_sequence", &self.last_sequence)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for CirculationEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl CirculationEngine {
    /// Create an empty engine sized by `config`
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            catalog: Catalog::new(),
            borrow_queue: BorrowConduit::with_capacity(config.borrow_capacity),
            return_stack: ReturnConduit::with_capacity(config.return_capacity),
            history: UserHistoryStore::new(),
            ledger: CirculationLedger::new(),
            journal: VecDeque::with_capacity(config.journal_capacity),
            journal_capacity: config.journal_capacity,
            last_sequence: 0,
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified of every event
    pub fn register_observer(&mut self, observer: Box<dyn CirculationObserver>) {
        self.observers.push(observer);
    }

    /// Add a record to the catalog. Returns `false` if its id was already
    /// present, in which case the existing record is kept.
    pub fn add_book(&mut self, record: BookRecord) -> bool {
        let id = record.id.clone();
        let title = record.title.clone();

        let inserted = self.catalog.insert(record);
        if inserted {
            self.emit(CirculationEvent::BookAdded { id, title });
        } else {
            self.emit(CirculationEvent::DuplicateIgnored { id });
        }
        inserted
    }

    /// Remove the record with this id (surrounding whitespace ignored).
    ///
    /// Outstanding loans of its title stay in the ledger.
    ///
    /// # Errors
    ///
    /// Returns `CirculationError::NotFound` if no record has the id.
    pub fn remove_book(&mut self, id: &str) -> Result<(), CirculationError> {
        let id = id.trim();
        if !self.catalog.remove(id) {
            return Err(self.reject(Operation::RemoveBook, CirculationError::NotFound {
                id: id.to_string(),
            }));
        }
        self.emit(CirculationEvent::BookRemoved { id: id.to_string() });
        Ok(())
    }

    /// Queue a borrow request for a cataloged title.
    ///
    /// Availability is not reserved; it is checked again at issue time.
    ///
    /// # Errors
    ///
    /// - `CirculationError::Unavailable` if the title is not cataloged
    /// - `CirculationError::CapacityExceeded` if the borrow queue is full
    pub fn request_borrow(&mut self, user_id: &str, title: &str) -> Result<(), CirculationError> {
        if self.catalog.is_title_unavailable(title) {
            return Err(self.reject(Operation::RequestBorrow, CirculationError::Unavailable {
                title: title.to_string(),
            }));
        }

        let request = BorrowRequest::new(user_id, title);
        if let Err(error) = self.borrow_queue.enqueue(request) {
            return Err(self.reject(Operation::RequestBorrow, error));
        }

        self.emit(CirculationEvent::BorrowRequested {
            user_id: user_id.to_string(),
            title: title.to_string(),
        });
        Ok(())
    }

    /// Issue the oldest pending borrow request.
    ///
    /// The request is consumed whatever the outcome; a rejected request is
    /// not requeued.
    ///
    /// # Errors
    ///
    /// - `CirculationError::Empty` if no request is pending
    /// - `CirculationError::Malformed` if the request lacks a user or a title
    /// - `CirculationError::Unavailable` if the title left the catalog since
    ///   the request was queued
    pub fn issue_next(&mut self) -> Result<Loan, CirculationError> {
        let Some(request) = self.borrow_queue.dequeue() else {
            return Err(self.reject(Operation::IssueNext, CirculationError::Empty {
                conduit: Conduit::BorrowQueue,
            }));
        };

        let Some((user_id, title)) = request.parts() else {
            return Err(self.reject(Operation::IssueNext, CirculationError::Malformed {
                request: request.to_string(),
            }));
        };

        if self.catalog.is_title_unavailable(title) {
            return Err(self.reject(Operation::IssueNext, CirculationError::Unavailable {
                title: title.to_string(),
            }));
        }

        let loan = Loan { user_id: user_id.to_string(), title: title.to_string() };
        self.commit_loan(&loan);
        self.emit(CirculationEvent::Issued {
            user_id: loan.user_id.clone(),
            title: loan.title.clone(),
        });
        Ok(loan)
    }

    /// Record a returned title for later processing.
    ///
    /// # Errors
    ///
    /// - `CirculationError::Unavailable` if the title is not cataloged
    /// - `CirculationError::NotIssued` if no copy of it is out
    /// - `CirculationError::CapacityExceeded` if the return stack is full
    pub fn record_return(&mut self, title: &str) -> Result<(), CirculationError> {
        let error = if self.catalog.is_title_unavailable(title) {
            Some(CirculationError::Unavailable { title: title.to_string() })
        } else if !self.ledger.has_outstanding(title) {
            Some(CirculationError::NotIssued { title: title.to_string() })
        } else {
            self.return_stack.push(title).err()
        };

        if let Some(error) = error {
            return Err(self.reject(Operation::RecordReturn, error));
        }

        self.emit(CirculationEvent::ReturnRecorded { title: title.to_string() });
        Ok(())
    }

    /// Finalize the most recently recorded return, returning its title.
    ///
    /// # Errors
    ///
    /// - `CirculationError::Empty` if no return is pending
    /// - `CirculationError::NotIssued` if the ledger shows no copy of the
    ///   popped title out; the ledger is left untouched
    pub fn process_next_return(&mut self) -> Result<String, CirculationError> {
        let Some(title) = self.return_stack.pop() else {
            return Err(self.reject(Operation::ProcessReturn, CirculationError::Empty {
                conduit: Conduit::ReturnStack,
            }));
        };

        if !self.ledger.has_outstanding(&title) {
            return Err(self.reject(Operation::ProcessReturn, CirculationError::NotIssued {
                title,
            }));
        }

        self.ledger.decrement(&title);
        self.emit(CirculationEvent::ReturnProcessed { title: title.clone() });
        Ok(title)
    }

    /// Remove the most recent exact occurrence of `title` from a user's
    /// history. Returns `false` if there was nothing to remove.
    pub fn remove_history_entry(&mut self, user_id: &str, title: &str) -> bool {
        let removed = self.history.remove_entry(user_id, title);
        if removed {
            self.emit(CirculationEvent::HistoryEntryRemoved {
                user_id: user_id.to_string(),
                title: title.to_string(),
            });
        }
        removed
    }

    /// The catalog
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Pending borrow requests
    #[must_use]
    pub fn borrow_queue(&self) -> &BorrowConduit {
        &self.borrow_queue
    }

    /// Direct access to the borrow queue, bypassing the catalog check that
    /// [`request_borrow`](Self::request_borrow) performs
    pub fn borrow_queue_mut(&mut self) -> &mut BorrowConduit {
        &mut self.borrow_queue
    }

    /// Returns awaiting processing
    #[must_use]
    pub fn return_stack(&self) -> &ReturnConduit {
        &self.return_stack
    }

    /// Direct access to the return stack, bypassing the checks that
    /// [`record_return`](Self::record_return) performs
    pub fn return_stack_mut(&mut self) -> &mut ReturnConduit {
        &mut self.return_stack
    }

    /// User histories
    #[must_use]
    pub fn history(&self) -> &UserHistoryStore {
        &self.history
    }

    /// Outstanding issues
    #[must_use]
    pub fn ledger(&self) -> &CirculationLedger {
        &self.ledger
    }

    /// Recent events, oldest first
    pub fn journal(&self) -> impl Iterator<Item = &JournalEntry> + Clone {
        self.journal.iter()
    }

    /// Copy the current state into a serializable snapshot
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            books: self.catalog.iter().cloned().collect(),
            pending_borrows: self.borrow_queue.iter().cloned().collect(),
            borrow_capacity: self.borrow_queue.capacity(),
            pending_returns: self.return_stack.iter().map(str::to_string).collect(),
            return_capacity: self.return_stack.capacity(),
            histories: self
                .history
                .users()
                .map(|user| {
                    (user.to_string(), self.history.history_of(user).map(str::to_string).collect())
                })
                .collect(),
            on_loan: self.ledger.iter().map(|(title, count)| (title.to_string(), count)).collect(),
            total_on_loan: self.ledger.total_outstanding(),
        }
    }

    /// History append and ledger increment for one issue. Neither step can
    /// fail, so the pair is never left half applied.
    fn commit_loan(&mut self, loan: &Loan) {
        self.history.add_entry(&loan.user_id, &loan.title);
        self.ledger.increment(&loan.title);
    }

    /// Emit a rejection and hand the error back for returning
    fn reject(&mut self, operation: Operation, error: CirculationError) -> CirculationError {
        self.emit(CirculationEvent::Rejected { operation, error: error.clone() });
        error
    }

    /// Journal an event and notify observers
    fn emit(&mut self, event: CirculationEvent) {
        if !event.is_rejection() {
            debug!(sequence = self.last_sequence.saturating_add(1), ?event, "applied");
        }
        for observer in &self.observers {
            observer.on_event(&event);
        }

        self.last_sequence = self.last_sequence.saturating_add(1);
        if self.journal_capacity == 0 {
            return;
        }
        if self.journal.len() >= self.journal_capacity {
            self.journal.pop_front();
        }
        self.journal.push_back(JournalEntry { sequence: self.last_sequence, event });
    }
}
