//! Plain-text rendering of engine state and outcomes for the shell.

use crate::{
    borrow_queue::BorrowConduit,
    catalog::Catalog,
    error::{CirculationError, Conduit},
    events::{CirculationEvent, JournalEntry, Operation},
    history::UserHistoryStore,
    return_stack::ReturnConduit,
};

/// Catalog listing in id order
#[must_use]
pub fn catalog_listing(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return "No books available.".to_string();
    }

    let mut listing = String::from("Books in Inventory (Sorted):");
    for record in catalog {
        listing.push('\n');
        listing.push_str(&record.to_string());
    }
    listing
}

/// Pending borrow requests, oldest first
#[must_use]
pub fn borrow_queue_line(queue: &BorrowConduit) -> String {
    if queue.is_empty() {
        return "Queue is empty!".to_string();
    }

    let mut line = String::from("Borrow Requests: ");
    for request in queue.iter() {
        line.push_str(&format!("{request} | "));
    }
    line
}

/// Pending returns, bottom of the stack first
#[must_use]
pub fn return_stack_line(stack: &ReturnConduit) -> String {
    if stack.is_empty() {
        return "Stack is empty!".to_string();
    }

    let mut line = String::from("Remaining Books: ");
    for title in stack.iter() {
        line.push_str(&format!("{title} | "));
    }
    line
}

/// One user's history as a chain, newest first
#[must_use]
pub fn user_history_line(history: &UserHistoryStore, user_id: &str) -> String {
    let mut titles = history.history_of(user_id).peekable();
    if titles.peek().is_none() {
        return format!("No history found for {user_id}");
    }

    let mut line = format!("{user_id}'s History: ");
    for title in titles {
        line.push_str(&format!("{title} -> "));
    }
    line.push_str("null");
    line
}

/// Every user's history, one line each
#[must_use]
pub fn all_histories(history: &UserHistoryStore) -> String {
    if history.is_empty() {
        return "No user histories available.".to_string();
    }

    history.users().map(|user| user_history_line(history, user)).collect::<Vec<_>>().join("\n")
}

/// Message explaining why `operation` was refused
#[must_use]
pub fn rejection_message(operation: Operation, error: &CirculationError) -> String {
    match (operation, error) {
        (_, CirculationError::CapacityExceeded { conduit: Conduit::BorrowQueue, .. }) => {
            "Queue is full!".to_string()
        }
        (_, CirculationError::CapacityExceeded { conduit: Conduit::ReturnStack, .. }) => {
            "Stack is full!".to_string()
        }
        (_, CirculationError::Empty { conduit: Conduit::BorrowQueue }) => {
            "No pending borrow requests.".to_string()
        }
        (_, CirculationError::Empty { conduit: Conduit::ReturnStack }) => {
            "No books to process.".to_string()
        }
        (_, CirculationError::NotFound { id }) => {
            format!("Book with ISBN '{id}' not found in inventory.")
        }
        (_, CirculationError::Malformed { request }) => format!("Malformed borrow request: {request}"),
        (Operation::RequestBorrow, CirculationError::Unavailable { title }) => {
            format!("Cannot request: '{title}' is not available in inventory.")
        }
        (Operation::IssueNext, CirculationError::Unavailable { title }) => {
            format!("Cannot issue: '{title}' is not available in inventory.")
        }
        (Operation::RecordReturn, CirculationError::Unavailable { title }) => {
            format!("Cannot record return: '{title}' is not recognized in inventory.")
        }
        (Operation::RecordReturn, CirculationError::NotIssued { title }) => {
            format!("Cannot record return: '{title}' was not issued.")
        }
        (Operation::ProcessReturn, CirculationError::NotIssued { title }) => {
            format!("Warning: '{title}' was not marked as issued. Skipping.")
        }
        (_, error) => error.to_string(),
    }
}

/// One-line summary of an event
#[must_use]
pub fn describe_event(event: &CirculationEvent) -> String {
    match event {
        CirculationEvent::BookAdded { id, title } => format!("added [{id}] {title}"),
        CirculationEvent::DuplicateIgnored { id } => format!("ignored duplicate [{id}]"),
        CirculationEvent::BookRemoved { id } => format!("removed [{id}]"),
        CirculationEvent::BorrowRequested { user_id, title } => {
            format!("{user_id} requested {title}")
        }
        CirculationEvent::Issued { user_id, title } => format!("issued {title} to {user_id}"),
        CirculationEvent::ReturnRecorded { title } => format!("return of {title} recorded"),
        CirculationEvent::ReturnProcessed { title } => format!("return of {title} processed"),
        CirculationEvent::HistoryEntryRemoved { user_id, title } => {
            format!("removed {title} from {user_id}'s history")
        }
        CirculationEvent::Rejected { operation, error } => {
            format!("rejected: {}", rejection_message(*operation, error))
        }
    }
}

/// Markdown table of journal entries
#[must_use]
pub fn journal_table(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return "No activity recorded yet.".to_string();
    }

    let mut table = String::from("| # | Event |\n");
    table.push_str("|---|-------|\n");
    for entry in entries {
        table.push_str(&format!("| {} | {} |\n", entry.sequence, describe_event(&entry.event)));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{book::BookRecord, borrow_queue::BorrowRequest};

    #[test]
    fn listings_for_empty_state() {
        assert_eq!(catalog_listing(&Catalog::new()), "No books available.");
        assert_eq!(borrow_queue_line(&BorrowConduit::with_capacity(1)), "Queue is empty!");
        assert_eq!(return_stack_line(&ReturnConduit::with_capacity(1)), "Stack is empty!");
        assert_eq!(all_histories(&UserHistoryStore::new()), "No user histories available.");
        assert_eq!(journal_table(&[]), "No activity recorded yet.");
    }

    #[test]
    fn catalog_listing_is_sorted() {
        let catalog: Catalog = [
            BookRecord::new("002", "Emma", "Austen"),
            BookRecord::new("001", "Dune", "Herbert"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            catalog_listing(&catalog),
            "Books in Inventory (Sorted):\n[001] Dune by Herbert\n[002] Emma by Austen"
        );
    }

    #[test]
    fn conduit_lines() {
        let mut queue = BorrowConduit::with_capacity(4);
        assert!(queue.enqueue(BorrowRequest::new("u1", "A")).is_ok());
        assert!(queue.enqueue(BorrowRequest::new("u2", "B")).is_ok());
        assert_eq!(borrow_queue_line(&queue), "Borrow Requests: u1|A | u2|B | ");

        let mut stack = ReturnConduit::with_capacity(4);
        assert!(stack.push("A").is_ok());
        assert!(stack.push("B").is_ok());
        assert_eq!(return_stack_line(&stack), "Remaining Books: A | B | ");
    }

    #[test]
    fn history_chain() {
        let mut history = UserHistoryStore::new();
        history.add_entry("u1", "Dune");
        history.add_entry("u1", "Emma");

        assert_eq!(user_history_line(&history, "u1"), "u1's History: Emma -> Dune -> null");
        assert_eq!(user_history_line(&history, "u2"), "No history found for u2");
    }

    #[test]
    fn rejection_wording_depends_on_operation() {
        let unavailable = CirculationError::Unavailable { title: "Dune".to_string() };
        assert_eq!(
            rejection_message(Operation::RequestBorrow, &unavailable),
            "Cannot request: 'Dune' is not available in inventory."
        );
        assert_eq!(
            rejection_message(Operation::RecordReturn, &unavailable),
            "Cannot record return: 'Dune' is not recognized in inventory."
        );

        let not_issued = CirculationError::NotIssued { title: "Dune".to_string() };
        assert_eq!(
            rejection_message(Operation::ProcessReturn, &not_issued),
            "Warning: 'Dune' was not marked as issued. Skipping."
        );
    }

    #[test]
    fn journal_rows() {
        let entries = [JournalEntry {
            sequence: 7,
            event: CirculationEvent::Issued { user_id: "u1".to_string(), title: "Dune".to_string() },
        }];
        assert_eq!(journal_table(&entries), "| # | Event |\n|---|-------|\n| 7 | issued Dune to u1 |\n");
    }
}
