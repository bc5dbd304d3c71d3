//! End-to-end circulation scenarios through the public API.

use library_circulation::{
    BookRecord, BorrowRequest, CirculationEngine, CirculationError, EngineConfig, Loan,
};

fn history(engine: &CirculationEngine, user: &str) -> Vec<String> {
    engine.history().history_of(user).map(str::to_string).collect()
}

#[test]
fn dune_is_borrowed_issued_and_returned() {
    let mut engine = CirculationEngine::new(&EngineConfig::default());
    assert!(engine.add_book(BookRecord::new("001", "Dune", "Herbert")));

    assert_eq!(engine.request_borrow("u1", "Dune"), Ok(()));

    assert_eq!(
        engine.issue_next(),
        Ok(Loan { user_id: "u1".to_string(), title: "Dune".to_string() })
    );
    assert_eq!(history(&engine, "u1"), ["Dune"]);
    assert_eq!(engine.ledger().outstanding("dune"), 1);

    assert_eq!(engine.record_return("Dune"), Ok(()));

    assert_eq!(engine.process_next_return(), Ok("Dune".to_string()));
    assert_eq!(engine.ledger().outstanding("dune"), 0);
    assert!(!engine.ledger().has_outstanding("Dune"));

    // The history outlives the loan
    assert_eq!(history(&engine, "u1"), ["Dune"]);
}

#[test]
fn returns_are_processed_most_recent_first() {
    let mut engine = CirculationEngine::default();
    engine.add_book(BookRecord::new("001", "Dune", "Herbert"));
    engine.add_book(BookRecord::new("002", "Emma", "Austen"));

    for (user, title) in [("u1", "Dune"), ("u2", "Emma")] {
        assert!(engine.request_borrow(user, title).is_ok());
    }
    assert!(engine.issue_next().is_ok());
    assert!(engine.issue_next().is_ok());

    assert!(engine.record_return("Dune").is_ok());
    assert!(engine.record_return("Emma").is_ok());

    assert_eq!(engine.process_next_return(), Ok("Emma".to_string()));
    assert_eq!(engine.process_next_return(), Ok("Dune".to_string()));
    assert!(engine.ledger().is_empty());
}

#[test]
fn requests_are_issued_in_arrival_order() {
    let mut engine = CirculationEngine::default();
    engine.add_book(BookRecord::new("001", "Dune", "Herbert"));
    engine.add_book(BookRecord::new("002", "Emma", "Austen"));

    assert!(engine.request_borrow("u1", "Emma").is_ok());
    assert!(engine.request_borrow("u2", "Dune").is_ok());

    let pending: Vec<String> = engine.borrow_queue().iter().map(ToString::to_string).collect();
    assert_eq!(pending, ["u1|Emma", "u2|Dune"]);

    assert_eq!(engine.issue_next().map(|loan| loan.user_id), Ok("u1".to_string()));
    assert_eq!(engine.issue_next().map(|loan| loan.user_id), Ok("u2".to_string()));
}

#[test]
fn withdrawn_title_cannot_be_issued_or_returned() {
    let mut engine = CirculationEngine::default();
    engine.add_book(BookRecord::new("001", "Dune", "Herbert"));

    assert!(engine.request_borrow("u1", "Dune").is_ok());
    assert!(engine.request_borrow("u2", "Dune").is_ok());
    assert!(engine.issue_next().is_ok());

    assert!(engine.remove_book("001").is_ok());

    // u2's request is consumed and dropped
    assert_eq!(
        engine.issue_next(),
        Err(CirculationError::Unavailable { title: "Dune".to_string() })
    );
    assert!(engine.borrow_queue().is_empty());

    // u1 still holds a copy, but the title is no longer recognized
    assert_eq!(
        engine.record_return("Dune"),
        Err(CirculationError::Unavailable { title: "Dune".to_string() })
    );
    assert_eq!(engine.ledger().outstanding("Dune"), 1);
}

#[test]
fn directly_queued_token_is_issued() {
    let mut engine = CirculationEngine::default();
    engine.add_book(BookRecord::new("001", "Dune", "Herbert"));

    let token: BorrowRequest = match "u9|Dune".parse() {
        Ok(request) => request,
        Err(never) => match never {},
    };
    assert!(engine.borrow_queue_mut().enqueue(token).is_ok());

    assert!(engine.issue_next().is_ok());
    assert_eq!(history(&engine, "u9"), ["Dune"]);
}
