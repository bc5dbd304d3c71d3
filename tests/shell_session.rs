//! Scripted menu sessions.

use library_circulation::{BookRecord, CirculationEngine, Shell};

/// Run `script` against `engine`, returning the transcript and the engine
fn run_script(engine: CirculationEngine, script: &str) -> (String, CirculationEngine) {
    let mut output = Vec::new();
    let mut shell = Shell::new(engine, script.as_bytes(), &mut output);
    #[allow(clippy::expect_used)]
    shell.run().expect("in-memory session should not fail");
    let engine = shell.into_engine();
    (String::from_utf8_lossy(&output).into_owned(), engine)
}

#[test]
fn full_circulation_session() {
    let script = "\
1\n001\nDune\nHerbert\n\
4\nu1\ndune\n\
6\n\
5\n\
7\nDune\n\
8\n\
10\nu1\n\
0\n";
    let (transcript, engine) = run_script(CirculationEngine::default(), script);

    assert!(transcript.contains("Book added!"));
    assert!(transcript.contains("Borrow request added for u1 => dune"));
    assert!(transcript.contains("Borrow Requests: u1|dune | "));
    assert!(transcript.contains("Issued: dune to u1 (history updated)"));
    assert!(transcript.contains("Book return recorded (awaiting processing)."));
    assert!(transcript.contains("Dune Book Has Been Returned"));
    assert!(transcript.contains("Stack is empty!"));
    assert!(transcript.contains("u1's History: dune -> null"));
    assert!(transcript.ends_with("Exiting System...\n"));

    assert!(engine.ledger().is_empty());
    assert_eq!(engine.catalog().len(), 1);
}

#[test]
fn rejections_are_explained() {
    let mut engine = CirculationEngine::default();
    engine.add_book(BookRecord::new("001", "Dune", "Herbert"));

    let script = "\
2\n999\n\
4\nu1\nUlysses\n\
5\n\
7\nDune\n\
8\n\
0\n";
    let (transcript, _) = run_script(engine, script);

    assert!(transcript.contains("Book with ISBN '999' not found in inventory."));
    assert!(transcript.contains("Cannot request: 'Ulysses' is not available in inventory."));
    assert!(transcript.contains("No pending borrow requests."));
    assert!(transcript.contains("Cannot record return: 'Dune' was not issued."));
    assert!(transcript.contains("No books to process."));
}

#[test]
fn bad_input_is_reprompted() {
    let script = "abc\n42\n1\n   \n001\nDune\nHerbert\n3\n";
    let (transcript, engine) = run_script(CirculationEngine::default(), script);

    assert!(transcript.contains("Invalid number. Try again."));
    assert!(transcript.contains("Please enter a number between 0 and 13."));
    assert!(transcript.contains("Input cannot be empty. Try again."));
    assert!(transcript.contains("Books in Inventory (Sorted):\n[001] Dune by Herbert"));

    // End of input without an explicit exit
    assert!(!transcript.contains("Exiting System..."));
    assert!(engine.catalog().contains_id("001"));
}

#[test]
fn duplicate_insert_and_history_removal() {
    let script = "\
1\n001\nDune\nHerbert\n\
1\n001\nEmma\nAusten\n\
4\nu1\nDune\n\
5\n\
9\nu1\ndune\n\
9\nu1\nDune\n\
11\n\
0\n";
    let (transcript, engine) = run_script(CirculationEngine::default(), script);

    assert!(transcript.contains("Book with ISBN '001' already exists; keeping the existing record."));
    assert!(transcript.contains("'dune' not found in u1's history."));
    assert!(transcript.contains("Removed 'Dune' from u1's history."));
    assert!(transcript.contains("All Users' Histories:\nNo user histories available."));
    assert_eq!(engine.catalog().get("001").map(|record| record.title.as_str()), Some("Dune"));
}

#[test]
fn activity_and_json_export() {
    let script = "\
1\n001\nDune\nHerbert\n\
4\nu1\nDune\n\
12\n\
13\n\
0\n";
    let (transcript, _) = run_script(CirculationEngine::default(), script);

    assert!(transcript.contains("| 1 | added [001] Dune |"));
    assert!(transcript.contains("| 2 | u1 requested Dune |"));
    assert!(transcript.contains("\"pending_borrows\": ["));
    assert!(transcript.contains("\"user_id\": \"u1\""));
    assert!(transcript.contains("\"borrow_capacity\": 100"));
    assert!(transcript.contains("\"total_on_loan\": 0"));
}
