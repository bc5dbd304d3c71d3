//! Line-driven menu over a [`CirculationEngine`].
//!
//! Reads choices and field values from any `BufRead` and writes prompts and
//! results to any `Write`, so sessions can be scripted.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::{
    book::BookRecord,
    engine::CirculationEngine,
    events::{JournalEntry, Operation},
    report,
};

/// Menu entries in display order; the exit entry is printed after them
const MENU: [&str; 13] = [
    "1. Add Book to Inventory",
    "2. Delete Book from Inventory",
    "3. Display Books (In-order)",
    "4. Borrow a Book (Add Request)",
    "5. Issue Book (Process Borrow Request)",
    "6. Display Borrow Queue",
    "7. Return a Book",
    "8. Process to Return a Book",
    "9. Remove Book from User History",
    "10. Display User History",
    "11. Display All Users' Histories",
    "12. Display Recent Activity",
    "13. Export State as JSON",
];

/// Highest valid menu number
const MAX_CHOICE: u8 = 13;

/// Whether the loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Show the menu again
    Continue,
    /// Leave the loop
    Exit,
}

/// Interactive menu loop
#[derive(Debug)]
pub struct Shell<R, W> {
    /// The engine being driven
    engine: CirculationEngine,
    /// Source of menu choices and field values
    input: R,
    /// Destination for prompts and results
    output: W,
    /// Whether to colorize the menu
    color: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a shell over `engine`. Color is off until enabled.
    #[must_use]
    pub fn new(engine: CirculationEngine, input: R, output: W) -> Self {
        Self { engine, input, output, color: false }
    }

    /// Enable or disable menu coloring
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// The engine being driven
    #[must_use]
    pub fn engine(&self) -> &CirculationEngine {
        &self.engine
    }

    /// Give the engine back, dropping the I/O handles
    #[must_use]
    pub fn into_engine(self) -> CirculationEngine {
        self.engine
    }

    /// Run until the user exits or input ends
    ///
    /// # Errors
    ///
    /// Returns any error from reading input or writing output.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.read_choice()? else {
                return Ok(());
            };
            if self.dispatch(choice)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Carry out one menu choice
    fn dispatch(&mut self, choice: u8) -> io::Result<Flow> {
        match choice {
            1 => self.add_book(),
            2 => self.delete_book(),
            3 => self.say(&report::catalog_listing(self.engine.catalog())),
            4 => self.request_borrow(),
            5 => self.issue_next(),
            6 => self.say(&report::borrow_queue_line(self.engine.borrow_queue())),
            7 => self.record_return(),
            8 => self.process_return(),
            9 => self.remove_history_entry(),
            10 => self.show_history(),
            11 => {
                self.say("All Users' Histories:")?;
                self.say(&report::all_histories(self.engine.history()))
            }
            12 => {
                let entries: Vec<JournalEntry> = self.engine.journal().cloned().collect();
                self.say(&report::journal_table(&entries))
            }
            13 => {
                let json = serde_json::to_string_pretty(&self.engine.snapshot())?;
                self.say(&json)
            }
            0 => {
                self.say("Exiting System...")?;
                return Ok(Flow::Exit);
            }
            _ => self.say("Invalid choice. Try again!"),
        }?;
        Ok(Flow::Continue)
    }

    /// Menu option 1
    fn add_book(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt("Enter ISBN: ")? else {
            return Ok(());
        };
        let Some(title) = self.prompt("Enter Title: ")? else {
            return Ok(());
        };
        let Some(author) = self.prompt("Enter Author: ")? else {
            return Ok(());
        };

        if self.engine.add_book(BookRecord::new(id.as_str(), title, author)) {
            self.say("Book added!")
        } else {
            self.say(&format!("Book with ISBN '{id}' already exists; keeping the existing record."))
        }
    }

    /// Menu option 2
    fn delete_book(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt("Enter ISBN to delete: ")? else {
            return Ok(());
        };

        match self.engine.remove_book(&id) {
            Ok(()) => self.say("Book deleted."),
            Err(error) => self.say(&report::rejection_message(Operation::RemoveBook, &error)),
        }
    }

    /// Menu option 4
    fn request_borrow(&mut self) -> io::Result<()> {
        let Some(user) = self.prompt("Enter Username: ")? else {
            return Ok(());
        };
        let Some(title) = self.prompt("Enter Book Title to Borrow: ")? else {
            return Ok(());
        };

        match self.engine.request_borrow(&user, &title) {
            Ok(()) => self.say(&format!("Borrow request added for {user} => {title}")),
            Err(error) => self.say(&report::rejection_message(Operation::RequestBorrow, &error)),
        }
    }

    /// Menu option 5
    fn issue_next(&mut self) -> io::Result<()> {
        match self.engine.issue_next() {
            Ok(loan) => {
                self.say(&format!("Issued: {} to {} (history updated)", loan.title, loan.user_id))
            }
            Err(error) => self.say(&report::rejection_message(Operation::IssueNext, &error)),
        }
    }

    /// Menu option 7
    fn record_return(&mut self) -> io::Result<()> {
        let Some(title) = self.prompt("Enter Returned Book Title: ")? else {
            return Ok(());
        };

        match self.engine.record_return(&title) {
            Ok(()) => self.say("Book return recorded (awaiting processing)."),
            Err(error) => self.say(&report::rejection_message(Operation::RecordReturn, &error)),
        }
    }

    /// Menu option 8
    fn process_return(&mut self) -> io::Result<()> {
        match self.engine.process_next_return() {
            Ok(title) => self.say(&format!("{title} Book Has Been Returned"))?,
            Err(error) => self.say(&report::rejection_message(Operation::ProcessReturn, &error))?,
        }
        self.say(&report::return_stack_line(self.engine.return_stack()))
    }

    /// Menu option 9
    fn remove_history_entry(&mut self) -> io::Result<()> {
        let Some(user) = self.prompt("Enter Username: ")? else {
            return Ok(());
        };
        let Some(title) = self.prompt("Enter Book Title to remove from History: ")? else {
            return Ok(());
        };

        if self.engine.remove_history_entry(&user, &title) {
            self.say(&format!("Removed '{title}' from {user}'s history."))
        } else {
            self.say(&format!("'{title}' not found in {user}'s history."))
        }
    }

    /// Menu option 10
    fn show_history(&mut self) -> io::Result<()> {
        let Some(user) = self.prompt("Enter Username: ")? else {
            return Ok(());
        };
        self.say(&report::user_history_line(self.engine.history(), &user))
    }

    /// Print the banner and every option
    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "===================================")?;
        writeln!(self.output, "==== Library Management System ====")?;
        writeln!(self.output, "===================================")?;
        for entry in MENU.iter().chain(["0. Exit"].iter()) {
            if self.color {
                writeln!(self.output, "{}", entry.green())?;
            } else {
                writeln!(self.output, "{entry}")?;
            }
        }
        Ok(())
    }

    /// Read a menu number, re-prompting until one is in range. `None` at end
    /// of input.
    fn read_choice(&mut self) -> io::Result<Option<u8>> {
        loop {
            let Some(line) = self.read_line("Enter choice: ")? else {
                return Ok(None);
            };
            match line.parse::<u8>() {
                Ok(choice) if choice <= MAX_CHOICE => return Ok(Some(choice)),
                Ok(_) => self.say(&format!("Please enter a number between 0 and {MAX_CHOICE}."))?,
                Err(_) => self.say("Invalid number. Try again.")?,
            }
        }
    }

    /// Read a non-blank, trimmed value, re-prompting while blank. `None` at
    /// end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        loop {
            let Some(line) = self.read_line(label)? else {
                return Ok(None);
            };
            if !line.is_empty() {
                return Ok(Some(line));
            }
            self.say("Input cannot be empty. Try again.")?;
        }
    }

    /// Show `label` and read one trimmed line. `None` at end of input.
    fn read_line(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Write one line of output
    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }
}
