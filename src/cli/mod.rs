//! Interactive menu over the catalog

pub mod prompt;

use std::io::{self, BufRead, Write};

use chrono::Utc;

use crate::{
    error::AppError,
    models::{book::NewBook, loan::ReturnOutcome},
    services::catalog::Catalog,
};

pub use prompt::Prompter;

const BANNER_RULE: &str = "==============================================";
const MENU_RULE: &str = "----------------------------------------------";

enum Flow {
    Continue,
    Exit,
}

/// Numbered menu loop; the only caller of catalog operations in the binary
pub struct Menu<'a, R, W> {
    catalog: &'a mut Catalog,
    prompter: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(catalog: &'a mut Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            prompter: Prompter::new(input, output),
        }
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Run until "save & exit" is chosen or input ends, which also saves.
    ///
    /// Only I/O errors on the terminal streams end the loop early.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompter.ask("Enter your choice (1-6): ")? else {
                self.save()?;
                return Ok(());
            };

            let flow = match choice.as_str() {
                "1" => self.add_book()?,
                "2" => self.display_all_books()?,
                "3" => self.search_book()?,
                "4" => self.issue_book()?,
                "5" => self.return_book()?,
                "6" => {
                    self.save()?;
                    writeln!(
                        self.out(),
                        "Thank you for using the Library Management System. Goodbye!"
                    )?;
                    Flow::Exit
                }
                _ => {
                    writeln!(
                        self.out(),
                        "\nInvalid choice. Please enter a number between 1 and 6."
                    )?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                return Ok(());
            }
        }
    }

    fn out(&mut self) -> &mut W {
        self.prompter.output()
    }

    fn print_menu(&mut self) -> io::Result<()> {
        let out = self.out();
        writeln!(out, "\n{}", BANNER_RULE)?;
        writeln!(out, "    LIBRARY MANAGEMENT SYSTEM")?;
        writeln!(out, "{}", BANNER_RULE)?;
        writeln!(out, "1. Add New Book")?;
        writeln!(out, "2. Display All Books")?;
        writeln!(out, "3. Search Book (by ID or Title)")?;
        writeln!(out, "4. Issue Book")?;
        writeln!(out, "5. Return Book & Calculate Fine")?;
        writeln!(out, "6. Exit & Save Catalog")?;
        writeln!(out, "{}", MENU_RULE)
    }

    fn add_book(&mut self) -> io::Result<Flow> {
        writeln!(self.out(), "\n--- Add New Book ---")?;
        let Some(title) = self.prompter.ask("Enter Title: ")? else {
            return self.end_of_input();
        };
        let Some(author) = self.prompter.ask("Enter Author: ")? else {
            return self.end_of_input();
        };
        let Some(copies) = self.prompter.ask_positive("Enter Total Number of Copies: ")? else {
            return self.end_of_input();
        };

        let request = NewBook {
            title,
            author,
            copies,
        };
        let message = match self.catalog.add_book(request) {
            Ok(book) => format!("\nBook '{}' added with ID: {}", book.title, book.id),
            Err(e) => e.to_string(),
        };
        writeln!(self.out(), "{}", message)?;
        Ok(Flow::Continue)
    }

    fn display_all_books(&mut self) -> io::Result<Flow> {
        let now = Utc::now();
        let listing = self.catalog.to_string();
        let active = self.catalog.loans().count();
        let overdue = self.catalog.count_overdue(now);

        let out = self.prompter.output();
        writeln!(out, "\n--- Current Library Catalog ---")?;
        write!(out, "{}", listing)?;
        if active > 0 {
            writeln!(out, "Active loans: {} ({} overdue)", active, overdue)?;
        }
        Ok(Flow::Continue)
    }

    fn search_book(&mut self) -> io::Result<Flow> {
        let Some(query) = self.prompter.ask("\nEnter Book ID or Title to search: ")? else {
            return self.end_of_input();
        };

        let out = self.prompter.output();
        match self.catalog.search_books(&query) {
            Ok(found) if found.is_empty() => {
                writeln!(out, "No book found matching '{}'.", query)?;
            }
            Ok(found) => {
                writeln!(out, "\n--- Search Results ---")?;
                for book in found {
                    writeln!(out, "{}", book)?;
                }
            }
            Err(e) => writeln!(out, "{}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn issue_book(&mut self) -> io::Result<Flow> {
        let Some(query) = self.prompter.ask("\nEnter Book ID or Title to issue: ")? else {
            return self.end_of_input();
        };

        let message = match self.catalog.issue_book(&query) {
            Ok(loan) => {
                let title = self
                    .catalog
                    .book(&loan.book_id)
                    .map(|b| b.title.clone())
                    .unwrap_or_default();
                format!(
                    "Successfully issued '{}'.\n   Due Date: {}",
                    title,
                    loan.due_at.format("%Y-%m-%d")
                )
            }
            Err(AppError::NoCopiesAvailable { title, .. }) => {
                format!("Cannot issue '{}'. All copies are currently checked out.", title)
            }
            Err(e) => failure_message(&e),
        };
        writeln!(self.out(), "{}", message)?;
        Ok(Flow::Continue)
    }

    fn return_book(&mut self) -> io::Result<Flow> {
        let Some(query) = self.prompter.ask("\nEnter Book ID or Title to return: ")? else {
            return self.end_of_input();
        };

        let currency = self.catalog.policy().currency.clone();
        let message = match self.catalog.return_book(&query) {
            Ok(ReturnOutcome::Returned { book, overdue_days, fine, .. }) => {
                let mut message = format!("Successfully returned '{}'.\n", book.title);
                if overdue_days > 0 {
                    message.push_str(&format!(
                        "Book is {} days overdue. Fine: {} {:.2}",
                        overdue_days, currency, fine
                    ));
                } else {
                    message.push_str("   Returned on time. No fine.");
                }
                message
            }
            Ok(ReturnOutcome::Untracked { book, restocked }) => {
                let mut message = format!("Book ID {} was not recorded as issued.", book.id);
                if restocked {
                    message.push_str("\n   (Available copies incremented anyway.)");
                }
                message
            }
            Err(AppError::AlreadyFullyStocked { title, .. }) => format!(
                "Error: Cannot return '{}'. Available copies equals total copies.",
                title
            ),
            Err(e) => failure_message(&e),
        };
        writeln!(self.out(), "{}", message)?;
        Ok(Flow::Continue)
    }

    fn save(&mut self) -> io::Result<()> {
        let message = match self.catalog.save_books() {
            Ok(()) => format!(
                "\n--- Catalog saved successfully to {} ---",
                self.catalog.data_file().display()
            ),
            Err(e) => {
                tracing::error!("Saving catalog failed: {}", e);
                format!("\n!!! ERROR: Could not save data to file. {} !!!", e)
            }
        };
        writeln!(self.out(), "{}", message)
    }

    fn end_of_input(&mut self) -> io::Result<Flow> {
        self.save()?;
        Ok(Flow::Exit)
    }
}

fn failure_message(error: &AppError) -> String {
    match error {
        AppError::NotFound(_) => "Book not found in the catalog.".to_string(),
        other => other.to_string(),
    }
}
