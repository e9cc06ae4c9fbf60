//! Console rendering of quotes, categories and notices.
use chrono::Local;
use quote_common::notify::{NotificationBoard, Notifier};
use quote_common::quote::ALL_CATEGORIES;
use quote_common::{CategoryFilter, Quote};
use std::collections::BTreeSet;

/// Prints every notice with a timestamp and keeps it on the board until it expires.
pub struct ConsoleNotifier {
    board: NotificationBoard,
}

impl ConsoleNotifier {
    /// Wraps `board`.
    pub fn new(board: NotificationBoard) -> Self {
        Self { board }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("[{}] {}", Local::now().format("%H:%M:%S"), message);
        self.board.notify(message);
    }
}

/// Prints a list of quotes, or a placeholder when the list is empty.
pub fn print_quotes(quotes: &[&Quote]) {
    if quotes.is_empty() {
        println!("No quotes available for the selected category.");
        return;
    }
    for quote in quotes {
        print_quote(quote);
    }
}

/// Prints a single quote.
pub fn print_quote(quote: &Quote) {
    println!("\"{}\"\n    Category: {}", quote.text, quote.category);
}

/// Prints the category list with the active filter marked.
pub fn print_categories(categories: &BTreeSet<String>, selected: &CategoryFilter) {
    let mark = |active: bool| if active { "*" } else { " " };
    println!("{} {}", mark(*selected == CategoryFilter::All), ALL_CATEGORIES);
    for category in categories {
        let active = matches!(selected, CategoryFilter::Category(name) if name == category);
        println!("{} {}", mark(active), category);
    }
}
