//! Output formatting for console display.

pub mod console;

pub use console::ConsoleFormatter;
