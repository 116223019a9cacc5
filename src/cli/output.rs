//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
//! Rendered trees and listings go to stdout uncoloured so they can be piped.

use std::fmt::Display;

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print labelled value (green label)
pub fn action(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print the name of a tree as section header (cyan bold)
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print one indented statistic, labels padded to a common column
pub fn stat(label: &str, value: &(impl Display + ?Sized)) {
    let label = format!("{:<14}", format!("{label}:"));
    println!("  {} {}", label.dimmed(), value);
}

/// Print plain output (no color, for rendered trees and listings)
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
