//! Terminal output for script runs.
//!
//! Query results go to stdout uncoloured so they can be piped; colour follows
//! NO_COLOR, CLICOLOR and CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// A command changed the tree
pub fn changed(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// A lookup or delete found nothing; goes to stderr
pub fn miss(msg: &(impl Display + ?Sized)) {
    eprintln!("{} {}", "∅".yellow(), msg);
}

/// Script line about to run, prefixed with its line number
pub fn echo(line: usize, source: &str) {
    println!("{}", format!("{:>4}> {}", line, source).dimmed());
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
