//! Operator-facing output: status levels, the sink trait, and the colored console printer.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::registry::Registry;

pub const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn marker(self) -> &'static str {
        match self {
            Self::Info => "[*]",
            Self::Success => "[✓]",
            Self::Warning => "[!]",
            Self::Error => "[✗]",
        }
    }
}

/// Where the coordinator and shell send everything the operator sees.
pub trait StatusSink {
    /// A one-line status message at `level`.
    fn status(&mut self, level: Level, message: &str);

    /// A section heading, e.g. the `MODULE 1: ...` block.
    fn heading(&mut self, title: &str);

    /// Unformatted text such as captured script output.
    fn plain(&mut self, text: &str);

    /// A question awaiting operator input on the same line.
    fn prompt(&mut self, question: &str);
}

pub fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

pub fn print_banner(sink: &mut dyn StatusSink) {
    sink.heading("LINUX SYSTEM HARDENING TOOL\nBased on Security Annexure B Requirements");
}

pub fn print_menu(sink: &mut dyn StatusSink, registry: &Registry) {
    let mut menu = String::from("\nAvailable Hardening Modules:\n");
    for m in registry.iter() {
        menu.push_str(&format!("  [{}] {}\n", m.id, m.name));
    }
    menu.push_str("  [A] Run All Modules\n");
    menu.push_str("  [S] Scan Only (No Fixes)\n");
    menu.push_str("  [Q] Quit");
    sink.plain(&menu);
}

pub struct ConsolePrinter {
    pub color: bool,
}

impl ConsolePrinter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl StatusSink for ConsolePrinter {
    fn status(&mut self, level: Level, message: &str) {
        let line = format!("{} {}", level.marker(), message);
        if !self.color {
            println!("{}", line);
            return;
        }
        match level {
            Level::Info => println!("{}", line.blue()),
            Level::Success => println!("{}", line.green()),
            Level::Warning => println!("{}", line.yellow()),
            Level::Error => println!("{}", line.red()),
        }
    }

    fn heading(&mut self, title: &str) {
        let block = format!("\n{}\n{}\n{}", rule('='), title, rule('='));
        if self.color {
            println!("{}", block.cyan());
        } else {
            println!("{}", block);
        }
    }

    fn plain(&mut self, text: &str) {
        println!("{}", text);
    }

    fn prompt(&mut self, question: &str) {
        if self.color {
            print!("{}", question.bold());
        } else {
            print!("{}", question);
        }
        io::stdout().flush().ok();
    }
}
