/// ANSI color helper utilities for terminal output.
use crate::models::PriorityClass;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Administrative → magenta, Volunteer → green, Fair → reset.
pub fn color_for_class(class: PriorityClass) -> &'static str {
    match class {
        PriorityClass::Administrative => MAGENTA,
        PriorityClass::Volunteer => GREEN,
        PriorityClass::Fair => RESET,
    }
}

/// Grey out placeholder values such as "--".
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
