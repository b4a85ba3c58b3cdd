use crate::domain::{AddResult, ListView, RemoveResult};

/// A parsed inbound command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    List,
    /// Raw text after the command token.
    Add(String),
    /// Raw text after the command token.
    Remove(String),
    Clear,
    Undo,
    Unknown(String),
}

impl Command {
    /// Parse `/cmd@botname args` (or bare `cmd args`).
    ///
    /// Returns `None` for blank input and for commands addressed to another bot.
    pub fn parse(text: &str, bot_name: &str) -> Option<Self> {
        let (cmd, target, rest) = split_command(text)?;
        if let Some(target) = target {
            if !target.eq_ignore_ascii_case(bot_name) {
                return None;
            }
        }

        Some(match cmd.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "list" => Self::List,
            "add" => Self::Add(rest),
            "remove" => Self::Remove(rest),
            "clear" => Self::Clear,
            "undo" => Self::Undo,
            _ => Self::Unknown(cmd),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::List => "list",
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::Clear => "clear",
            Self::Undo => "undo",
            Self::Unknown(name) => name,
        }
    }
}

fn split_command(text: &str) -> Option<(String, Option<String>, String)> {
    // Chat platforms may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let first = first.trim_start_matches('/');
    if first.is_empty() {
        return None;
    }

    let (cmd, target) = match first.split_once('@') {
        Some((cmd, target)) => (cmd, Some(target.to_string())),
        None => (first, None),
    };

    Some((cmd.to_lowercase(), target, rest))
}

/// Outcome of one command, handed back to the transport for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandReply {
    Help,
    List(ListView),
    Add(AddResult),
    Remove(RemoveResult),
    Cleared,
    Restored(ListView),
    Unknown(String),
}

/// Commands shown by `/start` and `/help`.
pub const COMMAND_OVERVIEW: &[(&str, &str)] = &[
    ("list", "Show products in the shopping list"),
    ("add", "Add product to the shopping list"),
    ("remove", "Remove a product from the shopping list"),
    ("clear", "Remove all products from the shopping list"),
    ("undo", "Undo last action"),
];
