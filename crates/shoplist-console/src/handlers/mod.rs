//! Inbound line handlers.
//!
//! Each handler parses a line, runs it through the `ShoppingService` and
//! renders the reply as plain text.

mod commands;

pub use commands::{handle_command, render_reply};
