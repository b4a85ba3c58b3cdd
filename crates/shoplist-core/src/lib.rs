//! Core of the shopping list bot: the list store, its persistence, and the
//! command surface.
//!
//! This crate is transport-agnostic. Chat platforms and the console live in
//! adapter crates and talk to the core through `ShoppingService` and the
//! `ReplyPort` trait.

pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod persistence;
pub mod service;
pub mod store;
pub mod utils;

pub use errors::{Error, Result};
