//! Fake Data Bot Library
//!
//! A Telegram bot that generates synthetic test records on command.
//!
//! This crate provides the core functionality for:
//! - Generating records with fixed field formats
//! - Appending them to a CSV store and exporting that store
//! - Rendering records as chat messages
//! - Routing bot commands and button presses to the above

pub mod commands;
pub mod config;
pub mod record;
pub mod store;
pub mod telegram;
