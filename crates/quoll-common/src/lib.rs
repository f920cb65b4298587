//! Common utilities for the Quoll HTML toolkit.
//!
//! This crate provides shared infrastructure used by the tokenizer and any
//! downstream tools built on it:
//! - **Warning System** - colored, deduplicated terminal output for
//!   recoverable problems that no registered handler consumed

pub mod warning;
