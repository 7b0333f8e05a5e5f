//! Natural-language parsing for scheduling input.
//!
//! # Responsibility
//! - Resolve a bounded set of temporal phrase patterns into concrete time
//!   ranges in the user's timezone.
//! - Extract category and title hints from free text via keyword matching.
//!
//! # Invariants
//! - Parsing is pure: no persistence, no side effects, same input always
//!   yields the same output for a fixed reference instant.
//! - Unparseable text is a normal empty result, never an error.

pub mod category;
pub mod temporal;
