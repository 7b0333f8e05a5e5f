//! Domain model for the scheduling core.
//!
//! # Responsibility
//! - Define the canonical data structures used by scheduling logic.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - Every event is identified by a stable `EventId`.
//! - All instants are timezone-aware (`DateTime<Utc>`); nothing naive leaves
//!   this layer.

pub mod audit;
pub mod category;
pub mod event;
pub mod time_range;
