//! Pure scheduling algorithms.
//!
//! # Responsibility
//! - Conflict detection, free-slot search, priority-based resolution and
//!   derived-event candidate generation.
//!
//! # Invariants
//! - Nothing in this module touches persistence or performs I/O; every
//!   function only reads its arguments, so concurrent calls need no
//!   coordination.

pub mod conflict;
pub mod resolve;
pub mod slots;
pub mod study_plan;
