//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for events, categories
//!   and the scheduling audit.
//! - Isolate SQLite query details from engine/service orchestration.
//!
//! # Invariants
//! - Event writes must enforce `Event::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod audit_repo;
pub mod category_repo;
pub mod event_repo;
