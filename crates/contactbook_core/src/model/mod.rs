//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its validation rules.
//! - Keep persisted timestamp formatting in one place.
//!
//! # Invariants
//! - Every contact is identified by a stable, unique `ContactId`.
//! - Invalid records are never constructed from form input or storage.

pub mod contact;
pub mod timestamp;
pub mod validation;
