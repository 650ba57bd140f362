//! Persistence adapters for the contact collection.
//!
//! # Responsibility
//! - Translate between the in-memory collection and its stored snapshot.
//! - Keep storage media details out of the controller.
//!
//! # Invariants
//! - Records only become contacts after migration and full validation.
//! - Persistence failures never roll back the in-memory collection.

pub mod contact_store;
