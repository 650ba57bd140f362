//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model, persistence and pagination into UI-level operations.
//! - Keep presentation layers decoupled from storage details.

pub mod contact_book;
