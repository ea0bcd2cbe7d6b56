//! Core business logic for Paylane.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and result shaping live here.
//!
//! # Modules
//!
//! - `payment` - Payment requests, error taxonomy, ledger postings,
//!   settlement capability and caller-facing outcomes

pub mod payment;
