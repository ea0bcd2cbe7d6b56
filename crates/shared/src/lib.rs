//! Shared types and configuration for Paylane.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision and validated currency codes
//! - Typed IDs for type-safe entity references
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
