//! Shared utilities and common types for the smart home analytics backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Identity token verification (HS256 tokens issued by the user service)
//! - Calendar date and time window validation

pub mod jwt;
pub mod validation;
