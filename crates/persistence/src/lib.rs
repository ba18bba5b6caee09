//! Persistence layer for the smart home analytics backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - The PostgreSQL usage record store
//! - Query-duration metrics

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
