//! Outbound adapters implementing domain ports for storage.
//!
//! - **memory**: in-process store used when no database is configured
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//!
//! Adapters are thin translators between domain types and storage
//! representations. Balance rules stay in the domain services.

pub mod memory;
pub mod persistence;
