//! Outbound adapters implementing the domain's repository ports.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//! - **memory**: a mutex-guarded store used when no database is configured
//!   and by the test suites.
//!
//! Adapters are thin translators between domain types and storage rows.
//! They contain no business logic.

pub mod memory;
pub mod persistence;
