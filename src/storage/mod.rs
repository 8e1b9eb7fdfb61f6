//! Storage module for the local SQLite backend
//!
//! This module provides:
//! - Database connection management
//! - Schema migrations
//! - The project repository

pub mod db;
pub mod project_repo;

pub use db::{Database, open_database, open_in_memory, DatabaseError};
pub use project_repo::ProjectRepo;
