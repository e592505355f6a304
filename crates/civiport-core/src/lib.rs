//! Core library for CiviPort.
//!
//! Shared database helpers used by the portal server's storage layer:
//! `DatabaseError`, SQLite pool creation, and timestamp utilities.

pub mod db;
