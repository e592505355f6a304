//! SQLite storage for the CiviPort backend.
//!
//! Provides persistence for administrators, one-time codes, and complaints.

mod db;
mod models;
mod queries;

#[cfg(test)]
mod tests;

pub use civiport_core::db::DatabaseError;
pub use db::PortalDatabase;
pub use models::*;
pub use queries::{NewComplaint, OTP_TTL_SECS};
