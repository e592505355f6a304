//! CiviPort Portal Server Library
//!
//! Core functionality for the complaint portal backend:
//! - SQLite storage for administrators, one-time codes, and complaints
//! - JWT session tokens and argon2 password verification
//! - Axum HTTP surface (public intake + gated admin review)
//! - Outbound one-time-code delivery via an HTTP mail API
//! - Local object store for complaint photos

pub mod auth;
pub mod http;
pub mod mailer;
pub mod storage;
pub mod uploads;
