//! # HirePath Shared Library
//!
//! This crate contains the domain types, persistence layer and workflow logic
//! shared by the HirePath API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pool and migrations
//! - `workflow`: Application-progress state machine
//! - `mail`: Outgoing email (SMTP, file spool, in-memory)
//! - `storage`: Uploaded document storage

pub mod auth;
pub mod db;
pub mod mail;
pub mod models;
pub mod storage;
pub mod workflow;

/// Current version of the HirePath shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
