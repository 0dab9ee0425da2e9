//! # HirePath API Server Library
//!
//! This library provides the HTTP layer of the HirePath recruitment backend.
//! Domain types, persistence and the progression workflow live in
//! `hirepath-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `bootstrap`: First administrator provisioning
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: JWT authentication and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
