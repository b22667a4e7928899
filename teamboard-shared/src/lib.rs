//! # Teamboard Shared Library
//!
//! This crate contains the domain types, authentication primitives,
//! persistence layer, and workflow services used by the Teamboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Domain records (users, sessions, projects, invitations, tasks,
//!   reviews, activity) and their API views
//! - `auth`: Password hashing, JWT sessions, refresh-token hashing, and
//!   project-level authorization checks
//! - `db`: PostgreSQL pool and migration runner
//! - `store`: Storage port with PostgreSQL and in-memory adapters
//! - `services`: Auth, project, invitation, task, and dashboard workflows

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Teamboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
