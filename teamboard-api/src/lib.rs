//! # Teamboard API Server Library
//!
//! HTTP surface of Teamboard: configuration, router, middleware, request
//! extraction and the response/error envelopes. Business rules live in
//! `teamboard-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `cookies`: Session cookie handling
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validated JSON bodies and path IDs
//! - `middleware`: Authentication and security headers
//! - `response`: Success envelope
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod cookies;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;
