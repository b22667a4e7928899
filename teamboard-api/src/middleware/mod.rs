/// Middleware for the API server
///
/// - `auth`: access-token authentication (required and optional)
/// - `security`: security response headers

pub mod auth;
pub mod security;
