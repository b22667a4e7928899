/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: access/refresh token issuance and validation
/// - [`session`]: refresh-token fingerprints and constant-time comparison
/// - [`middleware`]: request authentication and the [`AuthContext`] extractor
/// - [`authorization`]: project, task and invitation permission checks
///
/// [`AuthContext`]: middleware::AuthContext

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod session;
