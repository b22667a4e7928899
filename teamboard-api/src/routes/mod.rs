/// API route handlers
///
/// Handlers are grouped by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, sessions, current user
/// - `dashboard`: Aggregated dashboard
/// - `projects`: Project creation, listing, detail, invitations to existing projects
/// - `invitations`: Pending invitations and responses
/// - `tasks`: Task creation, listing, status transitions

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod invitations;
pub mod projects;
pub mod tasks;
