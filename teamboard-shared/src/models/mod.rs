/// Domain models for Teamboard
///
/// This module contains the records persisted by the [`Store`](crate::store::Store)
/// implementations and the denormalized views returned by the API.
///
/// # Models
///
/// - `user`: User accounts and public user summaries
/// - `session`: Revocable login sessions (one per device)
/// - `project`: Projects, priorities, statuses, and project views
/// - `invitation`: Membership invitations and their state machine
/// - `task`: Tasks and task views
/// - `review`: Review read model fed by task status changes
/// - `activity`: Activity feed entries shown on the dashboard
/// - `datetime`: Lenient due-date parsing for request bodies
///
/// Enum-valued columns are stored as text. Every such enum implements
/// `as_str` and [`std::str::FromStr`], failing with [`ParseEnumError`].

pub mod activity;
pub mod datetime;
pub mod invitation;
pub mod project;
pub mod review;
pub mod session;
pub mod task;
pub mod user;

/// Error returned when a stored enum value is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    /// Name of the enum being parsed
    pub kind: &'static str,

    /// The rejected input
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
