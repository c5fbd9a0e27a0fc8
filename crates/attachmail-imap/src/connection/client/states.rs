//! Type-state markers for IMAP client connection states.

/// Marker type for the not-authenticated state.
///
/// Only LOGIN and LOGOUT are valid here.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotAuthenticated;

/// Marker type for the authenticated state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

/// Marker type for the selected state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selected;

/// States in which the client holds a logged-in session.
///
/// Mailbox commands (SELECT, APPEND) are valid in every such state.
pub trait LoggedIn: sealed::Sealed {}

impl LoggedIn for Authenticated {}
impl LoggedIn for Selected {}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Authenticated {}
    impl Sealed for super::Selected {}
}

/// Mailbox information returned by SELECT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MailboxStatus {
    /// Number of messages in the mailbox.
    pub exists: u32,
    /// Whether the server opened the mailbox read-only.
    pub read_only: bool,
}
