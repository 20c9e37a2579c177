use thiserror::Error;

use crate::status::TagCount;

/// Reasons a [`Status`](crate::status::Status) cannot be built yet.
///
/// These are transient: river sends the missing pieces eventually, so the
/// run loop waits instead of failing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("missing title in state")]
    MissingTitle,

    #[error("missing mode in state")]
    MissingMode,

    #[error("missing urgent tags list")]
    MissingUrgent,

    #[error("missing focused tags list")]
    MissingFocused,
}

/// Problems with the compositor that make watching impossible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("compositor does not advertise zriver_status_manager_v1 (is river running?)")]
    UnsupportedCompositor,

    #[error("compositor did not advertise any wl_seat")]
    NoSeat,
}

/// A tag count outside what a river tag mask can hold.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("tag count must be between {min} and {max}, got {0}", min = TagCount::MIN, max = TagCount::MAX)]
pub struct TagCountError(pub u8);
