use bitvec::prelude::*;
use serde::Serialize;

use crate::error::{StatusError, TagCountError};
use crate::state::RiverState;

/// Number of tags reported in each status line.
///
/// river tag masks are 32 bits wide, so the count is limited to `1..=32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagCount(u8);

impl TagCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 32;
    pub const DEFAULT: u8 = 9;

    pub fn new(count: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&count).then_some(Self(count))
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for TagCount {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u8> for TagCount {
    type Error = TagCountError;

    fn try_from(count: u8) -> Result<Self, TagCountError> {
        Self::new(count).ok_or(TagCountError(count))
    }
}

/// One complete status line.
///
/// Field order is the JSON key order consumers see.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Status {
    pub title: String,
    pub mode: String,
    pub layout: Option<String>,
    pub urgent: Vec<bool>,
    pub focused: Vec<bool>,
}

impl Status {
    /// Build a status line from the current state, or report the first
    /// missing piece.
    pub fn from_state(state: &RiverState, tags: TagCount) -> Result<Self, StatusError> {
        let title = state.title.clone().ok_or(StatusError::MissingTitle)?;
        let mode = state.mode.clone().ok_or(StatusError::MissingMode)?;
        let urgent = state.urgent.ok_or(StatusError::MissingUrgent)?;
        let focused = state.focused.ok_or(StatusError::MissingFocused)?;

        Ok(Status {
            title,
            mode,
            layout: state.layout.clone(),
            urgent: tag_flags(urgent, tags),
            focused: tag_flags(focused, tags),
        })
    }
}

/// Expand a tag mask into one flag per tag, tag 1 first.
pub fn tag_flags(mask: u32, tags: TagCount) -> Vec<bool> {
    mask.view_bits::<Lsb0>()
        .iter()
        .by_vals()
        .take(tags.get())
        .collect()
}
