//! What river has told us so far.
//!
//! `RiverState` holds plain data only. The Wayland plumbing in
//! [`crate::river`] translates protocol events into [`OutputUpdate`] and
//! [`SeatUpdate`] values and applies them here, which keeps this module
//! testable without a compositor.

/// An event from the tracked output's `zriver_output_status_v1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputUpdate {
    FocusedTags(u32),
    UrgentTags(u32),
    LayoutName(String),
    LayoutNameClear,
}

/// An event from the tracked seat's `zriver_seat_status_v1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatUpdate {
    FocusedView(String),
    Mode(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RiverState {
    pub title: Option<String>,
    pub mode: Option<String>,
    pub layout: Option<String>,
    pub focused: Option<u32>,
    pub urgent: Option<u32>,

    changed: bool,
}

impl RiverState {
    pub fn apply_output(&mut self, update: OutputUpdate) {
        match update {
            OutputUpdate::FocusedTags(tags) => self.focused = Some(tags),
            OutputUpdate::UrgentTags(tags) => self.urgent = Some(tags),
            OutputUpdate::LayoutName(name) => self.layout = Some(name),
            OutputUpdate::LayoutNameClear => self.layout = None,
        }
        self.changed = true;
    }

    pub fn apply_seat(&mut self, update: SeatUpdate) {
        match update {
            SeatUpdate::FocusedView(title) => self.title = Some(title),
            SeatUpdate::Mode(name) => self.mode = Some(name),
        }
        self.changed = true;
    }

    /// Forget everything learned from the tracked output, e.g. after it was
    /// unplugged. The next output's status refills these fields.
    pub fn clear_output(&mut self) {
        self.focused = None;
        self.urgent = None;
        self.layout = None;
        self.changed = true;
    }

    /// Whether anything was applied since the last [`take_changed`](Self::take_changed).
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Force the next check to report a change, e.g. right after connecting.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Returns the change flag and resets it.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}
