//! flow - print river compositor status as JSON lines.
//!
//! The crate is split so the Wayland plumbing ([`river`]) is the only part
//! that needs a running compositor; everything it produces flows through the
//! plain data types in [`state`] and [`status`] and the loop in [`watch`].

pub mod error;
pub mod output;
pub mod protocol;
pub mod river;
pub mod state;
pub mod status;
pub mod watch;

#[cfg(test)]
pub mod test_compositor;

pub use error::{ClientError, StatusError, TagCountError};
pub use output::Emitter;
pub use river::RiverSource;
pub use state::{OutputUpdate, RiverState, SeatUpdate};
pub use status::{Status, TagCount};
pub use watch::{run, Options, StatusSource};
