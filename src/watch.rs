//! The main loop: pull state changes from a source, print complete statuses.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{ErrorKind, Write};

use crate::output::Emitter;
use crate::state::RiverState;
use crate::status::{Status, TagCount};

/// Something that yields river state every time it changes.
#[cfg_attr(test, mockall::automock)]
pub trait StatusSource {
    /// Block until the state changed, then return a copy of it.
    fn next_change(&mut self) -> Result<RiverState>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Keep printing after the first status line.
    pub watch: bool,
    pub tags: TagCount,
}

#[tracing::instrument(skip(source, emitter))]
pub fn run<S: StatusSource, W: Write>(
    source: &mut S,
    emitter: &mut Emitter<W>,
    options: Options,
) -> Result<()> {
    loop {
        let state = source.next_change()?;

        let status = match Status::from_state(&state, options.tags) {
            Ok(status) => status,
            Err(e) => {
                debug!("Waiting for more status events: {}", e);
                continue;
            }
        };

        match emitter.emit(&status) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                info!("Output closed, stopping");
                return Ok(());
            }
            Err(e) => return Err(e).context("failed to write status"),
        }

        if !options.watch {
            return Ok(());
        }
    }
}
