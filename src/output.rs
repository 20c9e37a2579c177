use log::debug;
use std::io::{self, Write};

use crate::status::Status;

/// Writes status lines as newline-delimited JSON.
pub struct Emitter<W: Write> {
    out: W,
    last: Option<Status>,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    /// Write `status` unless it matches the previous line.
    ///
    /// Returns whether a line was written. Each line is flushed so readers on
    /// a pipe see it immediately.
    pub fn emit(&mut self, status: &Status) -> io::Result<bool> {
        if self.last.as_ref() == Some(status) {
            debug!("Status unchanged, skipping");
            return Ok(false);
        }

        serde_json::to_writer(&mut self.out, status)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;

        self.last = Some(status.clone());
        Ok(true)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
