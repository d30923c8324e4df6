//! `EventsCsvWriter`: an `EventHandler` that streams events to CSV.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use dt_events::{Event, EventHandler, EventsError, EventsResult};

use crate::{OutputError, OutputResult};

const HEADER: [&str; 5] = ["time", "type", "agent", "node", "detail"];

/// Writes one row per event: `time,type,agent,node,detail`.
///
/// Errors are stored internally because [`EventHandler::handle`] has no
/// return value.  The first one is reported by [`finish`](EventHandler::finish)
/// or [`take_error`](Self::take_error).
pub struct EventsCsvWriter {
    writer:     Writer<File>,
    written:    u64,
    finished:   bool,
    last_error: Option<OutputError>,
}

impl EventsCsvWriter {
    /// Create `path` and write the header row.
    pub fn create(path: &Path) -> OutputResult<Self> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(HEADER)?;
        Ok(Self { writer, written: 0, finished: false, last_error: None })
    }

    /// Rows written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write(&mut self, event: &Event) -> OutputResult<()> {
        let node = event.node();
        self.writer.write_record(&[
            event.time().seconds().to_string(),
            event.kind().to_owned(),
            event.agent().0.to_string(),
            if node.is_valid() { node.0.to_string() } else { String::new() },
            event.detail().to_owned(),
        ])?;
        self.written += 1;
        Ok(())
    }
}

impl EventHandler for EventsCsvWriter {
    fn handle(&mut self, event: &Event) {
        if self.finished {
            return;
        }
        let result = self.write(event);
        self.store_err(result);
    }

    fn finish(&mut self) -> EventsResult<()> {
        if !self.finished {
            self.finished = true;
            let result = self.writer.flush().map_err(OutputError::from);
            self.store_err(result);
        }
        match self.take_error() {
            Some(e) => Err(EventsError::Handler { handler: "events_csv".into(), message: e.to_string() }),
            None => Ok(()),
        }
    }
}
