//! Live rendering of a test run's result stream
//!
//! The driver pulls one batch at a time, renders it as a table row and checks
//! the cancellation token between pulls. A cancelled stream sends exactly one
//! abort request to the platform before returning.

use crate::api::models::SampleBatch;
use crate::core::metrics::Metric;
use crate::error::Result;
use crate::ui::columns::ColumnFormatter;
use crate::ui::formatters::{format_timestamp, format_value};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Rows between two repetitions of the header
pub const HEADER_INTERVAL: usize = 20;

pub const TIMESTAMP_HEADER: &str = "TIMESTAMP:";

/// Cell shown for a requested metric missing from a batch
pub const MISSING_VALUE: &str = "-";

pub const ABORT_MESSAGE: &str = "Aborting test run!";

/// Shared flag set by the interrupt handler and polled by the driver
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Cancel this token on Ctrl+C. Can only be installed once per process.
    pub fn install_ctrlc_handler(&self) -> anyhow::Result<()> {
        let token = self.clone();
        ctrlc::set_handler(move || token.cancel())
            .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Streaming,
    Finished,
    Aborted,
    Failed,
}

pub struct StreamDriver<W: Write> {
    metrics: Vec<Metric>,
    keys: Vec<String>,
    formatter: ColumnFormatter,
    out: W,
    cancel: CancelToken,
    state: StreamState,
    rows: usize,
}

impl<W: Write> StreamDriver<W> {
    /// `metrics` fixes the column order; `formatter` must have one width for
    /// the timestamp plus one per metric
    pub fn new(metrics: Vec<Metric>, formatter: ColumnFormatter, out: W, cancel: CancelToken) -> Self {
        let keys = metrics.iter().map(|m| m.to_wire_form(true)).collect();
        Self {
            metrics,
            keys,
            formatter,
            out,
            cancel,
            state: StreamState::Idle,
            rows: 0,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn header(&self) -> String {
        let mut cells = vec![TIMESTAMP_HEADER.to_string()];
        cells.extend(self.metrics.iter().map(|m| m.to_display_form(true)));
        self.formatter.format(&cells)
    }

    /// Render a batch, or `None` for an empty batch
    pub fn render_row(&self, batch: &SampleBatch) -> Option<String> {
        let first = batch.values().next()?;

        let mut cells = vec![format_timestamp(&first.timestamp)];
        cells.extend(self.keys.iter().map(|key| {
            batch
                .get(key)
                .map(|sample| format_value(sample.value))
                .unwrap_or_else(|| MISSING_VALUE.to_string())
        }));

        Some(self.formatter.format(&cells))
    }

    /// Drive the stream until it ends, fails or the token is cancelled.
    ///
    /// `abort` is called at most once, only on cancellation. A rejected abort
    /// is logged; only a connection failure makes it an error.
    pub fn run<I, F>(&mut self, mut stream: I, abort: F) -> Result<StreamState>
    where
        I: Iterator<Item = Result<SampleBatch>>,
        F: FnOnce() -> Result<()>,
    {
        self.state = StreamState::Streaming;

        loop {
            if self.cancel.is_cancelled() {
                return self.abort(abort);
            }

            let batch = match stream.next() {
                Some(Ok(batch)) => batch,
                Some(Err(err)) => {
                    self.state = StreamState::Failed;
                    return Err(err);
                }
                None => break,
            };

            if let Err(err) = self.emit(&batch) {
                self.state = StreamState::Failed;
                return Err(err);
            }
        }

        self.state = StreamState::Finished;
        Ok(self.state)
    }

    fn emit(&mut self, batch: &SampleBatch) -> Result<()> {
        let Some(row) = self.render_row(batch) else {
            return Ok(());
        };

        if self.rows % HEADER_INTERVAL == 0 {
            let header = self.header();
            writeln!(self.out, "{}", header)?;
        }
        writeln!(self.out, "{}", row)?;
        self.out.flush()?;
        self.rows += 1;
        Ok(())
    }

    fn abort<F>(&mut self, abort: F) -> Result<StreamState>
    where
        F: FnOnce() -> Result<()>,
    {
        writeln!(self.out, "{}", ABORT_MESSAGE)?;
        self.out.flush()?;
        log::info!("Interrupted after {} rows, aborting test run", self.rows);

        self.state = StreamState::Aborted;
        match abort() {
            Err(err) if err.is_connection() => return Err(err),
            // e.g. the run finished between two pulls
            Err(err) => log::warn!("Abort request was rejected: {}", err),
            Ok(()) => {}
        }
        Ok(self.state)
    }
}
