// This module defines the monitor thread: the single consumer of progress
// messages. For every message it writes the iteration count and the elapsed
// time since `start` to the display sink.

use crate::display::DisplaySink;
use crate::event::{DisplayTarget, ProgressMessage};
use crate::timefmt::{self, TimerStyle};
use colored::*;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};


/// How often the run loop re-checks the running flag when idle.
const CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Totals accumulated by the monitor over its lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    pub messages_handled: u64,
    pub last_iteration: Option<u64>,
    pub last_elapsed_ms: u64,
}

impl MonitorStats {
    /// Human-readable summary.
    pub fn print_summary(&self, style: TimerStyle, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "{}", "--- iteration-timer summary ---".bold().blue().underline())?;
        writeln!(
            w,
            "{} {}",
            "Updates handled:".bold().bright_cyan(),
            self.messages_handled
        )?;
        let last = self
            .last_iteration
            .map_or_else(|| "none".to_string(), |n| n.to_string());
        writeln!(w, "{} {}", "Last iteration:".bold().bright_yellow(), last)?;
        writeln!(
            w,
            "{} {}",
            "Elapsed at last update:".bold().bright_green(),
            style.render(self.last_elapsed_ms)
        )
    }

    /// JSON summary, stamped with the local wallclock time.
    pub fn print_json(&self, style: TimerStyle, w: &mut impl Write) -> io::Result<()> {
        #[derive(Serialize)]
        struct Report<'a> {
            wallclock: String,
            style: TimerStyle,
            elapsed: String,
            #[serde(flatten)]
            stats: &'a MonitorStats,
        }

        let report = Report {
            wallclock: chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            style,
            elapsed: style.render(self.last_elapsed_ms),
            stats: self,
        };
        serde_json::to_writer_pretty(&mut *w, &report).map_err(io::Error::other)?;
        writeln!(w)
    }
}

/// Owns the receiving end of the progress channel and the display sink.
pub struct ProgressMonitor<S: DisplaySink> {
    receiver: Receiver<ProgressMessage>,
    running: Arc<AtomicBool>,
    start: Instant,
    style: TimerStyle,
    sink: S,
    stats: MonitorStats,
}

impl<S: DisplaySink> ProgressMonitor<S> {
    /// `start` is the instant elapsed time is measured from. It is never changed.
    pub fn new(
        receiver: Receiver<ProgressMessage>,
        running: Arc<AtomicBool>,
        start: Instant,
        style: TimerStyle,
        sink: S,
    ) -> Self {
        ProgressMonitor {
            receiver,
            running,
            start,
            style,
            sink,
            stats: MonitorStats::default(),
        }
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handles one message as if it arrived at `now`.
    pub fn handle_at(&mut self, msg: ProgressMessage, now: Instant) -> io::Result<()> {
        match msg {
            ProgressMessage::Iteration(n) => {
                let elapsed_ms = timefmt::duration_millis(now.saturating_duration_since(self.start));
                let timer = self.style.render(elapsed_ms);
                trace!(iteration = n, elapsed_ms, timer = %timer, "Progress update");

                self.sink
                    .set_text(DisplayTarget::IterationCount, &n.to_string())?;
                self.sink.set_text(DisplayTarget::Timer, &timer)?;
                self.sink.flush()?;

                self.stats.messages_handled += 1;
                self.stats.last_iteration = Some(n);
                self.stats.last_elapsed_ms = elapsed_ms;
            }
        }
        Ok(())
    }

    /// Handles one message at the current instant.
    pub fn handle(&mut self, msg: ProgressMessage) -> io::Result<()> {
        self.handle_at(msg, Instant::now())
    }

    /// Receives and handles messages until the running flag is cleared or
    /// every sender is dropped. Queued messages are drained in both cases.
    ///
    /// Returns the final statistics, or the first display error.
    pub fn run(&mut self) -> io::Result<MonitorStats> {
        loop {
            if !self.running.load(Ordering::SeqCst) {
                debug!("Monitor received shutdown signal, draining channel");
                self.drain()?;
                break;
            }

            match self.receiver.recv_timeout(CHECK_INTERVAL) {
                Ok(msg) => self.handle(msg)?,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Progress channel disconnected, draining channel");
                    self.drain()?;
                    break;
                }
            }
        }

        debug!(handled = self.stats.messages_handled, "Monitor run loop exited");
        Ok(self.stats.clone())
    }

    fn drain(&mut self) -> io::Result<()> {
        while let Ok(msg) = self.receiver.try_recv() {
            if let Err(e) = self.handle(msg) {
                warn!(error = %e, "Display update failed while draining");
                return Err(e);
            }
        }
        Ok(())
    }
}
