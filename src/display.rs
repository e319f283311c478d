// Display sinks: where the monitor puts the iteration count and the timer text.
// The monitor never formats output lines itself, it only sets target texts
// and asks the sink to flush once both are current.

use crate::event::DisplayTarget;
use colored::*;
use std::collections::HashMap;
use std::io::{self, Write};

/// A pair of writable text targets addressed by [`DisplayTarget`].
pub trait DisplaySink {
    /// Replaces the text of `target`.
    fn set_text(&mut self, target: DisplayTarget, text: &str) -> io::Result<()>;

    /// Called once per progress update after all targets were set.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn set_text(&mut self, target: DisplayTarget, text: &str) -> io::Result<()> {
        (**self).set_text(target, text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Renders one line per update: `iterationCount: 42 | timer: 1min 3s`.
pub struct TerminalDisplay<W: Write> {
    writer: W,
    iteration_count: String,
    timer: String,
    color: bool,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(writer: W, color: bool) -> Self {
        TerminalDisplay {
            writer,
            iteration_count: String::new(),
            timer: String::new(),
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn set_text(&mut self, target: DisplayTarget, text: &str) -> io::Result<()> {
        let slot = match target {
            DisplayTarget::IterationCount => &mut self.iteration_count,
            DisplayTarget::Timer => &mut self.timer,
        };
        slot.clear();
        slot.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        let count_id = DisplayTarget::IterationCount.id();
        let timer_id = DisplayTarget::Timer.id();
        if self.color {
            writeln!(
                self.writer,
                "{} {} {} {} {}",
                format!("{count_id}:").bright_cyan().bold(),
                self.iteration_count.bright_yellow().bold(),
                "|".dimmed(),
                format!("{timer_id}:").bright_magenta().bold(),
                self.timer.bright_green()
            )?;
        } else {
            writeln!(
                self.writer,
                "{count_id}: {} | {timer_id}: {}",
                self.iteration_count, self.timer
            )?;
        }
        self.writer.flush()
    }
}

/// Keeps target texts in memory. Each flush appends a `(count, timer)` frame.
#[derive(Debug, Default, Clone)]
pub struct MemoryDisplay {
    texts: HashMap<DisplayTarget, String>,
    frames: Vec<(String, String)>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of `target`, if it was ever set.
    pub fn text(&self, target: DisplayTarget) -> Option<&str> {
        self.texts.get(&target).map(String::as_str)
    }

    pub fn frames(&self) -> &[(String, String)] {
        &self.frames
    }
}

impl DisplaySink for MemoryDisplay {
    fn set_text(&mut self, target: DisplayTarget, text: &str) -> io::Result<()> {
        self.texts.insert(target, text.to_owned());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        let get = |t| self.texts.get(&t).cloned().unwrap_or_default();
        let frame = (get(DisplayTarget::IterationCount), get(DisplayTarget::Timer));
        self.frames.push(frame);
        Ok(())
    }
}
