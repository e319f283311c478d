use std::fmt;

/// A message sent from the worker thread to the monitor thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMessage {
    /// Number of passes the computation has completed so far.
    Iteration(u64),
}

/// The two text targets a progress update writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayTarget {
    IterationCount,
    Timer,
}

impl DisplayTarget {
    /// Element identifier of the target.
    #[inline]
    pub fn id(self) -> &'static str {
        match self {
            DisplayTarget::IterationCount => "iterationCount",
            DisplayTarget::Timer => "timer",
        }
    }
}

impl fmt::Display for DisplayTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
