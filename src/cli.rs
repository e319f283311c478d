use crate::timefmt::TimerStyle;
use clap::Parser;
use std::time::Duration;

/// Displays the progress of a long-running iterative computation: an iteration
/// counter plus the time elapsed since the computation started.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// How the elapsed time is rendered: `human` ("1h 0min 5s") or `seconds` ("3605 seconds").
    #[arg(short, long, value_enum, default_value_t = TimerStyle::Human)]
    pub style: TimerStyle,

    /// Stop after N passes of the computation (0 = run until interrupted).
    #[arg(short = 'n', long, default_value = "0", value_name = "N")]
    pub iterations: u64,

    /// Pause between passes (e.g., "250ms", "1s").
    #[arg(short, long, default_value = "250ms", value_parser = humantime::parse_duration)]
    pub interval: Duration,

    /// Random samples drawn per pass.
    #[arg(long, default_value = "10000", value_name = "N")]
    pub samples: u64,

    /// Capacity of the progress channel. Updates beyond it are dropped until the display catches up.
    #[arg(long, default_value = "16", value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub channel_capacity: u64,

    /// Format MS milliseconds with the selected style, print it to stdout and exit.
    #[arg(long, value_name = "MS")]
    pub format: Option<u64>,

    /// Print the final summary to stderr as JSON.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub stats_json: bool,

    /// Disable colored terminal output.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_color: bool,

    /// Include module targets in log lines.
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,

    /// Log filter directives (overrides RUST_LOG).
    #[arg(long, env = "RUST_LOG", default_value = "iteration_timer=info")]
    pub log_filter: String,
}

/// Parses command line arguments using clap.
pub fn parse_args() -> Args {
    Args::parse()
}
