use crate::timefmt::TimerStyle;
use crate::worker::WorkerConfig;
use std::time::Duration;

/// Runtime configuration derived from the command line.
#[derive(Clone, Debug)]
pub struct Config {
    pub style:            TimerStyle,
    pub max_iterations:   Option<u64>,
    pub pass_interval:    Duration,
    pub samples_per_pass: u64,
    pub channel_capacity: usize,
    pub stats_json:       bool,
    pub color:            bool,
    pub verbose:          bool,
    pub log_filter:       String,
}

impl Config {
    pub fn worker(&self) -> WorkerConfig {
        WorkerConfig {
            max_iterations:   self.max_iterations,
            pass_interval:    self.pass_interval,
            samples_per_pass: self.samples_per_pass,
        }
    }
}

impl From<&crate::cli::Args> for Config {
    fn from(a: &crate::cli::Args) -> Self {
        Self {
            style:            a.style,
            max_iterations:   (a.iterations > 0).then_some(a.iterations),
            pass_interval:    a.interval,
            samples_per_pass: a.samples,
            channel_capacity: usize::try_from(a.channel_capacity).unwrap_or(usize::MAX),
            stats_json:       a.stats_json,
            color:            !a.no_color,
            verbose:          a.verbose,
            log_filter:       a.log_filter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["iteration-timer", "--log-filter", "warn"]).unwrap();
        let cfg = Config::from(&args);
        assert_eq!(cfg.style, TimerStyle::Human);
        assert_eq!(cfg.max_iterations, None);
        assert_eq!(cfg.pass_interval, Duration::from_millis(250));
        assert_eq!(cfg.samples_per_pass, 10_000);
        assert_eq!(cfg.channel_capacity, 16);
        assert!(cfg.color);
        assert_eq!(cfg.log_filter, "warn");
    }

    #[test]
    fn explicit_values() {
        let args = Args::try_parse_from([
            "iteration-timer",
            "--style",
            "seconds",
            "-n",
            "3",
            "--interval",
            "1s 500ms",
            "--no-color",
        ])
        .unwrap();
        let cfg = Config::from(&args);
        assert_eq!(cfg.style, TimerStyle::Seconds);
        assert_eq!(cfg.max_iterations, Some(3));
        assert_eq!(cfg.worker().pass_interval, Duration::from_millis(1_500));
        assert!(!cfg.color);
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(Args::try_parse_from(["iteration-timer", "--channel-capacity", "0"]).is_err());
    }
}
