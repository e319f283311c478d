//! Tracing initialization logic.

use crate::{config::Config, util};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber: fmt layer on stderr filtered by `cfg.log_filter`.
pub fn init_tracing(cfg: &Config) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(cfg.verbose)
        .with_ansi(cfg.color)
        .with_level(true);

    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|e| {
        eprintln!("Warning: Invalid log filter '{}': {e}", cfg.log_filter);
        EnvFilter::new("iteration_timer=info")
    });

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        // Use option_env! for git sha to avoid build errors outside git repo
        git_sha = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        build_ts = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        "iteration-timer starting"
    );

    info!(
        style = ?cfg.style,
        max_iterations = ?cfg.max_iterations,
        pass_interval = %util::format_duration(cfg.pass_interval),
        samples_per_pass = cfg.samples_per_pass,
        channel_capacity = cfg.channel_capacity,
        stats_json = cfg.stats_json,
        verbose = cfg.verbose,
        log_filter = %cfg.log_filter,
        "Configuration loaded"
    );
}
