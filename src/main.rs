// Main application entry point.
// Parses the command line, starts the worker and monitor threads, handles
// shutdown signals and prints the final summary.

use crossbeam_channel::bounded;
use signal_hook::consts::signal::*;
use signal_hook::iterator::Signals;
use std::io::{self, Write};
use std::process::exit;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{error, info, warn};

use iteration_timer::cli;
use iteration_timer::config::Config;
use iteration_timer::display::TerminalDisplay;
use iteration_timer::monitor::ProgressMonitor;
use iteration_timer::telemetry;
use iteration_timer::worker::Worker;

fn main() -> io::Result<()> {
    let args = cli::parse_args();
    let cfg = Config::from(&args);

    // --- Format-only Mode ---
    if let Some(ms) = args.format {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", cfg.style.render(ms))?;
        return Ok(());
    }

    if !cfg.color {
        colored::control::set_override(false);
    }
    telemetry::init_tracing(&cfg);

    let running = Arc::new(AtomicBool::new(true));

    // First signal asks both threads to wind down; a second one exits at once.
    let mut signals = Signals::new([SIGTERM, SIGINT, SIGQUIT])?;
    let running_signal = Arc::clone(&running);
    thread::spawn(move || {
        for sig in signals.forever() {
            if running_signal.swap(false, Ordering::SeqCst) {
                info!(signal = sig, "Received signal, shutting down");
            } else {
                warn!(signal = sig, "Received second signal, exiting immediately");
                exit(128 + sig);
            }
        }
    });

    let (sender, receiver) = bounded(cfg.channel_capacity);
    let start = Instant::now();

    let worker = Worker::spawn(cfg.worker(), sender, Arc::clone(&running))?;

    let monitor_running = Arc::clone(&running);
    let style = cfg.style;
    let color = cfg.color;
    let monitor = thread::Builder::new()
        .name("monitor".into())
        .spawn(move || {
            let display = TerminalDisplay::new(io::stdout(), color);
            ProgressMonitor::new(receiver, monitor_running, start, style, display).run()
        })?;

    let mut failed = false;

    match worker.join() {
        Ok(report) => info!(
            iterations = report.iterations,
            dropped_updates = report.dropped_updates,
            estimate = report.estimate,
            "Worker joined"
        ),
        Err(_) => {
            error!("Worker thread panicked");
            running.store(false, Ordering::SeqCst);
            failed = true;
        }
    }

    let stats = match monitor.join() {
        Ok(Ok(stats)) => Some(stats),
        Ok(Err(e)) => {
            error!(error = %e, "Display update failed");
            failed = true;
            None
        }
        Err(_) => {
            error!("Monitor thread panicked");
            failed = true;
            None
        }
    };

    if let Some(stats) = stats {
        let mut stderr = io::stderr().lock();
        if cfg.stats_json {
            stats.print_json(cfg.style, &mut stderr)?;
        } else {
            stats.print_summary(cfg.style, &mut stderr)?;
        }
    }

    if failed {
        exit(1);
    }
    Ok(())
}
