//! Log setup for the scraper and publisher.
//!
//! On a terminal, log lines go through the same `MultiProgress` as the region
//! spinners. Otherwise (cron, CI) they are plain uncolored lines on stderr.

use indicatif::MultiProgress;

/// How much the run reports when `RUST_LOG` is unset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Warnings and errors only
    Quiet,
    Normal,
    /// Our own debug output; the HTTP stack stays at info
    Debug,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (_, true) => Self::Debug,
            (true, false) => Self::Quiet,
            (false, false) => Self::Normal,
        }
    }

    /// env_logger filter string for this level
    fn filter(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Debug => "debug,hyper=info,hyper_util=info,reqwest=info,native_tls=info",
        }
    }
}

fn level_label(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

fn level_color(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "\x1b[31m",
        log::Level::Warn => "\x1b[33m",
        log::Level::Info => "\x1b[32m",
        log::Level::Debug => "\x1b[36m",
        log::Level::Trace => "\x1b[35m",
    }
}

/// `[LEVEL] message`, with the label colored on a terminal
fn format_line(level: log::Level, args: &std::fmt::Arguments<'_>, color: bool) -> String {
    let label = level_label(level);
    if color {
        format!("[{}{label}\x1b[0m] {args}", level_color(level))
    } else {
        format!("[{label}] {args}")
    }
}

/// Prints each record above the region spinners instead of through them.
struct IndicatifLogger {
    filter: env_logger::Logger,
    multi: MultiProgress,
}

impl log::Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.filter.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), record.args(), true);
        self.multi.suspend(|| eprintln!("{line}"));
    }

    fn flush(&self) {}
}

/// Install the global logger. `RUST_LOG` overrides `verbosity`.
///
/// Pass `multi` when stderr is a terminal. A second call is a no-op.
pub fn init_logging(verbosity: Verbosity, multi: Option<&MultiProgress>) {
    use std::io::Write;

    let env = env_logger::Env::default().default_filter_or(verbosity.filter());

    match multi {
        Some(multi) => {
            let filter = env_logger::Builder::from_env(env).build();
            let max_level = filter.filter();
            let logger = IndicatifLogger {
                filter,
                multi: multi.clone(),
            };
            if log::set_boxed_logger(Box::new(logger)).is_ok() {
                log::set_max_level(max_level);
            }
        }
        None => {
            let _ = env_logger::Builder::from_env(env)
                .format(|buf, record| {
                    writeln!(buf, "{}", format_line(record.level(), record.args(), false))
                })
                .try_init();
        }
    }
}
