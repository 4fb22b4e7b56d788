//! Diagnostics on stderr; stdout carries reports and check lines only.
use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

/// What the `-v`/`-q`/`--color` flags ask of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    level: LevelFilter,
    ansi: bool,
}

impl LogSettings {
    /// `-q` wins over any number of `-v`.
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        let level = match (quiet, verbose) {
            (true, _) => LevelFilter::ERROR,
            (false, 0) => LevelFilter::WARN,
            (false, 1) => LevelFilter::INFO,
            (false, 2) => LevelFilter::DEBUG,
            (false, _) => LevelFilter::TRACE,
        };
        Self { level, ansi: std::io::stderr().is_terminal() }
    }

    /// `None` keeps the terminal check.
    pub fn with_ansi(mut self, ansi: Option<bool>) -> Self {
        if let Some(ansi) = ansi {
            self.ansi = ansi;
        }
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Default directives when `RUST_LOG` is unset. Below trace, other crates
    /// (jaq, glob) stay at `warn` so `-vv` shows per-check outcomes only.
    fn directives(&self) -> String {
        if self.level == LevelFilter::TRACE {
            "trace".to_owned()
        } else {
            format!("warn,realtype={}", self.level)
        }
    }

    /// Source locations and timestamps once per-check output is on.
    fn detailed(&self) -> bool {
        self.level >= LevelFilter::DEBUG
    }
}

/// Install the stderr subscriber. `RUST_LOG` replaces the flag-derived
/// directives; a second call leaves the first subscriber in place.
pub fn init(settings: LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.directives()));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(settings.ansi)
        .with_target(settings.level == LevelFilter::TRACE)
        .with_file(settings.detailed())
        .with_line_number(settings.detailed())
        .compact();

    let installed = if settings.detailed() {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}
