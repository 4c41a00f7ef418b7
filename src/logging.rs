//! Process-wide logger set up from [`Settings`].
//!
//! Library code only uses the `log` macros; binaries call [`init`] once.

use chrono::{Local, Utc};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;

use crate::config::Settings;
use crate::github::error::{GitHubError, GitHubResult};

/// Install the global logger.
///
/// `RUST_LOG` selects levels (default `info`). `DisableLogging` turns output
/// off entirely, and a non-empty `LogPath` appends to that file instead of
/// writing to stderr.
///
/// # Errors
///
/// `Io` when the log file cannot be opened, `Config` when a logger is
/// already installed.
pub fn init(settings: &Settings) -> GitHubResult<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    if settings.disable_logging {
        builder.filter_level(LevelFilter::Off);
    }

    if !settings.log_path.trim().is_empty() {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(settings.log_path.trim())?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    let utc = settings.log_time_as_utc;
    let pid = settings.log_process_id;
    builder.format(move |buf, record| {
        writeln!(
            buf,
            "{} {:<5} {}: {}",
            line_prefix(utc, pid),
            record.level(),
            record.target(),
            record.args()
        )
    });

    builder
        .try_init()
        .map_err(|e| GitHubError::Config(format!("logger already initialized: {e}")))
}

/// Timestamp, plus `[pid]` when requested.
fn line_prefix(utc: bool, pid: bool) -> String {
    let stamp = if utc {
        Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ").to_string()
    } else {
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f%:z").to_string()
    };
    if pid {
        format!("{stamp} [{}]", std::process::id())
    } else {
        stamp
    }
}
