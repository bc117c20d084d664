//! Tracing subscriber for the server binary.
//!
//! `RUST_LOG` filters (default `info`), `LOG_FORMAT=json` switches to one JSON object per
//! line, and `LOG_DIR` adds a daily rolling file next to stdout.

use std::{env, sync::OnceLock};

use tracing::Level;
use tracing_appender::{
    non_blocking,
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        fmt,
        time::ChronoLocal,
        writer::{BoxMakeWriter, MakeWriterExt},
    },
};

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "lolprofile.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let writer = match env::var("LOG_DIR").ok().and_then(file_writer) {
        // Debug lines only go to the file.
        Some(file) => BoxMakeWriter::new(std::io::stdout.with_max_level(Level::INFO).and(file)),
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(false)
        .with_writer(writer);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::debug!(json, "logger initialized");
}

fn file_writer(dir: String) -> Option<NonBlocking> {
    let mut appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX);

    if let Some(n) = env::var("LOG_MAX_FILES").ok().and_then(|v| v.parse().ok()) {
        appender = appender.max_log_files(n);
    }

    let appender = match appender.build(&dir) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("cannot log to {dir}, falling back to stdout only: {e}");
            return None;
        }
    };

    let (writer, guard) = non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(writer)
}
