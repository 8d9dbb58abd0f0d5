//! File logging for the terminal UI.
//!
//! The alternate screen owns stdout/stderr, so logs go to
//! `<log_dir>/fncs_terminal.log`. Filter priority: `FNCS_LOG`, then
//! `RUST_LOG`, then `info`.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::Config;

pub const LOG_FILE: &str = "fncs_terminal.log";

/// Installs the global subscriber. Keep the returned guard alive for the
/// whole run; dropping it flushes pending lines.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("create log dir {}", config.log_dir.display()))?;
    let appender = tracing_appender::rolling::never(&config.log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(config.log_filter.as_deref()))
        .with(fmt_layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(guard)
}

fn build_env_filter(directives: Option<&str>) -> EnvFilter {
    if let Some(directives) = directives
        && let Ok(filter) = EnvFilter::try_new(directives)
    {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new("info")
}
