// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Context, Result};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, registry::Registry, util::SubscriberInitExt};

use crate::cfg::config::ClientConfig;

/// Installs the global `tracing` subscriber for the process. Returns a
/// `WorkerGuard` that must be held for the process lifetime — dropping it
/// flushes and stops the non-blocking writer.
pub fn init_logger(cfg: &ClientConfig) -> Result<WorkerGuard> {
    let env_filter = EnvFilter::try_new(&cfg.log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .context("failed to parse log level from config or env")?;

    let (writer, guard) = match &cfg.log_file {
        Some(path) => {
            let dir = std::path::Path::new(path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = std::path::Path::new(path)
                .file_name()
                .context("LogFile must name a file")?;
            let appender = rolling::never(dir, file_name);
            tracing_appender::non_blocking(appender)
        }
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    let fmt_layer = fmt::layer().with_writer(writer).with_ansi(cfg.log_file.is_none());

    if cfg.log_json {
        Registry::default()
            .with(env_filter)
            .with(fmt_layer.json())
            .try_init()
            .context("failed to set global default subscriber")?;
    } else {
        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("failed to set global default subscriber")?;
    }

    Ok(guard)
}
