// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use kinetic_client_rs::{
    cfg::{cli::resolve_config_path, config::Config},
    client::Client,
    commands::{get, noop, put},
    entry::Entry,
    session::Session,
};
use tokio::time::timeout;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = resolve_config_path("kinetic.yaml")
        .and_then(Config::load_from_file)
        .context("failed to resolve or load config")?;

    let client = Client::init(&cfg.client).context("failed to start client")?;

    let session = timeout(
        cfg.session.connect_timeout + Duration::from_secs(1),
        Session::connect(cfg.session.clone(), client.bus()),
    )
    .await
    .context("connect timed out")?
    .context("connect failed")?;

    info!(connection_id = session.connection_id(), "session established");

    noop::noop(&session).await.context("noop failed")?;

    let mut entry = Entry {
        key: Bytes::from_static(b"demo-key"),
        tag: Bytes::from_static(b"demo-tag"),
        value: Bytes::from_static(b"demo-value"),
        ..Default::default()
    };
    put::put(&session, &mut entry).await.context("put failed")?;
    info!("put demo-key");

    get::get(&session, &mut entry, get::Direction::Exact)
        .await
        .context("get failed")?;
    info!(value = ?entry.value, "fetched demo-key");

    session.disconnect().await;
    client.shutdown().await;
    Ok(())
}
