// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Process-wide settings: logging and the shared callback threadpool.
    pub client: ClientConfig,
    /// Per-drive connection parameters.
    pub session: SessionConfig,
}

/// Process-wide runtime settings, independent of any one drive connection.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ClientConfig {
    #[serde(default, rename = "LogFile")]
    /// Path to the log file; stdout when omitted.
    pub log_file: Option<String>,

    #[serde(default = "default_log_level", rename = "LogLevel")]
    /// `tracing_subscriber::EnvFilter` directive, e.g. "info" or "kinetic_client_rs=debug".
    pub log_level: String,

    #[serde(default, rename = "LogJson")]
    /// Emit structured JSON log lines instead of the human-readable format.
    pub log_json: bool,

    #[serde(default = "default_threadpool_threads", rename = "MaxThreadpoolThreads")]
    /// Worker count for the shared callback bus (reader callbacks, user closures).
    pub max_threadpool_threads: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_threadpool_threads() -> usize {
    8
}

/// Parameters for one `Session::connect` call.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SessionConfig {
    #[serde(rename = "Host")]
    pub host: String,

    #[serde(default = "default_port", rename = "Port")]
    pub port: u16,

    #[serde(rename = "ClusterVersion")]
    pub cluster_version: i64,

    #[serde(rename = "Identity")]
    pub identity: i64,

    #[serde(rename = "HmacKey")]
    /// Shared secret backing this identity, as configured in the drive's ACL.
    pub hmac_key: String,

    #[serde(default, rename = "UseTls")]
    pub use_tls: bool,

    #[serde(default = "default_connect_timeout", with = "serde_millis", rename = "ConnectTimeoutMs")]
    pub connect_timeout: Duration,

    #[serde(default = "default_response_timeout", with = "serde_millis", rename = "ResponseTimeoutMs")]
    pub response_timeout: Duration,
}

fn default_port() -> u16 {
    8123
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_response_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: Config = serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(!self.session.host.is_empty(), "Host must not be empty");
        ensure!(self.session.port != 0, "Port must not be zero");
        ensure!(
            !self.session.hmac_key.is_empty(),
            "HmacKey must not be empty"
        );
        if self.client.max_threadpool_threads == 0 {
            self.client.max_threadpool_threads = default_threadpool_threads();
        }
        Ok(())
    }
}

/// Serde helper for representing `Duration` as a number of milliseconds.
mod serde_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_host() {
        let mut cfg = Config {
            client: ClientConfig {
                log_file: None,
                log_level: default_log_level(),
                log_json: false,
                max_threadpool_threads: 8,
            },
            session: SessionConfig {
                host: String::new(),
                port: default_port(),
                cluster_version: 0,
                identity: 1,
                hmac_key: "asdfasdf".to_string(),
                use_tls: false,
                connect_timeout: default_connect_timeout(),
                response_timeout: default_response_timeout(),
            },
        };
        assert!(cfg.validate_and_normalize().is_err());
    }

    #[test]
    fn parses_minimal_yaml() {
        let yaml = r#"
client:
  LogLevel: debug
session:
  Host: 127.0.0.1
  ClusterVersion: 0
  Identity: 1
  HmacKey: asdfasdf
"#;
        let mut cfg: Config = serde_yaml::from_str(yaml).expect("parses");
        cfg.validate_and_normalize().expect("valid");
        assert_eq!(cfg.session.port, default_port());
        assert_eq!(cfg.client.max_threadpool_threads, 8);
    }
}
