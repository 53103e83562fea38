// SPDX-License-Identifier: AGPL-3.0-or-later

//! `GetLog` request/response types, supplemented from
//! `kinetic_types_internal.h`'s `KineticDeviceInfo_Type` enum (dropped by
//! the distilled spec, but present on every real drive).

use bytes::Bytes;

/// Which logs to request. Mirrors `proto::GetLogType` one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    Utilizations,
    Temperatures,
    Capacities,
    Configuration,
    Statistics,
    Messages,
    Limits,
    Device,
}

impl From<LogType> for crate::proto::GetLogType {
    fn from(t: LogType) -> Self {
        use crate::proto::GetLogType as G;
        match t {
            LogType::Utilizations => G::Utilizations,
            LogType::Temperatures => G::Temperatures,
            LogType::Capacities => G::Capacities,
            LogType::Configuration => G::Configuration,
            LogType::Statistics => G::Statistics,
            LogType::Messages => G::Messages,
            LogType::Limits => G::Limits,
            LogType::Device => G::Device,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Utilization {
    pub name: String,
    pub percent: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Temperature {
    pub name: String,
    pub current: f32,
    pub minimum: f32,
    pub maximum: f32,
    pub target: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Capacity {
    pub total_bytes: u64,
    pub portion_full: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Limits {
    pub max_key_size: u32,
    pub max_value_size: u32,
    pub max_version_size: u32,
    pub max_tag_size: u32,
    pub max_connections: u32,
    pub max_outstanding_read_requests: u32,
    pub max_outstanding_write_requests: u32,
    pub max_message_size: u32,
    pub max_key_range_count: u32,
    pub max_identity_count: u32,
    pub max_pin_size: u32,
}

/// Assembled reply to a `GetLog` call: only the fields matching the
/// requested `LogType`s are populated.
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    pub utilizations: Vec<Utilization>,
    pub temperatures: Vec<Temperature>,
    pub capacity: Option<Capacity>,
    pub limits: Option<Limits>,
    pub device: Option<Bytes>,
    pub messages: Option<Bytes>,
}
