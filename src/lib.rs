// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod acl;
pub mod cfg;
pub mod client;
pub mod commands;
pub mod device_info;
pub mod entry;
pub mod key_range;
pub mod message;
pub mod operation;
pub mod p2p;
pub mod proto;
pub mod session;
pub mod status;
pub mod wire;
