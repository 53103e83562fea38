// SPDX-License-Identifier: AGPL-3.0-or-later

//! Generated protobuf types for the wire envelope (`Message`/`Command`/...).
//! Kept opaque on purpose: callers never construct these directly, only
//! through `commands::*` builders and `entry`/`key_range` types.
#![allow(clippy::large_enum_variant)]

include!(concat!(env!("OUT_DIR"), "/kinetic.rs"));
