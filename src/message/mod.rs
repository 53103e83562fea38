// SPDX-License-Identifier: AGPL-3.0-or-later

//! Builds and authenticates the `Message`/`Command` envelope.

pub mod builder;

pub use builder::{Auth, build_header, build_message, verify_and_unwrap};
