// SPDX-License-Identifier: AGPL-3.0-or-later

//! PDU framing: header encode/decode, HMAC authentication, and the
//! tagged `Pdu` union.

pub mod header;
pub mod hmac;
pub mod pdu;

pub use header::{HEADER_LEN, PduHeader};
pub use pdu::{Pdu, RequestPdu, ResponsePdu, UnsolicitedPdu};
