// SPDX-License-Identifier: AGPL-3.0-or-later

//! The PDU union, redesigned as a tagged enum (spec §9 "PDU union"
//! REDESIGN FLAG, adopted): a value is always known to be exactly one of
//! `Request` (what we send), `Response` (a reply to one of our requests)
//! or `Unsolicited` (the drive's unprompted status PDU, sent once right
//! after connect and never again).

use bytes::{Bytes, BytesMut};
use prost::Message as _;

use crate::{
    proto,
    status::Status,
    wire::header::{HEADER_LEN, PduHeader},
};

/// A PDU we are about to send: the protobuf `Message` envelope plus an
/// optional raw value blob (present for `Put`, absent for e.g. `NoOp`).
#[derive(Debug, Clone)]
pub struct RequestPdu {
    pub message: proto::Message,
    pub value: Bytes,
}

/// A reply correlated to one of our requests via `ack_sequence`.
#[derive(Debug, Clone)]
pub struct ResponsePdu {
    pub message: proto::Message,
    pub value: Bytes,
}

/// The drive's connection-opening status PDU. Carries no correlation id;
/// the reader loop consumes exactly one of these before treating anything
/// else as a `Response`.
#[derive(Debug, Clone)]
pub struct UnsolicitedPdu {
    pub message: proto::Message,
}

#[derive(Debug, Clone)]
pub enum Pdu {
    Request(RequestPdu),
    Response(ResponsePdu),
    Unsolicited(UnsolicitedPdu),
}

impl RequestPdu {
    /// Encodes the framed bytes: 9-byte header + protobuf + value.
    pub fn encode(&self) -> Bytes {
        let proto_bytes = self.message.encode_to_vec();
        let header = PduHeader::new(proto_bytes.len() as u32, self.value.len() as u32);
        let mut out = BytesMut::with_capacity(HEADER_LEN + proto_bytes.len() + self.value.len());
        out.extend_from_slice(&header.encode());
        out.extend_from_slice(&proto_bytes);
        out.extend_from_slice(&self.value);
        out.freeze()
    }
}

impl Pdu {
    /// Classifies a decoded protobuf `Message` + value blob read off the
    /// wire. `auth_type == UNSOLICITEDSTATUS` marks the one-shot
    /// handshake PDU; everything else from the drive is a `Response`.
    pub fn from_wire(message: proto::Message, value: Bytes) -> Pdu {
        if message.auth_type() == proto::message::AuthType::Unsolicitedstatus {
            Pdu::Unsolicited(UnsolicitedPdu { message })
        } else {
            Pdu::Response(ResponsePdu { message, value })
        }
    }

    pub fn as_response(&self) -> Option<&ResponsePdu> {
        match self {
            Pdu::Response(r) => Some(r),
            _ => None,
        }
    }
}

/// Decodes a `Message` from `proto_bytes`; used once the reader has
/// collected exactly `header.proto_len` bytes.
pub fn decode_message(proto_bytes: &[u8]) -> Result<proto::Message, Status> {
    proto::Message::decode(proto_bytes).map_err(|_| Status::InvalidPdu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{Command, Header, Message, message::AuthType};

    fn sample_message(auth_type: AuthType) -> Message {
        Message {
            auth_type: auth_type as i32,
            hmac_auth: None,
            pin_auth: None,
            command_bytes: Command {
                header: Some(Header {
                    sequence: 1,
                    ..Default::default()
                }),
                body: None,
                status: None,
            }
            .encode_to_vec(),
        }
    }

    #[test]
    fn request_round_trips_through_wire_framing() {
        let req = RequestPdu {
            message: sample_message(AuthType::Hmacauth),
            value: Bytes::from_static(b"value bytes"),
        };
        let framed = req.encode();
        let header = PduHeader::decode(
            &framed[..HEADER_LEN]
                .try_into()
                .expect("framed has at least a header"),
        )
        .expect("valid header");
        let proto_bytes = &framed[HEADER_LEN..HEADER_LEN + header.proto_len as usize];
        let value = &framed[HEADER_LEN + header.proto_len as usize..];
        let decoded = decode_message(proto_bytes).expect("decodes");
        assert_eq!(decoded.auth_type, AuthType::Hmacauth as i32);
        assert_eq!(value, b"value bytes");
    }

    #[test]
    fn unsolicited_status_is_classified_distinctly() {
        let msg = sample_message(AuthType::Unsolicitedstatus);
        match Pdu::from_wire(msg, Bytes::new()) {
            Pdu::Unsolicited(_) => {}
            other => panic!("expected Unsolicited, got {other:?}"),
        }
    }

    #[test]
    fn hmac_authed_reply_is_classified_as_response() {
        let msg = sample_message(AuthType::Hmacauth);
        match Pdu::from_wire(msg, Bytes::new()) {
            Pdu::Response(_) => {}
            other => panic!("expected Response, got {other:?}"),
        }
    }
}
