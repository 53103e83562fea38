// SPDX-License-Identifier: AGPL-3.0-or-later

//! HMAC-SHA1 authentication over a PDU's protobuf segment (spec invariant
//! 5: `hmac = HMAC-SHA1(key, len32be(|P|) || P)`, verified in constant
//! time).

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::status::Status;

type HmacSha1 = Hmac<Sha1>;

/// Computes the HMAC over the length-prefixed protobuf command bytes.
pub fn sign(key: &[u8], command_bytes: &[u8]) -> Vec<u8> {
    let mut mac = <HmacSha1 as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(&(command_bytes.len() as u32).to_be_bytes());
    mac.update(command_bytes);
    mac.finalize().into_bytes().to_vec()
}

/// Verifies `hmac` against a fresh computation over `command_bytes`,
/// using `Hmac::verify_slice`'s constant-time comparison.
pub fn verify(key: &[u8], command_bytes: &[u8], hmac: &[u8]) -> Result<(), Status> {
    let mut mac = <HmacSha1 as Mac>::new_from_slice(key).map_err(|_| Status::DataError)?;
    mac.update(&(command_bytes.len() as u32).to_be_bytes());
    mac.update(command_bytes);
    mac.verify_slice(hmac).map_err(|_| Status::DataError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_succeeds() {
        let key = b"asdfasdf";
        let body = b"some command bytes";
        let mac = sign(key, body);
        assert!(verify(key, body, &mac).is_ok());
    }

    #[test]
    fn tampered_body_fails_verify() {
        let key = b"asdfasdf";
        let mac = sign(key, b"original body");
        assert_eq!(
            verify(key, b"tampered body", &mac),
            Err(Status::DataError)
        );
    }

    #[test]
    fn wrong_key_fails_verify() {
        let mac = sign(b"key-one", b"body");
        assert_eq!(verify(b"key-two", b"body", &mac), Err(Status::DataError));
    }
}
