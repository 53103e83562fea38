// SPDX-License-Identifier: AGPL-3.0-or-later

//! The caller-visible key-value record (spec §3 "Entry").

use bytes::Bytes;

use crate::proto;

/// Digest algorithm tagging an entry's `tag` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Sha1,
    Sha2,
    Sha3,
    Crc32,
    Crc64,
}

impl From<Algorithm> for proto::Algorithm {
    fn from(a: Algorithm) -> Self {
        match a {
            Algorithm::Sha1 => proto::Algorithm::Sha1,
            Algorithm::Sha2 => proto::Algorithm::Sha2,
            Algorithm::Sha3 => proto::Algorithm::Sha3,
            Algorithm::Crc32 => proto::Algorithm::Crc32,
            Algorithm::Crc64 => proto::Algorithm::Crc64,
        }
    }
}

impl From<proto::Algorithm> for Algorithm {
    fn from(a: proto::Algorithm) -> Self {
        match a {
            proto::Algorithm::Sha1 | proto::Algorithm::InvalidAlgorithm => Algorithm::Sha1,
            proto::Algorithm::Sha2 => Algorithm::Sha2,
            proto::Algorithm::Sha3 => Algorithm::Sha3,
            proto::Algorithm::Crc32 => Algorithm::Crc32,
            proto::Algorithm::Crc64 => Algorithm::Crc64,
        }
    }
}

/// Persistence mode requested for a `Put`/`Delete` (spec GLOSSARY
/// "Synchronization mode").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Synchronization {
    #[default]
    WriteThrough,
    WriteBack,
    Flush,
}

impl From<Synchronization> for proto::Synchronization {
    fn from(s: Synchronization) -> Self {
        match s {
            Synchronization::WriteThrough => proto::Synchronization::Writethrough,
            Synchronization::WriteBack => proto::Synchronization::Writeback,
            Synchronization::Flush => proto::Synchronization::Flush,
        }
    }
}

/// A key-value record: the unit of `Put`/`Get`/`Delete`.
///
/// The same struct is used for request and response: `put`/`delete` read
/// `key`, `tag`, `algorithm`, `new_version`, `db_version`, `value`,
/// `force`, `synchronization`; `get`/`get_next`/`get_previous` overwrite
/// `tag`, `algorithm`, `db_version`, and (unless `metadata_only`) `value`
/// with what the drive returns.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub key: Bytes,
    /// Expected current version on the drive. Ignored when `force` is set.
    pub db_version: Option<Bytes>,
    /// Version to store after a successful `Put`.
    pub new_version: Option<Bytes>,
    pub tag: Bytes,
    pub algorithm: Algorithm,
    pub value: Bytes,
    /// Skip the optimistic `db_version` check.
    pub force: bool,
    pub synchronization: Synchronization,
    /// For `Get`/`GetNext`/`GetPrevious`: fetch metadata only, no value.
    pub metadata_only: bool,
}

impl Entry {
    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }

    pub fn has_value_buffer(&self) -> bool {
        !self.value.is_empty() || self.metadata_only
    }
}
