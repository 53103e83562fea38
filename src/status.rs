// SPDX-License-Identifier: AGPL-3.0-or-later

//! Public status taxonomy returned from every data-plane and admin-plane
//! call. Exhaustive: every wire `StatusCode` and every local failure
//! condition maps to exactly one variant (spec §7).

use thiserror::Error;

use crate::proto;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Terminal
    #[error("success")]
    Success,
    #[error("accepted, completion pending")]
    SuccessPending,

    // Transport
    #[error("connection error")]
    ConnectionError,
    #[error("socket error")]
    SocketError,
    #[error("socket timeout")]
    SocketTimeout,
    #[error("operation timed out")]
    OperationTimedOut,
    #[error("operation failed")]
    OperationFailed,
    #[error("session is not in a usable state")]
    SessionInvalid,
    #[error("session handle is empty")]
    SessionEmpty,
    #[error("host is empty")]
    HostEmpty,
    #[error("HMAC key is required")]
    HmacRequired,

    // Framing / auth
    #[error("HMAC mismatch or malformed protobuf")]
    DataError,
    #[error("malformed PDU")]
    InvalidPdu,
    #[error("invalid request")]
    InvalidRequest,
    #[error("not authorized")]
    NotAuthorized,

    // Semantic
    #[error("key not found")]
    NotFound,
    #[error("version mismatch")]
    VersionMismatch,
    #[error("version check failed")]
    VersionFailure,
    #[error("cluster version mismatch")]
    ClusterMismatch,
    #[error("device busy")]
    DeviceBusy,
    #[error("device locked")]
    DeviceLocked,
    #[error("device already unlocked")]
    DeviceAlreadyUnlocked,
    #[error("ACL error")]
    AclError,

    // Resource
    #[error("memory error")]
    MemoryError,
    #[error("caller's buffer was too small; result truncated")]
    BufferOverrun,
    #[error("entry has no key")]
    MissingKey,
    #[error("entry has no value buffer")]
    MissingValueBuffer,
    #[error("PIN is required")]
    MissingPin,

    // Local-only (not named in the wire taxonomy, but terminal)
    #[error("too many outstanding operations")]
    MaxOutstandingExceeded,
}

impl Status {
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success | Status::SuccessPending)
    }

    /// Maps a wire-level `StatusCode` to the public taxonomy.
    pub fn from_wire(code: proto::StatusCode) -> Status {
        use proto::StatusCode as C;
        match code {
            C::NotAttempted => Status::OperationFailed,
            C::Success => Status::Success,
            C::HmacFailure => Status::DataError,
            C::NotAuthorized => Status::NotAuthorized,
            C::VersionFailure => Status::VersionFailure,
            C::InternalError => Status::OperationFailed,
            C::HeaderRequired => Status::InvalidRequest,
            C::NotFound => Status::NotFound,
            C::VersionMismatch => Status::VersionMismatch,
            C::ServiceBusy => Status::DeviceBusy,
            C::Expired => Status::OperationTimedOut,
            C::DataError => Status::DataError,
            C::PermDataError => Status::DataError,
            C::RemoteConnectionError => Status::ConnectionError,
            C::NoSpace => Status::OperationFailed,
            C::NoSuchHmacAlgorithm => Status::DataError,
            C::InvalidRequest => Status::InvalidRequest,
            C::NestedOperationErrors => Status::OperationFailed,
            C::DeviceLocked => Status::DeviceLocked,
            C::DeviceAlreadyUnlocked => Status::DeviceAlreadyUnlocked,
            C::ConnectionTerminated => Status::SocketError,
            C::InvalidBatch => Status::InvalidRequest,
        }
    }
}
