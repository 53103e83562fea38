// SPDX-License-Identifier: AGPL-3.0-or-later

//! Admin-plane commands, supplemented from `kinetic-c`'s
//! `test_system_security.c`/`test_system_erase.c`: ACL installation, PIN
//! rotation, and the PIN-authenticated erase/lock operations.
//!
//! `SetACL`/`SetErasePin`/`SetLockPin` go out over the regular HMAC
//! identity (the caller must hold the `SECURITY` permission); the erase
//! and lock/unlock operations instead authenticate with the PIN itself,
//! since by the time you're unlocking a device your HMAC identity may be
//! the thing that's locked out.

use bytes::Bytes;

use crate::{
    acl::Acl,
    commands::check_status,
    device_info::{Capacity, DeviceInfo, LogType, Temperature, Utilization},
    proto,
    session::Session,
    status::Status,
};

fn acl_to_proto(acl: &Acl) -> proto::Acl {
    proto::Acl {
        identity: acl.identity,
        key: acl.key.clone().into_bytes(),
        hmac_algorithm: proto::HmacAlgorithm::from(acl.hmac_algorithm) as i32,
        max_priority: acl.max_priority,
        scope: acl
            .scope
            .iter()
            .map(|s| proto::Scope {
                offset: s.offset,
                value: s.value.clone().into_bytes(),
                permission: s.permission.iter().map(|p| proto::Permission::from(*p) as i32).collect(),
                tls_required: s.tls_required,
            })
            .collect(),
    }
}

/// Replaces the drive's entire ACL list.
pub async fn set_acl(session: &Session, acls: &[Acl]) -> Result<(), Status> {
    let security = proto::Security {
        acl: acls.iter().map(acl_to_proto).collect(),
        ..Default::default()
    };
    let command = proto::Command {
        header: None,
        body: Some(proto::Body {
            security: Some(security),
            ..Default::default()
        }),
        status: None,
    };
    let (response, _) = session.submit(command, Bytes::new(), proto::MessageType::Security).await?;
    check_status(&response)
}

/// Rotates the drive's erase PIN. An empty `old_pin` is valid the first
/// time a PIN is set.
pub async fn set_erase_pin(session: &Session, old_pin: &[u8], new_pin: &[u8]) -> Result<(), Status> {
    let security = proto::Security {
        old_erase_pin: old_pin.to_vec(),
        new_erase_pin: new_pin.to_vec(),
        ..Default::default()
    };
    let command = proto::Command {
        header: None,
        body: Some(proto::Body {
            security: Some(security),
            ..Default::default()
        }),
        status: None,
    };
    let (response, _) = session.submit(command, Bytes::new(), proto::MessageType::Security).await?;
    check_status(&response)
}

/// Rotates the drive's lock PIN. An empty `old_pin` is valid the first
/// time a PIN is set.
pub async fn set_lock_pin(session: &Session, old_pin: &[u8], new_pin: &[u8]) -> Result<(), Status> {
    let security = proto::Security {
        old_lock_pin: old_pin.to_vec(),
        new_lock_pin: new_pin.to_vec(),
        ..Default::default()
    };
    let command = proto::Command {
        header: None,
        body: Some(proto::Body {
            security: Some(security),
            ..Default::default()
        }),
        status: None,
    };
    let (response, _) = session.submit(command, Bytes::new(), proto::MessageType::Security).await?;
    check_status(&response)
}

async fn pin_op(session: &Session, pin: &[u8], op_type: proto::PinOpType) -> Result<(), Status> {
    if pin.is_empty() {
        return Err(Status::MissingPin);
    }
    let command = proto::Command {
        header: None,
        body: Some(proto::Body {
            pin_op: Some(proto::PinOperation {
                pin_op_type: op_type as i32,
            }),
            ..Default::default()
        }),
        status: None,
    };
    let (response, _) = session.submit_with_pin(command, pin, proto::MessageType::Pinop).await?;
    check_status(&response)
}

/// Cryptographically erases all data; the drive is unusable until a full
/// format. Requires the erase PIN.
pub async fn secure_erase(session: &Session, erase_pin: &[u8]) -> Result<(), Status> {
    pin_op(session, erase_pin, proto::PinOpType::SecureEraseOp).await
}

/// Zeroes all data in place. Requires the erase PIN.
pub async fn instant_erase(session: &Session, erase_pin: &[u8]) -> Result<(), Status> {
    pin_op(session, erase_pin, proto::PinOpType::EraseOp).await
}

pub async fn lock_device(session: &Session, lock_pin: &[u8]) -> Result<(), Status> {
    pin_op(session, lock_pin, proto::PinOpType::LockOp).await
}

pub async fn unlock_device(session: &Session, lock_pin: &[u8]) -> Result<(), Status> {
    pin_op(session, lock_pin, proto::PinOpType::UnlockOp).await
}

/// Fetches one or more of the drive's status logs.
pub async fn get_log(session: &Session, types: &[LogType]) -> Result<DeviceInfo, Status> {
    let get_log = proto::GetLog {
        types: types.iter().map(|t| proto::GetLogType::from(*t) as i32).collect(),
        ..Default::default()
    };
    let command = proto::Command {
        header: None,
        body: Some(proto::Body {
            get_log: Some(get_log),
            ..Default::default()
        }),
        status: None,
    };
    let (response, _) = session.submit(command, Bytes::new(), proto::MessageType::Getlog).await?;
    check_status(&response)?;

    let Some(log) = response.body.and_then(|b| b.get_log) else {
        return Ok(DeviceInfo::default());
    };

    Ok(DeviceInfo {
        utilizations: log
            .utilizations
            .into_iter()
            .map(|u| Utilization {
                name: u.name,
                percent: u.percent,
            })
            .collect(),
        temperatures: log
            .temperatures
            .into_iter()
            .map(|t| Temperature {
                name: t.name,
                current: t.current,
                minimum: t.minimum,
                maximum: t.maximum,
                target: t.target,
            })
            .collect(),
        capacity: log.capacity.map(|c| Capacity {
            total_bytes: c.total_bytes,
            portion_full: c.portion_full,
        }),
        limits: log.limits.map(Into::into),
        device: (!log.device.is_empty()).then(|| Bytes::from(log.device)),
        messages: (!log.messages.is_empty()).then(|| Bytes::from(log.messages)),
    })
}

impl From<proto::Limits> for crate::device_info::Limits {
    fn from(l: proto::Limits) -> Self {
        crate::device_info::Limits {
            max_key_size: l.max_key_size,
            max_value_size: l.max_value_size,
            max_version_size: l.max_version_size,
            max_tag_size: l.max_tag_size,
            max_connections: l.max_connections,
            max_outstanding_read_requests: l.max_outstanding_read_requests,
            max_outstanding_write_requests: l.max_outstanding_write_requests,
            max_message_size: l.max_message_size,
            max_key_range_count: l.max_key_range_count,
            max_identity_count: l.max_identity_count,
            max_pin_size: l.max_pin_size,
        }
    }
}
