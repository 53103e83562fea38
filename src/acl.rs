// SPDX-License-Identifier: AGPL-3.0-or-later

//! ACL file parsing (`SetACL`'s external collaborator). Schema follows
//! `kinetic-c`'s `test_kinetic_acl.c` JSON fixtures: a list of identities,
//! each with an HMAC key and a list of scopes restricting which
//! permissions apply to which key-offset range.

use serde::{Deserialize, Serialize};

use crate::proto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HmacAlgorithm {
    HmacSha1,
}

impl From<HmacAlgorithm> for proto::HmacAlgorithm {
    fn from(a: HmacAlgorithm) -> Self {
        match a {
            HmacAlgorithm::HmacSha1 => proto::HmacAlgorithm::HmacSha1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Permission {
    Read,
    Write,
    Delete,
    Range,
    Setup,
    P2pop,
    Getlog,
    Security,
}

impl From<Permission> for proto::Permission {
    fn from(p: Permission) -> Self {
        use proto::Permission as P;
        match p {
            Permission::Read => P::Read,
            Permission::Write => P::Write,
            Permission::Delete => P::Delete,
            Permission::Range => P::Range,
            Permission::Setup => P::Setup,
            Permission::P2pop => P::P2Pop,
            Permission::Getlog => P::Getlog,
            Permission::Security => P::Security,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub value: String,
    pub permission: Vec<Permission>,
    #[serde(default, rename = "TlsRequired")]
    pub tls_required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acl {
    pub identity: i64,
    pub key: String,
    #[serde(rename = "hmacAlgorithm")]
    pub hmac_algorithm: HmacAlgorithm,
    #[serde(default, rename = "maxPriority")]
    pub max_priority: i32,
    pub scope: Vec<Scope>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclFile {
    pub permissions: Vec<Acl>,
}

impl AclFile {
    pub fn from_json(data: &str) -> anyhow::Result<AclFile> {
        Ok(serde_json::from_str(data)?)
    }
}
