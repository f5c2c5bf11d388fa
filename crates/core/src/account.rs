//! Account, encryption and status vocabularies plus the request input shape.
//!
//! These are closed enums rather than strings so an unknown account type,
//! status or encryption token is rejected at deserialization time.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Password rotation interval used when a request does not specify one.
pub const DEFAULT_PASSWORD_INTERVAL_DAYS: u32 = 30;

/// Kind of managed service account being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Group managed service account, usable from every host in a security group.
    Gmsa,
    /// Standalone managed service account bound to exactly one host.
    Msa,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gmsa => "gmsa",
            Self::Msa => "msa",
        }
    }

    /// Upper-case label used in file names and script headers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Gmsa => "GMSA",
            Self::Msa => "MSA",
        }
    }

    /// Maximum number of host servers the account may be bound to.
    pub fn max_hosts(self) -> Option<usize> {
        match self {
            Self::Gmsa => None,
            Self::Msa => Some(1),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kerberos encryption type token accepted by `New-ADServiceAccount`.
///
/// Declaration order is the order tokens are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EncryptionType {
    #[serde(rename = "AES128")]
    Aes128,
    #[serde(rename = "AES256")]
    Aes256,
    #[serde(rename = "RC4")]
    Rc4,
    #[serde(rename = "DES")]
    Des,
}

impl EncryptionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aes128 => "AES128",
            Self::Aes256 => "AES256",
            Self::Rc4 => "RC4",
            Self::Des => "DES",
        }
    }
}

impl fmt::Display for EncryptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The encryption set applied when none is requested.
pub fn default_encryption_types() -> BTreeSet<EncryptionType> {
    BTreeSet::from([EncryptionType::Aes256])
}

fn default_password_interval_days() -> u32 {
    DEFAULT_PASSWORD_INTERVAL_DAYS
}

/// Review status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied fields of a service account request.
///
/// Mirrors the stored record minus the identifier, status, timestamps and
/// rendered script, which the system assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFields {
    pub account_type: AccountType,
    #[serde(default, deserialize_with = "lenient::text")]
    pub account_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub display_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub requestor_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub requestor_email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cost_center: String,
    #[serde(default, alias = "targetOU", deserialize_with = "lenient::text")]
    pub target_ou: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub service_type: String,
    #[serde(default)]
    pub dns_hostname: Option<String>,
    #[serde(default)]
    pub security_group_name: Option<String>,
    #[serde(default)]
    pub create_security_group: bool,
    #[serde(default)]
    pub host_servers: Vec<String>,
    #[serde(
        default = "default_password_interval_days",
        alias = "passwordInterval",
        deserialize_with = "lenient::interval_days"
    )]
    pub password_interval_days: u32,
    #[serde(default = "default_encryption_types")]
    pub encryption_types: BTreeSet<EncryptionType>,
    #[serde(default, alias = "spns", deserialize_with = "lenient::text")]
    pub service_principal_names: String,
    #[serde(default)]
    pub enable_delegation: bool,
    #[serde(default)]
    pub delegation_type: Option<String>,
    #[serde(default)]
    pub delegated_services: Option<String>,
}

impl AccountFields {
    /// Minimal field set for the given account type; everything else defaulted.
    pub fn new(account_type: AccountType, account_name: impl Into<String>) -> Self {
        Self {
            account_type,
            account_name: account_name.into(),
            display_name: String::new(),
            description: String::new(),
            requestor_name: String::new(),
            requestor_email: String::new(),
            cost_center: String::new(),
            target_ou: String::new(),
            service_type: String::new(),
            dns_hostname: None,
            security_group_name: None,
            create_security_group: false,
            host_servers: Vec::new(),
            password_interval_days: DEFAULT_PASSWORD_INTERVAL_DAYS,
            encryption_types: default_encryption_types(),
            service_principal_names: String::new(),
            enable_delegation: false,
            delegation_type: None,
            delegated_services: None,
        }
    }

    /// Requested encryption types, falling back to the default set when empty.
    pub fn effective_encryption_types(&self) -> BTreeSet<EncryptionType> {
        if self.encryption_types.is_empty() {
            default_encryption_types()
        } else {
            self.encryption_types.clone()
        }
    }

    /// SPN lines with blank entries dropped and surrounding whitespace trimmed.
    pub fn spn_lines(&self) -> Vec<&str> {
        non_blank_lines(&self.service_principal_names)
    }

    /// Delegation targets, one per line or comma.
    pub fn delegated_service_list(&self) -> Vec<&str> {
        self.delegated_services
            .as_deref()
            .map(|s| {
                s.split(['\n', ','])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Split on newlines, trim each line and drop the blank ones.
pub fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Deserializers for records written by the form-based client, which sends
/// `null` for untouched text inputs and the interval as a string.
mod lenient {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    use super::DEFAULT_PASSWORD_INTERVAL_DAYS;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(u32),
        Text(String),
    }

    pub(super) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// `90`, `"90"`, or a blank string meaning the default.
    pub(super) fn interval_days<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<u32, D::Error> {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(days) => Ok(days),
            NumberOrText::Text(text) if text.trim().is_empty() => {
                Ok(DEFAULT_PASSWORD_INTERVAL_DAYS)
            }
            NumberOrText::Text(text) => text.trim().parse().map_err(|_| {
                D::Error::custom(format!("invalid password interval {text:?}"))
            }),
        }
    }
}
