//! Identifier and download file naming conventions.

use crate::account::AccountType;
use crate::types::RequestId;

/// Prefix shared by every request identifier.
pub const REQUEST_ID_PREFIX: &str = "REQ-";

/// Extension of generated scripts.
pub const SCRIPT_EXTENSION: &str = "ps1";

/// Generate a fresh request identifier.
///
/// Convention: `REQ-` followed by the first eight hex digits of a random v4
/// UUID, upper-cased. Uniqueness is probabilistic (32 random bits) and is not
/// checked against existing records.
pub fn new_request_id() -> RequestId {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{REQUEST_ID_PREFIX}{}", uuid[..8].to_uppercase())
}

/// Download file name for a request's generated script.
///
/// Convention: `Create-{TYPE}-{accountName}.ps1`
///
/// ```
/// use portal_core::account::AccountType;
/// use portal_core::naming::script_filename;
///
/// assert_eq!(script_filename(AccountType::Gmsa, "svcApp"), "Create-GMSA-svcApp.ps1");
/// assert_eq!(script_filename(AccountType::Msa, "svcBatch"), "Create-MSA-svcBatch.ps1");
/// ```
pub fn script_filename(account_type: AccountType, account_name: &str) -> String {
    format!(
        "Create-{}-{account_name}.{SCRIPT_EXTENSION}",
        account_type.label()
    )
}

/// Static helper scripts served alongside generated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityScript {
    Prerequisites,
    KdsRootKey,
    Validate,
}

impl UtilityScript {
    pub const ALL: [UtilityScript; 3] = [
        UtilityScript::Prerequisites,
        UtilityScript::KdsRootKey,
        UtilityScript::Validate,
    ];

    /// Resolve the URL slug (`prerequisites`, `kds`, `validate`).
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "prerequisites" => Some(Self::Prerequisites),
            "kds" => Some(Self::KdsRootKey),
            "validate" => Some(Self::Validate),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Prerequisites => "prerequisites",
            Self::KdsRootKey => "kds",
            Self::Validate => "validate",
        }
    }

    /// File name inside the scripts directory, also used for the download.
    pub fn filename(self) -> &'static str {
        match self {
            Self::Prerequisites => "Verify-Prerequisites.ps1",
            Self::KdsRootKey => "Create-KdsRootKey.ps1",
            Self::Validate => "Validate-gMSA.ps1",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_shape() {
        let id = new_request_id();
        assert!(id.starts_with(REQUEST_ID_PREFIX));
        let suffix = &id[REQUEST_ID_PREFIX.len()..];
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn request_ids_differ() {
        let ids: std::collections::HashSet<_> = (0..64).map(|_| new_request_id()).collect();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn gmsa_filename() {
        assert_eq!(
            script_filename(AccountType::Gmsa, "svcApp"),
            "Create-GMSA-svcApp.ps1"
        );
    }

    #[test]
    fn msa_filename_keeps_account_case() {
        assert_eq!(
            script_filename(AccountType::Msa, "SvcBatch"),
            "Create-MSA-SvcBatch.ps1"
        );
    }

    #[test]
    fn utility_slugs_resolve_both_ways() {
        for script in UtilityScript::ALL {
            assert_eq!(UtilityScript::from_slug(script.slug()), Some(script));
            assert!(script.filename().ends_with(".ps1"));
        }
        assert_eq!(UtilityScript::from_slug("../etc/passwd"), None);
        assert_eq!(UtilityScript::from_slug("KDS"), None);
    }
}
