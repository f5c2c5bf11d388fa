//! Structural validation of submitted request fields.
//!
//! Runs before anything is persisted. Only presence and shape are checked;
//! whether names resolve in the directory is the generated script's problem.

use std::collections::HashSet;

use crate::account::{AccountFields, AccountType};
use crate::error::CoreError;

/// Validate every structural constraint on a submission.
pub fn validate_fields(fields: &AccountFields) -> Result<(), CoreError> {
    validate_account_name(&fields.account_name).map_err(CoreError::Validation)?;
    validate_type_specific(fields).map_err(CoreError::Validation)?;
    validate_host_servers(fields.account_type, &fields.host_servers)
        .map_err(CoreError::Validation)?;
    validate_password_interval(fields.password_interval_days).map_err(CoreError::Validation)?;
    Ok(())
}

/// The account name must contain something other than whitespace.
pub fn validate_account_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("accountName is required".to_string());
    }
    Ok(())
}

/// gMSA requests must name a DNS host and a security group.
pub fn validate_type_specific(fields: &AccountFields) -> Result<(), String> {
    if fields.account_type != AccountType::Gmsa {
        return Ok(());
    }
    if is_blank(fields.dns_hostname.as_deref()) {
        return Err("dnsHostname is required for gmsa accounts".to_string());
    }
    if is_blank(fields.security_group_name.as_deref()) {
        return Err("securityGroupName is required for gmsa accounts".to_string());
    }
    Ok(())
}

/// At least one host, no blanks, no duplicates, and no more than the
/// account type allows.
pub fn validate_host_servers(account_type: AccountType, hosts: &[String]) -> Result<(), String> {
    if hosts.is_empty() {
        return Err("At least one host server is required".to_string());
    }
    if let Some(max) = account_type.max_hosts() {
        if hosts.len() > max {
            return Err(format!(
                "{} accounts allow at most {max} host server(s), got {}",
                account_type.label(),
                hosts.len()
            ));
        }
    }
    let mut seen = HashSet::with_capacity(hosts.len());
    for host in hosts {
        if host.trim().is_empty() {
            return Err("Host server names must not be blank".to_string());
        }
        if !seen.insert(host.to_ascii_lowercase()) {
            return Err(format!("Host server '{host}' is listed more than once"));
        }
    }
    Ok(())
}

pub fn validate_password_interval(days: u32) -> Result<(), String> {
    if days == 0 {
        return Err("passwordIntervalDays must be at least 1".to_string());
    }
    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
