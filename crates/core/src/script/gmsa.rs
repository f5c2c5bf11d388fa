//! Group managed service account template.

use super::{first_host, quoted_list, render_header, required, ScriptContext, Section, Template};
use crate::error::CoreError;

pub static GMSA_TEMPLATE: Template = Template {
    name: "gmsa",
    sections: &[
        Section::always("header", header),
        Section::always("prerequisites", prerequisites),
        Section::always("security_group", security_group),
        Section::always("host_membership", host_membership),
        Section::always("replication_wait", replication_wait),
        Section::always("create_account", create_account),
        Section::when(
            "service_principal_names",
            has_service_principal_names,
            service_principal_names,
        ),
        Section::when("delegation", has_delegation, delegation),
        Section::always("summary", summary),
    ],
};

fn security_group_name<'a>(ctx: &ScriptContext<'a>) -> Result<&'a str, CoreError> {
    required(
        ctx.fields.security_group_name.as_deref(),
        "securityGroupName",
    )
}

fn header(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    render_header(
        ctx,
        out,
        "gMSA",
        "Creates a Group Managed Service Account (gMSA) in Active Directory.",
        &format!(
            "This script creates the gMSA \"{}\" with the specified configuration.\n    \
             Run on a Domain Controller or management workstation with RSAT-AD-PowerShell.",
            ctx.fields.account_name
        ),
    );
    Ok(())
}

fn prerequisites(_ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    out.push_str(
        r#"# Prerequisites Check
Write-Host "Checking prerequisites..." -ForegroundColor Cyan
$kdsKey = Get-KdsRootKey -ErrorAction SilentlyContinue
if (-not $kdsKey) {
    Write-Error "KDS Root Key not found! Run Create-KdsRootKey.ps1 first."
    exit 1
}
Write-Host "[OK] KDS Root Key exists" -ForegroundColor Green
"#,
    );
    Ok(())
}

/// Creation block when a new group is requested, otherwise a one-line
/// comment naming the group that is reused.
fn security_group(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    let group = security_group_name(ctx)?;
    if !ctx.fields.create_security_group {
        out.push_str(&format!("# Using existing security group: {group}\n"));
        return Ok(());
    }

    let f = ctx.fields;
    out.push_str("# Create Security Group\n");
    out.push_str(&format!(
        "Write-Host \"Creating security group: {group}\" -ForegroundColor Cyan\n"
    ));
    out.push_str(&format!(
        "$existingGroup = Get-ADGroup -Filter \"Name -eq '{group}'\" -ErrorAction SilentlyContinue\n"
    ));
    out.push_str("if (-not $existingGroup) {\n");
    out.push_str(&format!("    New-ADGroup -Name \"{group}\" `\n"));
    out.push_str("                -GroupScope Global `\n");
    out.push_str("                -GroupCategory Security `\n");
    out.push_str(&format!("                -Path \"{}\" `\n", f.target_ou));
    out.push_str(&format!(
        "                -Description \"Computers allowed to use gMSA: {}\"\n",
        f.account_name
    ));
    out.push_str("    Write-Host \"[OK] Security group created\" -ForegroundColor Green\n");
    out.push_str("} else {\n");
    out.push_str("    Write-Host \"Security group already exists\" -ForegroundColor Yellow\n");
    out.push_str("}\n");
    Ok(())
}

/// Declares `$HostServers` (read again by the summary), then one membership
/// call per host after the helper that performs it.
fn host_membership(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    let group = security_group_name(ctx)?;
    first_host(ctx.fields)?;

    out.push_str("# Add computers to security group\n");
    out.push_str(&format!(
        "$HostServers = @({})\n",
        quoted_list(ctx.fields.host_servers.iter().map(String::as_str))
    ));
    out.push_str("Write-Host \"Adding computers to security group...\" -ForegroundColor Cyan\n");
    out.push_str("function Add-HostToGroup([string]$Server) {\n");
    out.push_str("    try {\n");
    out.push_str("        $computer = Get-ADComputer -Identity $Server -ErrorAction Stop\n");
    out.push_str(&format!(
        "        Add-ADGroupMember -Identity \"{group}\" -Members $computer -ErrorAction SilentlyContinue\n"
    ));
    out.push_str("        Write-Host \"[OK] Added $Server\" -ForegroundColor Green\n");
    out.push_str("    } catch {\n");
    out.push_str("        Write-Warning \"Could not find computer: $Server\"\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    for host in &ctx.fields.host_servers {
        out.push_str(&format!("Add-HostToGroup \"{host}\"\n"));
    }
    Ok(())
}

fn replication_wait(_ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    out.push_str(
        r#"# Wait for AD replication
Write-Host "Waiting 5 seconds for AD replication..." -ForegroundColor Yellow
Start-Sleep -Seconds 5
"#,
    );
    Ok(())
}

fn create_account(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    let f = ctx.fields;
    let dns_hostname = required(f.dns_hostname.as_deref(), "dnsHostname")?;
    let group = security_group_name(ctx)?;
    let encryption = f.effective_encryption_types();

    out.push_str("# Create gMSA\n");
    out.push_str(&format!(
        "Write-Host \"Creating gMSA: {}\" -ForegroundColor Cyan\n",
        f.account_name
    ));
    out.push_str("$gmsaParams = @{\n");
    out.push_str(&format!("    Name = \"{}\"\n", f.account_name));
    out.push_str(&format!("    DNSHostName = \"{dns_hostname}\"\n"));
    out.push_str(&format!(
        "    PrincipalsAllowedToRetrieveManagedPassword = \"{group}\"\n"
    ));
    out.push_str(&format!(
        "    ManagedPasswordIntervalInDays = {}\n",
        f.password_interval_days
    ));
    out.push_str(&format!(
        "    KerberosEncryptionType = @({})\n",
        quoted_list(encryption.iter().map(|e| e.as_str()))
    ));
    out.push_str(&format!("    Path = \"{}\"\n", f.target_ou));
    out.push_str("    Enabled = $true\n");
    out.push_str("}\n");
    out.push_str(
        r#"try {
    New-ADServiceAccount @gmsaParams
    Write-Host "[OK] gMSA created successfully!" -ForegroundColor Green
} catch {
    Write-Error "Failed to create gMSA: $_"
    exit 1
}
"#,
    );
    Ok(())
}

fn has_service_principal_names(ctx: &ScriptContext<'_>) -> bool {
    !ctx.fields.spn_lines().is_empty()
}

fn service_principal_names(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    let spns = ctx.fields.spn_lines();
    out.push_str("# Set Service Principal Names\n");
    out.push_str(&format!("$SPNs = @({})\n", quoted_list(spns)));
    out.push_str("Write-Host \"Setting SPNs...\" -ForegroundColor Cyan\n");
    out.push_str(&format!(
        "Set-ADServiceAccount -Identity \"{}\" -ServicePrincipalNames @{{Add=$SPNs}}\n",
        ctx.fields.account_name
    ));
    out.push_str("Write-Host \"[OK] SPNs configured\" -ForegroundColor Green\n");
    Ok(())
}

fn has_delegation(ctx: &ScriptContext<'_>) -> bool {
    ctx.fields.enable_delegation && !ctx.fields.delegated_service_list().is_empty()
}

fn delegation(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    let f = ctx.fields;
    let kind = f
        .delegation_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("constrained");
    out.push_str(&format!("# Configure delegation ({kind})\n"));
    out.push_str(&format!(
        "$DelegatedServices = @({})\n",
        quoted_list(f.delegated_service_list())
    ));
    out.push_str("Write-Host \"Configuring delegation...\" -ForegroundColor Cyan\n");
    out.push_str(&format!(
        "Set-ADServiceAccount -Identity \"{}\" -Add @{{'msDS-AllowedToDelegateTo' = $DelegatedServices}}\n",
        f.account_name
    ));
    out.push_str("Write-Host \"[OK] Delegation configured\" -ForegroundColor Green\n");
    Ok(())
}

fn summary(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    let f = ctx.fields;
    let group = security_group_name(ctx)?;
    let dns_hostname = required(f.dns_hostname.as_deref(), "dnsHostname")?;
    let name = &f.account_name;

    out.push_str("# Summary\n");
    out.push_str("Write-Host \"`n========================================\" -ForegroundColor Cyan\n");
    out.push_str("Write-Host \"gMSA Creation Complete!\" -ForegroundColor Green\n");
    out.push_str("Write-Host \"========================================\" -ForegroundColor Cyan\n");
    out.push_str(&format!("Write-Host \"Account Name: {name}$\"\n"));
    out.push_str(&format!("Write-Host \"DNS Hostname: {dns_hostname}\"\n"));
    out.push_str(&format!("Write-Host \"Security Group: {group}\"\n"));
    out.push_str("Write-Host \"Host Servers: $($HostServers -join ', ')\"\n");
    out.push('\n');
    out.push_str("Write-Host \"`nNext Steps:\" -ForegroundColor Yellow\n");
    out.push_str("Write-Host \"1. On each target server, run:\"\n");
    out.push_str(&format!(
        "Write-Host \"   Install-ADServiceAccount -Identity {name}\" -ForegroundColor Cyan\n"
    ));
    out.push_str("Write-Host \"2. Test the installation:\"\n");
    out.push_str(&format!(
        "Write-Host \"   Test-ADServiceAccount -Identity {name}\" -ForegroundColor Cyan\n"
    ));
    out.push_str(&format!(
        "Write-Host \"3. Configure your service to use: DOMAIN\\{name}$\" -ForegroundColor Cyan\n"
    ));
    Ok(())
}
