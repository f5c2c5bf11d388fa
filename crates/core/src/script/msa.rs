//! Standalone managed service account template.
//!
//! Smaller than the gMSA script: no prerequisites, group, SPN or delegation
//! handling. The account is bound to the single requested host.

use super::{first_host, render_header, ScriptContext, Section, Template};
use crate::error::CoreError;

pub static MSA_TEMPLATE: Template = Template {
    name: "msa",
    sections: &[
        Section::always("header", header),
        Section::always("create_account", create_account),
        Section::always("associate_computer", associate_computer),
        Section::always("summary", summary),
    ],
};

fn header(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    render_header(
        ctx,
        out,
        "MSA",
        "Creates a Managed Service Account (MSA) in Active Directory.",
        &format!(
            "This script creates the MSA \"{}\" for use on a single computer.",
            ctx.fields.account_name
        ),
    );
    Ok(())
}

fn create_account(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    let f = ctx.fields;
    // Fail before emitting anything if the host is missing.
    first_host(f)?;

    out.push_str("# Create MSA\n");
    out.push_str(&format!(
        "Write-Host \"Creating MSA: {}\" -ForegroundColor Cyan\n",
        f.account_name
    ));
    out.push_str("$msaParams = @{\n");
    out.push_str(&format!("    Name = \"{}\"\n", f.account_name));
    out.push_str("    RestrictToSingleComputer = $true\n");
    out.push_str(&format!("    Path = \"{}\"\n", f.target_ou));
    out.push_str("    Enabled = $true\n");
    out.push_str("}\n");
    out.push_str(
        r#"try {
    New-ADServiceAccount @msaParams
    Write-Host "[OK] MSA created successfully!" -ForegroundColor Green
} catch {
    Write-Error "Failed to create MSA: $_"
    exit 1
}
"#,
    );
    Ok(())
}

fn associate_computer(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    let host = first_host(ctx.fields)?;
    let name = &ctx.fields.account_name;

    out.push_str("# Associate with computer\n");
    out.push_str(&format!(
        "Write-Host \"Associating MSA with computer: {host}\" -ForegroundColor Cyan\n"
    ));
    out.push_str("try {\n");
    out.push_str(&format!(
        "    Add-ADComputerServiceAccount -Identity \"{host}\" -ServiceAccount \"{name}\"\n"
    ));
    out.push_str(&format!(
        "    Write-Host \"[OK] MSA associated with {host}\" -ForegroundColor Green\n"
    ));
    out.push_str("} catch {\n");
    out.push_str("    Write-Error \"Failed to associate MSA: $_\"\n");
    out.push_str("}\n");
    Ok(())
}

fn summary(ctx: &ScriptContext<'_>, out: &mut String) -> Result<(), CoreError> {
    let host = first_host(ctx.fields)?;
    let name = &ctx.fields.account_name;

    out.push_str("# Summary\n");
    out.push_str("Write-Host \"`n========================================\" -ForegroundColor Cyan\n");
    out.push_str("Write-Host \"MSA Creation Complete!\" -ForegroundColor Green\n");
    out.push_str("Write-Host \"========================================\" -ForegroundColor Cyan\n");
    out.push_str(&format!("Write-Host \"Account Name: {name}$\"\n"));
    out.push_str(&format!("Write-Host \"Target Computer: {host}\"\n"));
    out.push('\n');
    out.push_str("Write-Host \"`nNext Steps:\" -ForegroundColor Yellow\n");
    out.push_str(&format!(
        "Write-Host \"1. On the target server ({host}), run:\"\n"
    ));
    out.push_str(&format!(
        "Write-Host \"   Install-ADServiceAccount -Identity {name}\" -ForegroundColor Cyan\n"
    ));
    out.push_str("Write-Host \"2. Test the installation:\"\n");
    out.push_str(&format!(
        "Write-Host \"   Test-ADServiceAccount -Identity {name}\" -ForegroundColor Cyan\n"
    ));
    Ok(())
}
