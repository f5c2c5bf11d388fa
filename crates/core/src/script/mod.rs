//! PowerShell provisioning script generator.
//!
//! A [`Template`] is a fixed, ordered list of [`Section`]s. Each section has
//! an inclusion predicate and a renderer; rendering a template concatenates
//! the included sections separated by blank lines. Rendering is pure: the
//! same [`ScriptContext`] always yields byte-identical text, because the
//! "Generated" timestamp comes from the caller rather than the clock.

mod gmsa;
mod msa;

use chrono::SecondsFormat;

use crate::account::{AccountFields, AccountType};
use crate::error::CoreError;
use crate::types::Timestamp;

pub use gmsa::GMSA_TEMPLATE;
pub use msa::MSA_TEMPLATE;

/// Everything a template needs: the request fields plus the values the
/// system assigned before rendering.
#[derive(Debug, Clone, Copy)]
pub struct ScriptContext<'a> {
    pub request_id: &'a str,
    pub generated_at: Timestamp,
    pub fields: &'a AccountFields,
}

type IncludeFn = fn(&ScriptContext<'_>) -> bool;
type RenderFn = fn(&ScriptContext<'_>, &mut String) -> Result<(), CoreError>;

fn always_included(_: &ScriptContext<'_>) -> bool {
    true
}

/// One named, optionally included block of script text.
pub struct Section {
    pub name: &'static str,
    include: IncludeFn,
    render: RenderFn,
}

impl Section {
    const fn always(name: &'static str, render: RenderFn) -> Self {
        Self {
            name,
            include: always_included,
            render,
        }
    }

    const fn when(name: &'static str, include: IncludeFn, render: RenderFn) -> Self {
        Self {
            name,
            include,
            render,
        }
    }

    /// Whether this section is emitted for the given context.
    pub fn is_included(&self, ctx: &ScriptContext<'_>) -> bool {
        (self.include)(ctx)
    }

    /// Render the section body on its own, ignoring the inclusion predicate.
    pub fn render(&self, ctx: &ScriptContext<'_>) -> Result<String, CoreError> {
        let mut out = String::new();
        (self.render)(ctx, &mut out)?;
        Ok(out)
    }
}

/// Ordered section list for one account type.
pub struct Template {
    pub name: &'static str,
    sections: &'static [Section],
}

impl Template {
    pub fn sections(&self) -> &'static [Section] {
        self.sections
    }

    pub fn section(&self, name: &str) -> Option<&'static Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Names of the sections that would be emitted for `ctx`, in order.
    pub fn included_sections(&self, ctx: &ScriptContext<'_>) -> Vec<&'static str> {
        self.sections
            .iter()
            .filter(|s| s.is_included(ctx))
            .map(|s| s.name)
            .collect()
    }

    pub fn render(&self, ctx: &ScriptContext<'_>) -> Result<String, CoreError> {
        let mut out = String::new();
        for section in self.sections.iter().filter(|s| s.is_included(ctx)) {
            if !out.is_empty() {
                out.push('\n');
            }
            (section.render)(ctx, &mut out)?;
        }
        Ok(out)
    }
}

/// Select the template for an account type.
pub fn template_for(account_type: AccountType) -> &'static Template {
    match account_type {
        AccountType::Gmsa => &GMSA_TEMPLATE,
        AccountType::Msa => &MSA_TEMPLATE,
    }
}

/// Render the provisioning script for a request.
///
/// Fails with [`CoreError::MissingField`] when the request lacks a value a
/// section cannot do without (e.g. no host server at all).
pub fn render(ctx: &ScriptContext<'_>) -> Result<String, CoreError> {
    template_for(ctx.fields.account_type).render(ctx)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// `"a", "b", "c"`
pub(crate) fn quoted_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|item| format!("\"{item}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, CoreError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CoreError::MissingField { field }),
    }
}

pub(crate) fn first_host<'a>(fields: &'a AccountFields) -> Result<&'a str, CoreError> {
    required(
        fields.host_servers.first().map(String::as_str),
        "hostServers",
    )
}

/// Comment banner, help block and module requirement shared by both templates.
pub(crate) fn render_header(
    ctx: &ScriptContext<'_>,
    out: &mut String,
    kind: &str,
    synopsis: &str,
    purpose_line: &str,
) {
    let f = ctx.fields;
    out.push_str(&format!("# {kind} Creation Script\n"));
    out.push_str(&format!(
        "# Generated: {}\n",
        ctx.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    out.push_str(&format!("# Request ID: {}\n", ctx.request_id));
    out.push_str(&format!("# Account: {}$\n", f.account_name));
    out.push('\n');
    out.push_str("<#\n.SYNOPSIS\n");
    out.push_str(&format!("    {synopsis}\n"));
    out.push_str(".DESCRIPTION\n");
    out.push_str(&format!("    {purpose_line}\n"));
    out.push_str(".NOTES\n");
    out.push_str(&format!(
        "    Requestor: {} ({})\n",
        f.requestor_name, f.requestor_email
    ));
    out.push_str(&format!("    Purpose: {}\n", f.description));
    for (label, value) in [
        ("Display Name", &f.display_name),
        ("Service Type", &f.service_type),
        ("Cost Center", &f.cost_center),
    ] {
        if !value.trim().is_empty() {
            out.push_str(&format!("    {label}: {value}\n"));
        }
    }
    out.push_str("#>\n\n#Requires -Modules ActiveDirectory\n");
}
