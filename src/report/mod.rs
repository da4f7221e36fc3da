//! Plain-text hardening report.

use std::{fmt::Write as _, fs, path::Path};

use chrono::{DateTime, Local};
use tracing::info;

use crate::{
    error::{HardenError, Result},
    printer::rule,
    registry::Registry,
    session::Ledger,
};

/// Render the report body. Sections follow registry order.
pub fn render(ledger: &Ledger, registry: &Registry, generated_at: DateTime<Local>) -> String {
    let eq = rule('=');
    let dash = rule('-');
    let mut out = String::new();

    let _ = writeln!(out, "{eq}");
    let _ = writeln!(out, "LINUX SYSTEM HARDENING REPORT");
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "{eq}\n");

    for (module, result) in ledger.in_registry_order(registry) {
        let _ = writeln!(out, "\n{eq}");
        let _ = writeln!(out, "MODULE {}: {}", module.id, module.name);
        let _ = writeln!(out, "{eq}");
        let _ = writeln!(out, "Status: {}", result.status());
        let code = result.exit_code().map_or_else(|| "N/A".to_string(), |c| c.to_string());
        let _ = writeln!(out, "Return Code: {code}");
        if let Some(message) = result.message() {
            let _ = writeln!(out, "Message: {message}");
        }
        let _ = writeln!(out, "\nOUTPUT:");
        let _ = writeln!(out, "{dash}");
        if result.stdout().is_empty() {
            out.push_str("No output");
        } else {
            out.push_str(result.stdout());
        }
        out.push('\n');

        if !result.stderr().is_empty() {
            let _ = writeln!(out, "\nERRORS/WARNINGS:");
            let _ = writeln!(out, "{dash}");
            out.push_str(result.stderr());
            out.push('\n');
        }
    }
    out
}

/// Write the report to `dest`, replacing any earlier report from this session.
pub fn generate(ledger: &Ledger, registry: &Registry, dest: &Path) -> Result<()> {
    if let Some(dir) = dest.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(HardenError::Report)?;
    }
    let body = render(ledger, registry, Local::now());
    fs::write(dest, body).map_err(HardenError::Report)?;
    info!(path = %dest.display(), modules = ledger.len(), "report written");
    Ok(())
}
