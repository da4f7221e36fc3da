//! Run coordination: drives the runner over one or all modules and records results.

use std::path::{Path, PathBuf};

use tracing::{info, info_span, Instrument};

use crate::{
    error::{HardenError, Result},
    execution::{ExecutionResult, Mode, Status},
    printer::{Level, StatusSink},
    process::ProcessRunner,
    registry::{ModuleDescriptor, Registry},
    report,
    session::Session,
};

pub struct Coordinator<'a> {
    registry: &'a Registry,
    runner: &'a ProcessRunner,
    script_dir: PathBuf,
}

impl<'a> Coordinator<'a> {
    pub fn new(registry: &'a Registry, runner: &'a ProcessRunner, script_dir: impl Into<PathBuf>) -> Self {
        Self { registry, runner, script_dir: script_dir.into() }
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    /// Run every module in registry order, then write the report once.
    ///
    /// A failing module never stops the pass.
    pub async fn run_all(&self, session: &mut Session, scan_only: bool, sink: &mut dyn StatusSink) -> Result<()> {
        let mode = Mode::from_scan_only(scan_only);
        let label = if scan_only { "SCAN" } else { "HARDENING" };
        sink.plain(&format!("\nStarting {label} process for all modules..."));
        info!(%mode, modules = self.registry.len(), "starting full pass");

        for module in self.registry.iter() {
            let result = self.run_module(module, mode, sink).await;
            match result.status() {
                Status::Success => sink.status(Level::Success, "Module completed successfully"),
                Status::Warning => sink.status(Level::Warning, "Module completed with warnings"),
                Status::Error => sink.status(
                    Level::Error,
                    &format!("Module failed: {}", result.message().unwrap_or("Unknown error")),
                ),
            }
            session.ledger_mut().record(&module.id, result);
        }

        self.write_report(session, sink)
    }

    /// Run a single module and echo its captured output, then write the report.
    ///
    /// An unknown id is rejected before anything runs or is recorded.
    pub async fn run_one(
        &self,
        session: &mut Session,
        module_id: &str,
        scan_only: bool,
        sink: &mut dyn StatusSink,
    ) -> Result<()> {
        let module = self
            .registry
            .get(module_id)
            .ok_or_else(|| HardenError::InvalidSelection(module_id.to_string()))?;

        let result = self.run_module(module, Mode::from_scan_only(scan_only), sink).await;
        if !result.stdout().is_empty() {
            sink.plain(result.stdout());
        }
        if !result.stderr().is_empty() {
            sink.status(Level::Warning, "Warnings/Errors:");
            sink.plain(result.stderr());
        }
        if let Some(message) = result.message() {
            sink.status(Level::Error, &format!("Module failed: {message}"));
        }
        session.ledger_mut().record(&module.id, result);

        self.write_report(session, sink)
    }

    async fn run_module(&self, module: &ModuleDescriptor, mode: Mode, sink: &mut dyn StatusSink) -> ExecutionResult {
        sink.heading(&format!("MODULE {}: {}", module.id, module.name));
        let script = self.script_path(module);
        sink.status(Level::Info, &format!("Running {} in {mode} mode...", module.script));

        let result = self
            .runner
            .execute(&script, mode)
            .instrument(info_span!("module", id = %module.id))
            .await;
        info!(module_id = %module.id, status = %result.status(), exit_code = ?result.exit_code(), "module finished");
        result
    }

    fn script_path(&self, module: &ModuleDescriptor) -> PathBuf {
        let script = Path::new(&module.script);
        if script.is_absolute() {
            script.to_path_buf()
        } else {
            self.script_dir.join(script)
        }
    }

    fn write_report(&self, session: &Session, sink: &mut dyn StatusSink) -> Result<()> {
        let path = session.report_path();
        sink.status(Level::Info, &format!("Generating report: {}", path.display()));
        report::generate(session.ledger(), self.registry, path)?;
        sink.status(Level::Success, &format!("Report saved to: {}", path.display()));
        Ok(())
    }
}
