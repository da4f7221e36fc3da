//! Per-session state: the results ledger and the fixed report destination.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use crate::{
    execution::ExecutionResult,
    registry::{ModuleDescriptor, Registry},
};

/// Latest result per module id. Later runs replace earlier ones.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    results: HashMap<String, ExecutionResult>,
}

impl Ledger {
    pub fn record(&mut self, module_id: &str, result: ExecutionResult) {
        self.results.insert(module_id.to_string(), result);
    }

    pub fn get(&self, module_id: &str) -> Option<&ExecutionResult> {
        self.results.get(module_id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Entries in registry order, skipping modules that have not run.
    pub fn in_registry_order<'a>(
        &'a self,
        registry: &'a Registry,
    ) -> impl Iterator<Item = (&'a ModuleDescriptor, &'a ExecutionResult)> + 'a {
        registry
            .iter()
            .filter_map(move |m| self.results.get(&m.id).map(|r| (m, r)))
    }
}

#[derive(Debug)]
pub struct Session {
    started_at: DateTime<Local>,
    report_path: PathBuf,
    ledger: Ledger,
}

impl Session {
    /// Start a session now; the report file name is derived from this instant.
    pub fn start(report_dir: &Path) -> Self {
        Self::started_at(report_dir, Local::now())
    }

    pub fn started_at(report_dir: &Path, started_at: DateTime<Local>) -> Self {
        let name = format!("hardening_report_{}.txt", started_at.format("%Y%m%d_%H%M%S"));
        Self {
            started_at,
            report_path: report_dir.join(name),
            ledger: Ledger::default(),
        }
    }

    pub fn started(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
}
