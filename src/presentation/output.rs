//! Output Rendering
//!
//! Text renderers return strings so the CLI decides where they go.
//! JSON output goes through `serde`; `LoadReport` holds live library
//! handles and has its own serializable view.

use std::fmt::Write as _;

use serde::Serialize;

use crate::application::{CommitReport, LoadReport, RebuildPlan, SkipReason, WatchEvent};
use crate::domain::entities::LoadedAssembly;
use crate::domain::ports::StoredAssembly;

use super::factory::ProbeReport;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Icons for output rendering
struct Icons {
    check: &'static str,
    cross: &'static str,
    write: &'static str,
    skip: &'static str,
    trash: &'static str,
    warn: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            write: "→",
            skip: "○",
            trash: "🗑",
            warn: "⚠",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            write: "->",
            skip: "[ ]",
            trash: "[DEL]",
            warn: "[!]",
        }
    }
}

/// Text renderer for command results
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    /// Whether to use unicode
    pub unicode: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { unicode: true }
    }
}

impl TextRenderer {
    pub fn ascii() -> Self {
        Self { unicode: false }
    }

    fn icons(&self) -> Icons {
        if self.unicode {
            Icons::unicode()
        } else {
            Icons::ascii()
        }
    }

    pub fn render_probe(&self, reports: &[ProbeReport]) -> String {
        let icons = self.icons();
        let mut out = String::new();
        if reports.is_empty() {
            out.push_str("No modules found\n");
            return out;
        }
        for report in reports {
            let _ = writeln!(out, "{}", report.module.id);
            if report.claims.is_empty() {
                let _ = writeln!(out, "  {} no loader claims this module", icons.skip);
            }
            for claim in &report.claims {
                let _ = writeln!(
                    out,
                    "  {} {} (order {}) {} modified {}",
                    icons.check,
                    claim.loader.name,
                    claim.loader.order,
                    claim.virtual_path,
                    claim.last_write_time_utc.to_rfc3339()
                );
            }
            for reference in &report.references {
                let _ = writeln!(
                    out,
                    "    + {} {}",
                    reference.name,
                    reference.virtual_path.as_deref().unwrap_or("")
                );
            }
        }
        out
    }

    pub fn render_plan(&self, plan: &RebuildPlan) -> String {
        let icons = self.icons();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Plan: {} selected, {} skipped",
            plan.selections.len(),
            plan.skipped.len()
        );
        for selection in &plan.selections {
            let _ = writeln!(
                out,
                "  {} {} <- {}",
                icons.check,
                selection.module_id(),
                selection.loader_name()
            );
            for reference in &selection.references {
                let _ = writeln!(out, "      + {}", reference.name);
            }
        }
        for skipped in &plan.skipped {
            let reason = match skipped.reason {
                SkipReason::Disabled => "disabled",
                SkipReason::NoLoader => "no loader",
                SkipReason::IncompatibleReferences => "incompatible references",
            };
            let _ = writeln!(out, "  {} {} ({reason})", icons.skip, skipped.id);
        }
        for name in plan.context.deletes() {
            let _ = writeln!(out, "  {} delete {name}", icons.trash);
        }
        for (name, source) in plan.context.copies() {
            let _ = writeln!(out, "  {} copy {name} from {}", icons.write, source.display());
        }
        for reason in plan.context.restart_reasons() {
            let _ = writeln!(out, "  {} restart: {reason}", icons.warn);
        }
        if plan.is_noop() {
            out.push_str("Probing folder is up to date\n");
        }
        out
    }

    pub fn render_commit(&self, report: &CommitReport) -> String {
        let icons = self.icons();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} Committed: {} copied, {} deleted, {} recorded",
            icons.check,
            report.copied.len(),
            report.deleted.len(),
            report.dependencies_stored
        );
        if report.restart_required {
            let _ = writeln!(out, "{} Restart required:", icons.warn);
            for reason in &report.restart_reasons {
                let _ = writeln!(out, "  - {reason}");
            }
        }
        out
    }

    pub fn render_load(&self, report: &LoadReport) -> String {
        let icons = self.icons();
        let mut out = String::new();
        for entry in &report.extensions {
            let _ = writeln!(out, "{} {}", icons.check, entry.assembly.full_name());
            for exported in &entry.exported_types {
                let _ = writeln!(out, "    {exported}");
            }
        }
        for reference in &report.references {
            let _ = writeln!(out, "  + {}", reference.full_name());
        }
        for missing in &report.missing {
            let _ = writeln!(out, "{} {missing} (not in probing folder)", icons.cross);
        }
        let _ = writeln!(
            out,
            "Loaded {} modules, {} references",
            report.extensions.len(),
            report.references.len()
        );
        out
    }

    pub fn render_store(&self, assemblies: &[StoredAssembly]) -> String {
        let mut out = String::new();
        if assemblies.is_empty() {
            out.push_str("Probing folder is empty\n");
            return out;
        }
        let width = assemblies.iter().map(|a| a.name.len()).max().unwrap_or(0);
        for assembly in assemblies {
            let _ = writeln!(
                out,
                "{:<width$}  {:>10}  {}",
                assembly.name,
                assembly.size,
                assembly.last_write_time_utc.to_rfc3339()
            );
        }
        out
    }

    pub fn render_watch_event(&self, event: &WatchEvent) -> String {
        let icons = self.icons();
        match event {
            WatchEvent::WatchStarted { modules, watching } => format!(
                "Watching {modules} modules ({} paths). Press Ctrl+C to stop.",
                watching.len()
            ),
            WatchEvent::PathChanged { path } => format!("{} {path}", icons.write),
            WatchEvent::RebuildStarted => "Rebuilding...".to_string(),
            WatchEvent::RebuildComplete {
                copied,
                deleted,
                loaded,
            } => format!(
                "{} Rebuilt: {copied} copied, {deleted} deleted, {loaded} loaded",
                icons.check
            ),
            WatchEvent::RestartRequired { reasons } => {
                let mut out = format!("{} Restart required:", icons.warn);
                for reason in reasons {
                    out.push_str(&format!("\n  - {reason}"));
                }
                out
            }
            WatchEvent::Error { message } => format!("{} {message}", icons.cross),
            WatchEvent::Shutdown => "Stopped".to_string(),
        }
    }
}

/// Serializable view of a loaded binary
#[derive(Debug, Clone, Serialize)]
pub struct LoadedAssemblyView {
    pub name: String,
    pub identity: String,
    pub location: String,
    pub exported_types: Vec<String>,
}

impl From<&LoadedAssembly> for LoadedAssemblyView {
    fn from(assembly: &LoadedAssembly) -> Self {
        Self {
            name: assembly.name.clone(),
            identity: assembly.full_name(),
            location: assembly.location.display().to_string(),
            exported_types: assembly.exported_types.clone(),
        }
    }
}

/// Serializable view of a `LoadReport`
#[derive(Debug, Clone, Serialize)]
pub struct LoadReportView {
    pub extensions: Vec<LoadedAssemblyView>,
    pub references: Vec<LoadedAssemblyView>,
    pub missing: Vec<String>,
}

impl From<&LoadReport> for LoadReportView {
    fn from(report: &LoadReport) -> Self {
        Self {
            extensions: report
                .extensions
                .iter()
                .map(|e| LoadedAssemblyView {
                    exported_types: e.exported_types.clone(),
                    ..LoadedAssemblyView::from(&e.assembly)
                })
                .collect(),
            references: report.references.iter().map(LoadedAssemblyView::from).collect(),
            missing: report.missing.clone(),
        }
    }
}

/// One JSON document for a command result, tagged with the command name
pub fn command_json<T: Serialize>(command: &str, body: &T) -> String {
    let mut value = serde_json::to_value(body).unwrap_or_else(|e| {
        serde_json::json!({ "error": e.to_string() })
    });
    match value.as_object_mut() {
        Some(obj) => {
            obj.insert("command".to_string(), serde_json::json!(command));
        }
        None => {
            value = serde_json::json!({ "command": command, "result": value });
        }
    }
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}
