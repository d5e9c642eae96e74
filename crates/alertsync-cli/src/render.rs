//! Console and log-file rendering
//!
//! Engine events stream to the console as they happen; the finished
//! `RunResult` is rendered once at the end. Every line printed for a run is
//! mirrored, uncolored, into the run log file.

use std::cell::RefCell;
use std::fs::File;
use std::io::Write;

use colored::Colorize;

use alertsync_core::{
    EngineEvent, EventSink, ItemDisposition, RunResult, RunStatus, WebhookReport,
};

/// Prints engine progress and mirrors it into the run log.
pub struct ConsoleSink {
    log: Option<RefCell<File>>,
}

impl ConsoleSink {
    pub fn new(log: Option<File>) -> Self {
        Self {
            log: log.map(RefCell::new),
        }
    }

    /// Append one uncolored line to the log file, if there is one.
    pub fn log_line(&self, line: &str) {
        if let Some(log) = &self.log {
            // A log write failure must not abort the run.
            let _ = writeln!(log.borrow_mut(), "{}", line);
        }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: &EngineEvent) {
        match event {
            EngineEvent::RunStarted { dry_run } => {
                let mode = if *dry_run { " (dry run)" } else { "" };
                println!("{}{}", "Starting reconciliation".bold(), mode.yellow());
                self.log_line(&format!("Starting reconciliation{}", mode));
            }
            EngineEvent::ScopeResolved {
                selected,
                unresolved,
            } => {
                println!("  Scope: {} network(s) selected", selected);
                self.log_line(&format!(
                    "Scope: {} network(s) selected, {} unresolved",
                    selected, unresolved
                ));
            }
            EngineEvent::NetworkStarted { org, network } => {
                println!("\n{} {} / {}", "→".blue(), org.bold(), network.bold());
                self.log_line(&format!("Network: {} / {}", org, network));
            }
            EngineEvent::WebhookResolved { name, outcome, .. } => {
                println!("  webhook {}: {}", name.cyan(), outcome);
                self.log_line(&format!("  webhook {}: {}", name, outcome));
            }
            EngineEvent::ItemApplied { alert_type, .. } => {
                println!("  {} {}", "✓".green(), alert_type);
                self.log_line(&format!("  applied {}", alert_type));
            }
            EngineEvent::ItemPreviewed { alert_type, .. } => {
                println!("  {} {} (preview)", "~".yellow(), alert_type);
                self.log_line(&format!("  would apply {}", alert_type));
            }
            EngineEvent::ItemFailed {
                alert_type, error, ..
            } => {
                println!("  {} {}: {}", "✗".red(), alert_type, error);
                self.log_line(&format!("  failed {}: {}", alert_type, error));
            }
            EngineEvent::NetworkFailed { error, .. } => {
                println!("  {} {}", "✗".red(), error);
                self.log_line(&format!("  error: {}", error));
            }
            EngineEvent::RunCancelled => {
                println!("{}", "Run cancelled".yellow().bold());
                self.log_line("Run cancelled");
            }
            EngineEvent::DiffComputed { .. }
            | EngineEvent::NetworkFinished { .. }
            | EngineEvent::RunFinished { .. } => {}
        }
    }
}

/// Plain-text report lines, suitable for the run log.
pub fn report_lines(result: &RunResult) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(String::new());
    lines.push("Run report".to_string());
    lines.push("==========".to_string());

    for miss in &result.unresolved_scope {
        match &miss.org {
            Some(org) => lines.push(format!(
                "unresolved: network '{}' in organization '{}'",
                miss.selector, org
            )),
            None => lines.push(format!("unresolved: organization '{}'", miss.selector)),
        }
    }
    for error in &result.errors {
        lines.push(format!("error: {}", error));
    }

    for network in &result.networks {
        lines.push(format!(
            "{} / {}:",
            network.org_name, network.network_name
        ));
        if let Some(webhook) = &network.webhook {
            lines.push(format!("  webhook: {}", webhook_line(webhook)));
        }
        for item in &network.items {
            lines.push(format!("  {}: {}", item.alert_type, disposition_line(item)));
        }
        for error in &network.errors {
            lines.push(format!("  error: {}", error));
        }
    }

    let summary = result.summary();
    lines.push(String::new());
    lines.push(format!(
        "{}: {} applied, {} previewed, {} unchanged, {} invalid, {} failed, {} error(s)",
        match result.status {
            RunStatus::Completed => "Completed",
            RunStatus::Cancelled => "Cancelled",
        },
        summary.applied,
        summary.previewed,
        summary.unchanged,
        summary.invalid,
        summary.failed,
        summary.network_errors + summary.unresolved_scope,
    ));
    lines
}

/// Colored end-of-run summary for the console.
pub fn print_summary(result: &RunResult) {
    let summary = result.summary();
    println!();
    if summary.is_noop() {
        println!("{}", "Everything up to date, nothing to do".green());
        return;
    }

    let status = match result.status {
        RunStatus::Completed => "Completed".green().bold(),
        RunStatus::Cancelled => "Cancelled".yellow().bold(),
    };
    println!(
        "{}: {} applied, {} previewed, {} unchanged",
        status, summary.applied, summary.previewed, summary.unchanged
    );
    if summary.invalid > 0 {
        println!("{}: {} invalid item(s) skipped", "warning".yellow(), summary.invalid);
    }
    let errors = summary.failed + summary.network_errors + summary.unresolved_scope;
    if errors > 0 {
        println!("{}: {} failure(s), see report above", "warning".red(), errors);
        for network in &result.networks {
            for error in &network.errors {
                println!("  {} {}: {}", "✗".red(), network.network_name, error);
            }
        }
        for error in &result.errors {
            println!("  {} {}", "✗".red(), error);
        }
    }
}

fn webhook_line(report: &WebhookReport) -> String {
    match report {
        WebhookReport::Existing { id } => format!("existing ({})", id),
        WebhookReport::Created { id } => format!("created ({})", id),
        WebhookReport::WouldCreate => "would create".to_string(),
        WebhookReport::Failed { error } => format!("failed: {}", error),
    }
}

fn disposition_line(item: &alertsync_core::ItemOutcome) -> String {
    match &item.disposition {
        ItemDisposition::Applied => "applied".to_string(),
        ItemDisposition::Previewed => "would apply".to_string(),
        ItemDisposition::Unchanged => "unchanged".to_string(),
        ItemDisposition::Skipped => match &item.reason {
            Some(reason) => format!("skipped ({})", reason),
            None => "skipped".to_string(),
        },
        ItemDisposition::Failed { error } => format!("failed: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertsync_core::{ActionKind, ItemOutcome, NetworkOutcome};

    #[test]
    fn test_report_lines_cover_network_and_items() {
        let result = RunResult {
            status: RunStatus::Completed,
            networks: vec![NetworkOutcome {
                org_id: "O1".into(),
                org_name: "Acme".into(),
                network_id: "N1".into(),
                network_name: "Branch-01".into(),
                webhook: Some(WebhookReport::Created { id: "H_1".into() }),
                items: vec![ItemOutcome {
                    alert_type: "gatewayDown".into(),
                    action: ActionKind::Create,
                    changes: Vec::new(),
                    reason: None,
                    disposition: ItemDisposition::Applied,
                }],
                errors: Vec::new(),
            }],
            unresolved_scope: Vec::new(),
            errors: Vec::new(),
        };

        let lines = report_lines(&result);
        let text = lines.join("\n");
        assert!(text.contains("Acme / Branch-01:"));
        assert!(text.contains("webhook: created (H_1)"));
        assert!(text.contains("gatewayDown: applied"));
        assert!(text.contains("1 applied"));
    }

    #[test]
    fn test_report_lines_include_scope_misses() {
        let result = RunResult {
            status: RunStatus::Completed,
            networks: Vec::new(),
            unresolved_scope: vec![alertsync_core::ScopeMiss {
                selector: "Ghost".into(),
                org: Some("Acme".into()),
            }],
            errors: Vec::new(),
        };

        let text = report_lines(&result).join("\n");
        assert!(text.contains("unresolved: network 'Ghost' in organization 'Acme'"));
    }
}
