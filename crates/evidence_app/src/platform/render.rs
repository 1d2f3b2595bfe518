//! Plain-text rendering of the view model.
use std::collections::HashMap;

use chrono::{DateTime, Local};
use evidence_core::{AppViewModel, DocumentId, JobStatus, UploadRowView, WorkspaceContext};

const MISSING: &str = "—";

/// Local wall-clock time of an RFC 3339 timestamp; unparsable values pass through.
pub fn format_timestamp(value: Option<&str>) -> String {
    match value {
        None => MISSING.to_string(),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|time| time.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

fn count(value: Option<u64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

pub fn render_row(row: &UploadRowView) -> String {
    let name = row.relative_path.as_deref().unwrap_or(&row.file_name);
    let mut line = format!(
        "[{:<10}] {}  job {} • updated {}",
        row.status_label,
        name,
        row.job_label,
        format_timestamp(row.updated_at.as_deref())
    );
    if let Some(details) = &row.details {
        line.push_str(&format!(
            "  documents {} • timeline {} • nodes {} • artifacts {}",
            count(details.documents),
            count(details.timeline_events),
            count(details.graph_nodes),
            details.forensic_artifacts
        ));
    }
    if let Some(error) = &row.error {
        line.push_str(&format!("  error: {error}"));
    } else if row.status == JobStatus::Succeeded {
        line.push_str("  pipeline complete");
    }
    line
}

pub fn render_summary(view: &AppViewModel) -> String {
    format!(
        "{} file(s): {} complete, {} failed, {} cancelled, {} in progress",
        view.uploads.len(),
        view.count(JobStatus::Succeeded),
        view.count(JobStatus::Failed),
        view.count(JobStatus::Cancelled),
        view.uploads.iter().filter(|row| row.monitoring).count()
    )
}

pub fn render_workspace(workspace: &WorkspaceContext) -> String {
    let case = match &workspace.active_case {
        Some(case) => match &case.name {
            Some(name) => format!("{} ({name})", case.id),
            None => case.id.clone(),
        },
        None => "none".to_string(),
    };
    let permissions = if workspace.permissions.is_empty() {
        "none".to_string()
    } else {
        workspace.permissions.join(", ")
    };
    format!(
        "case: {case}\npermissions: {permissions}\nmodule: {} / {}",
        workspace.halo.module, workspace.halo.submodule
    )
}

/// Prints each upload row again only when its line text changes.
#[derive(Debug, Default)]
pub struct RowPrinter {
    last: HashMap<DocumentId, String>,
}

impl RowPrinter {
    pub fn changed_lines(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();
        for row in &view.uploads {
            let line = render_row(row);
            if self.last.get(&row.document_id) != Some(&line) {
                self.last.insert(row.document_id.clone(), line.clone());
                lines.push(line);
            }
        }
        lines
    }
}
