use std::fmt::Write;

use leafcheck_core::{
    AnalysisResult, AppState, AppViewModel, ItemStatus, OverallStatus, Severity, UploadItem,
};
use serde_json::{json, Value};

pub fn status_line(view: &AppViewModel) -> String {
    format!(
        "Items: {} | analyzing {} | done {} | failed {}",
        view.items.len(),
        view.loading_count,
        view.succeeded_count,
        view.failed_count
    )
}

/// Full text report: notices, one block per item in display order.
pub fn render_text(state: &AppState) -> String {
    let view = state.view();
    let mut out = String::new();

    for notice in &view.notices {
        let _ = writeln!(out, "! {notice}");
    }
    if !view.notices.is_empty() {
        out.push('\n');
    }

    for item in state.store().items() {
        let marker = if state.store().selected_id() == Some(item.id) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{marker}[#{id}] {status} {name} ({mime})",
            id = item.id,
            status = status_label(item.status),
            name = item.source.name,
            mime = item.mime_type
        );
        render_item_body(&mut out, item);
        out.push('\n');
    }

    out.push_str(&status_line(&view));
    out.push('\n');
    out
}

fn render_item_body(out: &mut String, item: &UploadItem) {
    match (&item.result, &item.error_message) {
        (Some(result), _) => render_result(out, result),
        (None, Some(message)) => {
            let _ = writeln!(out, "    Error: {message}");
        }
        (None, None) => {}
    }
}

fn render_result(out: &mut String, result: &AnalysisResult) {
    match result.worst_severity() {
        Some(severity) => {
            let _ = writeln!(
                out,
                "    Status: {} (highest severity: {})",
                overall_label(result.overall_status),
                severity_label(severity)
            );
        }
        None => {
            let _ = writeln!(out, "    Status: {}", overall_label(result.overall_status));
        }
    }

    if !result.issues.is_empty() {
        let _ = writeln!(out, "    Issues:");
    }
    for issue in &result.issues {
        let _ = writeln!(
            out,
            "      - {} [{} severity, confidence {}]",
            issue.name,
            severity_label(issue.severity),
            issue.confidence
        );
        if !issue.explanation.is_empty() {
            let _ = writeln!(out, "        {}", issue.explanation);
        }
        if !issue.treatment_plan.is_empty() {
            let _ = writeln!(out, "        Treatment plan:");
        }
        // Producer order, not re-sorted.
        for step in &issue.treatment_plan {
            let _ = writeln!(
                out,
                "          {}. {} ({}): {}",
                step.step, step.action, step.timing, step.details
            );
        }
    }

    if !result.safety_tips.is_empty() {
        let _ = writeln!(out, "    Safety tips:");
        for tip in &result.safety_tips {
            let _ = writeln!(out, "      - {tip}");
        }
    }
    if !result.follow_up.is_empty() {
        let _ = writeln!(out, "    Follow-up: {}", result.follow_up);
    }
}

pub fn render_json(state: &AppState) -> Value {
    let items: Vec<Value> = state
        .store()
        .items()
        .iter()
        .map(|item| {
            json!({
                "id": item.id,
                "name": item.source.name,
                "preview": item.preview,
                "mimeType": item.mime_type,
                "status": status_label(item.status),
                "result": item.result,
                "error": item.error_message,
            })
        })
        .collect();
    let notices: Vec<&str> = state.notices().iter().map(|n| n.text.as_str()).collect();
    json!({
        "items": items,
        "selected": state.store().selected_id(),
        "notices": notices,
    })
}

fn status_label(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Pending => "PENDING",
        ItemStatus::Loading => "LOADING",
        ItemStatus::Succeeded => "OK",
        ItemStatus::Failed => "ERR",
    }
}

fn overall_label(status: OverallStatus) -> &'static str {
    match status {
        OverallStatus::Healthy => "Healthy",
        OverallStatus::Diseased => "Diseased",
        OverallStatus::Unknown => "Unknown",
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::None => "no",
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use leafcheck_core::{update, IncomingFile, Issue, Msg, TreatmentStep};
    use pretty_assertions::assert_eq;

    fn state_with_results() -> AppState {
        let files = vec![
            IncomingFile::new("leaf.jpg", "image/jpeg", Bytes::from_static(b"j")),
            IncomingFile::new("scan.pdf", "application/pdf", Bytes::from_static(b"p")),
            IncomingFile::new("notes.txt", "text/plain", Bytes::from_static(b"t")),
        ];
        let (state, _) = update(AppState::new(), Msg::FilesAdded(files));
        let (state, _) = update(
            state,
            Msg::AnalysisSucceeded {
                item_id: 1,
                result: AnalysisResult {
                    overall_status: OverallStatus::Diseased,
                    issues: vec![Issue {
                        name: "Leaf spot".to_string(),
                        severity: Severity::Low,
                        confidence: "70%".to_string(),
                        explanation: "Small brown spots.".to_string(),
                        treatment_plan: vec![
                            TreatmentStep {
                                step: 2,
                                action: "Spray".to_string(),
                                timing: "Weekly".to_string(),
                                details: "Neem oil.".to_string(),
                            },
                            TreatmentStep {
                                step: 1,
                                action: "Prune".to_string(),
                                timing: "Now".to_string(),
                                details: "Remove spotted leaves.".to_string(),
                            },
                        ],
                    }],
                    safety_tips: vec!["Wash hands".to_string()],
                    follow_up: "Look again in a week.".to_string(),
                },
            },
        );
        let (state, _) = update(
            state,
            Msg::AnalysisFailed {
                item_id: 2,
                message: "Analysis failed: boom".to_string(),
            },
        );
        state
    }

    #[test]
    fn text_report_lists_items_in_order() {
        let text = render_text(&state_with_results());
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("! notes.txt is not a supported file type"));
        assert_eq!(lines[2], "*[#1] OK leaf.jpg (image/jpeg)");
        assert_eq!(lines[3], "    Status: Diseased (highest severity: low)");
        assert!(text.contains("      - Leaf spot [low severity, confidence 70%]"));
        assert!(text.contains(" [#2] ERR scan.pdf (application/pdf)\n    Error: Analysis failed: boom"));
        assert!(text.ends_with("Items: 2 | analyzing 0 | done 1 | failed 1\n"));
    }

    #[test]
    fn treatment_steps_keep_producer_order() {
        let text = render_text(&state_with_results());
        let spray = text.find("2. Spray").unwrap();
        let prune = text.find("1. Prune").unwrap();
        assert!(spray < prune);
    }

    #[test]
    fn json_output_uses_wire_field_names() {
        let value = render_json(&state_with_results());

        assert_eq!(value["selected"], 1);
        assert_eq!(value["items"][0]["status"], "OK");
        assert_eq!(value["items"][0]["result"]["overallStatus"], "Diseased");
        assert_eq!(
            value["items"][0]["result"]["issues"][0]["treatmentPlan"][0]["step"],
            2
        );
        assert_eq!(value["items"][1]["error"], "Analysis failed: boom");
        assert_eq!(value["items"][1]["result"], Value::Null);
        assert_eq!(value["notices"].as_array().unwrap().len(), 1);
    }
}
