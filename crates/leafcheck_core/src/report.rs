//! Diagnosis report returned by the analysis service.
//!
//! Field names follow the service's JSON shape (camelCase), so these types
//! deserialize directly from the model's structured output.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    Healthy,
    Diseased,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentStep {
    pub step: u32,
    pub action: String,
    pub timing: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub name: String,
    pub severity: Severity,
    /// Percentage-like label, kept verbatim (e.g. "85%").
    pub confidence: String,
    pub explanation: String,
    #[serde(default)]
    pub treatment_plan: Vec<TreatmentStep>,
}

impl Issue {
    /// True when the plan's step numbers are positive and strictly ascending.
    pub fn has_ordered_plan(&self) -> bool {
        let mut previous = 0;
        for step in &self.treatment_plan {
            if step.step <= previous {
                return false;
            }
            previous = step.step;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_status: OverallStatus,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub safety_tips: Vec<String>,
    pub follow_up: String,
}

impl AnalysisResult {
    /// Names of issues whose treatment plan is not in ascending step order.
    ///
    /// Responses are accepted regardless; callers decide whether to warn.
    pub fn plan_order_violations(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|issue| !issue.has_ordered_plan())
            .map(|issue| issue.name.as_str())
            .collect()
    }

    /// Highest severity across all issues, if any issue is present.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|issue| issue.severity).max()
    }
}
