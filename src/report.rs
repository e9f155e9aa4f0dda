use serde::{Deserialize, Serialize};

/// Severity assigned by the remote analysis.
///
/// `Unknown` is never produced by a healthy response: it is the sentinel
/// carried by the fallback report and the catch-all for wire values we do
/// not recognize, so a misbehaving remote degrades instead of failing the
/// whole report parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
    #[serde(other)]
    Unknown,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
            RiskLevel::Unknown => "Unknown",
        }
    }

    /// Whether this is one of the four levels a successful analysis may
    /// report.
    pub fn is_diagnostic(self) -> bool {
        self != RiskLevel::Unknown
    }
}

/// One recommended dietary item with the reasoning behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietItem {
    pub item: String,
    pub reason: String,
}

/// Structured result of one eye-scan analysis.
///
/// Field names mirror the remote JSON (camelCase on the wire). Immutable
/// once created; the controller only ever replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub condition_name: String,
    pub risk_level: RiskLevel,
    pub description: String,
    pub neural_body_analysis: String,
    #[serde(default)]
    pub health_issues: Vec<String>,
    #[serde(default)]
    pub precautions: Vec<String>,
    #[serde(default)]
    pub diet_menu: Vec<DietItem>,
}

/// Condition name used when analysis could not be performed.
pub const ANALYSIS_ERROR_CONDITION: &str = "Analysis Error";

impl HealthReport {
    /// Fallback report substituted when the analysis call fails.
    ///
    /// Keeps the UI flow total: the Results view always has a report to
    /// render, clearly marked rather than crashed or stuck.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            condition_name: ANALYSIS_ERROR_CONDITION.to_string(),
            risk_level: RiskLevel::Unknown,
            description: reason.into(),
            neural_body_analysis: "The scan could not be analyzed. This result carries no \
                                   diagnostic weight."
                .to_string(),
            health_issues: Vec::new(),
            precautions: vec![
                "Check your network connection and API key, then scan again.".to_string(),
            ],
            diet_menu: Vec::new(),
        }
    }

    /// Whether this report came from the fallback path rather than the
    /// remote analysis.
    pub fn is_fallback(&self) -> bool {
        self.risk_level == RiskLevel::Unknown && self.condition_name == ANALYSIS_ERROR_CONDITION
    }
}
