//! Report wire-format tests.

use iriscan::report::{HealthReport, RiskLevel};

#[test]
fn deserializes_camel_case_wire_names() {
    let json = r#"{
        "conditionName": "Ocular Hypertension Indicators",
        "riskLevel": "Moderate",
        "description": "Elevated vascular prominence.",
        "neuralBodyAnalysis": "Patterns suggest mild systemic strain.",
        "healthIssues": ["Eye strain", "Possible hypertension"],
        "precautions": ["Consult an ophthalmologist"],
        "dietMenu": [
            { "item": "Leafy greens", "reason": "Lutein intake" }
        ]
    }"#;

    let report: HealthReport = serde_json::from_str(json).unwrap();
    assert_eq!(report.condition_name, "Ocular Hypertension Indicators");
    assert_eq!(report.risk_level, RiskLevel::Moderate);
    assert_eq!(report.health_issues.len(), 2);
    assert_eq!(report.diet_menu[0].item, "Leafy greens");
}

#[test]
fn unrecognized_risk_level_degrades_to_unknown() {
    let json = r#"{
        "conditionName": "X",
        "riskLevel": "Elevated",
        "description": "",
        "neuralBodyAnalysis": ""
    }"#;

    let report: HealthReport = serde_json::from_str(json).unwrap();
    assert_eq!(report.risk_level, RiskLevel::Unknown);
}

#[test]
fn sequence_fields_default_to_empty() {
    let json = r#"{
        "conditionName": "X",
        "riskLevel": "High",
        "description": "d",
        "neuralBodyAnalysis": "n"
    }"#;

    let report: HealthReport = serde_json::from_str(json).unwrap();
    assert!(report.health_issues.is_empty());
    assert!(report.precautions.is_empty());
    assert!(report.diet_menu.is_empty());
}

#[test]
fn serialization_round_trips_field_names() {
    let report = HealthReport::unavailable("offline");
    let value = serde_json::to_value(&report).unwrap();
    assert!(value.get("conditionName").is_some());
    assert!(value.get("neuralBodyAnalysis").is_some());
    assert_eq!(value["riskLevel"], "Unknown");
}
