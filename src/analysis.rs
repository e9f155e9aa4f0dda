use reqwest::Client;
use serde_json::{Value, json};
use std::fmt::Write as _;
use thiserror::Error;

use crate::image::EncodedImage;
use crate::profile::UserProfile;
use crate::report::HealthReport;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Cap on error bodies echoed into error values.
const MAX_ERROR_BODY: usize = 2048;

/// Configuration for the analysis request.
///
/// The endpoint is overridable so tests can point at a local mock server;
/// everything else defaults to the public Gemini API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    api_key: String,
    model: String,
    endpoint: String,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: API_BASE.to_string(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("analysis response carried no report text")]
    MissingCandidate,
    #[error("analysis response was not a valid report: {0}")]
    MalformedReport(#[from] serde_json::Error),
}

/// JSON schema the model is constrained to, mirroring [`HealthReport`].
fn report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "conditionName": { "type": "STRING" },
            "riskLevel": {
                "type": "STRING",
                "enum": ["Low", "Moderate", "High", "Critical"]
            },
            "description": { "type": "STRING" },
            "neuralBodyAnalysis": { "type": "STRING" },
            "healthIssues": { "type": "ARRAY", "items": { "type": "STRING" } },
            "precautions": { "type": "ARRAY", "items": { "type": "STRING" } },
            "dietMenu": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": { "type": "STRING" },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["item", "reason"]
                }
            }
        },
        "required": [
            "conditionName",
            "riskLevel",
            "description",
            "neuralBodyAnalysis",
            "healthIssues",
            "precautions",
            "dietMenu"
        ]
    })
}

/// Truncate an error body at a char boundary at or below `max` bytes.
fn cap_body(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut end = max;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

/// Screening instruction sent alongside the image.
fn build_prompt(profile: Option<&UserProfile>) -> String {
    let mut prompt = String::from(
        "You are a wellness screening assistant. Analyze the provided eye photograph for \
         visible indicators relevant to general health (redness, sclera discoloration, \
         vascular patterns, puffiness) and produce a structured screening report. This is a \
         non-diagnostic wellness estimate, not medical advice.",
    );

    if let Some(profile) = profile {
        prompt.push_str("\n\nSubject profile:");
        if let Some(name) = &profile.name {
            let _ = write!(prompt, "\n- Name: {name}");
        }
        if let Some(age) = &profile.age {
            let _ = write!(prompt, "\n- Age: {age}");
        }
        if let Some(gender) = profile.gender {
            let _ = write!(prompt, "\n- Gender: {}", gender.as_str());
        }
    }

    prompt
}

/// Submit one scan for analysis. Single request/response: no retry, no
/// streaming, no timeout beyond the client default.
pub async fn analyze(
    config: &ApiConfig,
    image: &EncodedImage,
    profile: Option<&UserProfile>,
) -> Result<HealthReport, AnalysisError> {
    let client = Client::new();
    let url = format!(
        "{}/models/{}:generateContent",
        config.endpoint, config.model
    );

    let body = json!({
        "contents": [{
            "parts": [
                {
                    "inline_data": {
                        "mime_type": image.mime_type(),
                        "data": image.base64_data(),
                    }
                },
                { "text": build_prompt(profile) }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": report_schema(),
        }
    });

    tracing::debug!(model = config.model(), "submitting scan for analysis");

    let response = client
        .post(&url)
        .header("x-goog-api-key", &config.api_key)
        .header("content-type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = cap_body(response.text().await.unwrap_or_default(), MAX_ERROR_BODY);
        return Err(AnalysisError::Api { status, body });
    }

    let data: Value = response.json().await?;
    let text = data["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or(AnalysisError::MissingCandidate)?;

    let report: HealthReport = serde_json::from_str(text)?;
    tracing::info!(
        condition = %report.condition_name,
        risk = report.risk_level.as_str(),
        "analysis complete"
    );
    Ok(report)
}
