use cpr_core::domain::ReportData;
use cpr_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ReportGenerator;
use crate::gemini::GeminiClient;
use crate::guardrails::parse_report_json;
use crate::report::prompts::{incident_report_prompt, report_schema};
use crate::report::ReportRequest;

#[derive(Debug, Clone)]
pub struct GeminiReportGenerator {
    client: GeminiClient,
}

impl GeminiReportGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GeminiClient {
        &self.client
    }
}

#[derive(Debug, Clone, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, concatenated across parts.
    fn first_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

pub(crate) fn build_request_body(prompt: &str) -> Result<Value, AppError> {
    let req = GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: report_schema(),
        },
    };
    serde_json::to_value(req).map_err(|e| {
        AppError::new(codes::AI_REQUEST_FAILED, "Failed to encode report request")
            .with_details(e.to_string())
    })
}

impl ReportGenerator for GeminiReportGenerator {
    fn generate(&self, request: &ReportRequest) -> Result<ReportData, AppError> {
        let api_key = self.client.api_key()?;
        let prompt = incident_report_prompt(request);
        let body = build_request_body(&prompt)?;

        let resp = ureq::post(&self.client.generate_content_url())
            .timeout(self.client.timeout())
            .set("x-goog-api-key", api_key)
            .send_json(body);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: GenerateContentResponse = r.into_json().map_err(|e| {
                    AppError::new(codes::AI_RESPONSE_MALFORMED, "Failed to decode report response")
                        .with_details(e.to_string())
                })?;
                let text = v.first_text().ok_or_else(|| {
                    AppError::new(codes::AI_RESPONSE_MALFORMED, "Report response had no text")
                })?;
                parse_report_json(&text)
            }
            Ok(r) => Err(
                AppError::new(codes::AI_REQUEST_FAILED, "Report request failed")
                    .with_details(format!("status={}", r.status())),
            ),
            Err(ureq::Error::Status(status, _)) => Err(AppError::new(
                codes::AI_REQUEST_FAILED,
                "Report request failed",
            )
            .with_details(format!("status={status}"))
            .with_retryable(status == 429 || status >= 500)),
            Err(e) => Err(
                AppError::new(codes::AI_REQUEST_FAILED, "Failed to call report endpoint")
                    .with_details(e.to_string())
                    .with_retryable(true),
            ),
        }
    }
}
