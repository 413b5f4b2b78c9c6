use crate::results::ProfileSnapshot;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Network(err.to_string())
    }
}

/// Coaching advice returned for a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachingReport {
    #[serde(default)]
    pub immediate_steps: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// The service needs more input from the user before it can coach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireRequest {
    pub questionnaire_required: bool,
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Questionnaire(QuestionnaireRequest),
    Coaching(CoachingReport),
}

/// Fields that identify a body as one of the known responses
const RESPONSE_FIELDS: [&str; 3] = ["questionnaire_required", "immediate_steps", "suggestions"];

fn decode_error(err: serde_json::Error) -> AnalysisError {
    AnalysisError::Decode(err.to_string())
}

impl AnalysisResponse {
    /// Classify a JSON body. A `questionnaire_required: false` marker is
    /// treated as a coaching report.
    ///
    /// Objects carrying none of the known fields (e.g. `{}` or a bare
    /// `{"detail": ...}`) are rejected rather than read as an empty report.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body).map_err(decode_error)?;
        let recognized = value
            .as_object()
            .is_some_and(|fields| RESPONSE_FIELDS.iter().any(|f| fields.contains_key(*f)));
        if !recognized {
            return Err(AnalysisError::Decode(format!(
                "expected a questionnaire or coaching report, got {}",
                value
            )));
        }

        let response: Self = serde_json::from_value(value.clone()).map_err(decode_error)?;
        match response {
            AnalysisResponse::Questionnaire(request) if !request.questionnaire_required => {
                let report: CoachingReport = serde_json::from_value(value).map_err(decode_error)?;
                Ok(AnalysisResponse::Coaching(report))
            }
            other => Ok(other),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Prefer the service's `detail` field; fall back to the raw body
fn error_message(body: String) -> String {
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(err) => err.detail,
        Err(_) if body.trim().is_empty() => "Analysis failed".to_string(),
        Err(_) => body,
    }
}

/// HTTP client for the remote profile analysis service
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl AnalysisClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()).map(String::from),
        })
    }

    /// Submit a snapshot for analysis
    pub async fn analyze(&self, snapshot: &ProfileSnapshot) -> Result<AnalysisResponse> {
        let endpoint = format!("{}/analyze", self.base_url);
        ::log::info!("Sending profile data to {}", endpoint);

        let mut request = self.client.post(&endpoint).json(snapshot);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: error_message(body),
            });
        }

        let body = resp.text().await?;
        let response = AnalysisResponse::from_json(&body)?;
        ::log::debug!("Analysis response: {:?}", response);
        Ok(response)
    }
}
