use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InsightError, InsightResult};
use crate::InsightConfig;
use screener_core::GroundingSource;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

/// Schema-constrained model output plus any search citations
#[derive(Debug, Clone)]
pub struct Generated<T> {
    pub value: T,
    pub grounding: Vec<GroundingSource>,
}

/// Thin client for the `generateContent` endpoint with JSON output
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: InsightConfig) -> InsightResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            api_key: config.api_key,
        })
    }

    pub fn from_env() -> InsightResult<Self> {
        Self::new(InsightConfig::from_env())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send `prompt` and parse the reply against `schema`.
    ///
    /// `grounded` enables the web search tool; citations are read from the
    /// candidate's grounding metadata.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
        grounded: bool,
    ) -> InsightResult<Generated<T>> {
        let api_key = self.api_key.as_deref().ok_or(InsightError::MissingApiKey)?;

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            tools: if grounded {
                vec![serde_json::json!({ "google_search": {} })]
            } else {
                Vec::new()
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!("Gemini request: model={}, grounded={}", self.model, grounded);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::ServiceUnavailable(format!(
                "Status: {} {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response.text().await?;
        parse_generate_response(&body)
    }
}

/// Decode a raw `generateContent` body into the schema type
pub(crate) fn parse_generate_response<T: DeserializeOwned>(
    body: &str,
) -> InsightResult<Generated<T>> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(InsightError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(InsightError::EmptyResponse);
    }

    let value = serde_json::from_str(strip_code_fence(&text))
        .map_err(|e| InsightError::InvalidResponse(e.to_string()))?;

    let grounding = candidate
        .grounding_metadata
        .map(|m| {
            m.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .filter_map(|web| {
                    web.uri.map(|uri| GroundingSource {
                        uri,
                        title: web.title,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Generated { value, grounding })
}

/// Models occasionally wrap JSON in a markdown fence despite the mime type
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}
