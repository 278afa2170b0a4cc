//! Extraction providers — the single point of entry for all generative API
//! calls in this service.
//!
//! Two interchangeable upstreams, selected per request: Mistral chat
//! completions and Gemini generateContent. Both receive the same prompt and
//! are expected to return the same JSON shape; the difference is purely the
//! wire envelope, decoded here into one raw completion string. One request,
//! bounded timeout, zero retries: the caller gets the first answer or the
//! first error.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

const MISTRAL_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
const MISTRAL_MODEL: &str = "mistral-small-latest";
const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent";
/// Low temperature keeps the schema output stable across calls.
const TEMPERATURE: f32 = 0.2;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Mistral,
    Gemini,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Mistral => write!(f, "mistral"),
            Provider::Gemini => write!(f, "gemini"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("{provider} returned an unrecognized response envelope: {source}")]
    Decode {
        provider: Provider,
        source: serde_json::Error,
    },

    #[error("{0} returned a response with no completion text")]
    EmptyCompletion(Provider),

    #[error("no API key configured for provider {0}")]
    MissingCredential(Provider),
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::MissingCredential(_) => AppError::Configuration(e.to_string()),
            ProviderError::Api { status, body } => AppError::ExternalService { status, body },
            ProviderError::Http(inner) => AppError::ExternalService {
                status: inner.status().map(|s| s.as_u16()).unwrap_or(0),
                body: inner.to_string(),
            },
            ProviderError::Decode { .. } | ProviderError::EmptyCompletion(_) => {
                AppError::ExternalService {
                    status: 200,
                    body: e.to_string(),
                }
            }
        }
    }
}

// --- Mistral wire envelope ---

#[derive(Debug, Serialize)]
struct MistralRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MistralResponse {
    choices: Vec<MistralChoice>,
}

#[derive(Debug, Deserialize)]
struct MistralChoice {
    message: MistralMessage,
}

#[derive(Debug, Deserialize)]
struct MistralMessage {
    content: String,
}

impl MistralResponse {
    fn into_completion(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}

// --- Gemini wire envelope ---

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

impl GeminiResponse {
    fn into_completion(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .find_map(|p| p.text)
            .map(|t| t.trim().to_string())
    }
}

/// The shared client for both providers. Credentials are optional: a call to
/// a provider with no key fails with a configuration error, not a crash.
#[derive(Clone)]
pub struct ExtractionClient {
    client: Client,
    mistral_key: Option<String>,
    gemini_key: Option<String>,
}

impl ExtractionClient {
    pub fn new(mistral_key: Option<String>, gemini_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            mistral_key,
            gemini_key,
        }
    }

    /// Which providers have a credential configured.
    pub fn available(&self) -> Vec<Provider> {
        let mut out = Vec::new();
        if self.mistral_key.is_some() {
            out.push(Provider::Mistral);
        }
        if self.gemini_key.is_some() {
            out.push(Provider::Gemini);
        }
        out
    }

    /// Sends the prompt to the selected provider and returns the raw text
    /// completion.
    pub async fn complete(
        &self,
        provider: Provider,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let completion = match provider {
            Provider::Mistral => self.complete_mistral(prompt).await?,
            Provider::Gemini => self.complete_gemini(prompt).await?,
        };
        debug!(%provider, chars = completion.len(), "provider completion received");
        Ok(completion)
    }

    async fn complete_mistral(&self, prompt: &str) -> Result<String, ProviderError> {
        let key = self
            .mistral_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential(Provider::Mistral))?;

        let request_body = MistralRequest {
            model: MISTRAL_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(MISTRAL_API_URL)
            .bearer_auth(key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: MistralResponse =
            serde_json::from_str(&body).map_err(|source| ProviderError::Decode {
                provider: Provider::Mistral,
                source,
            })?;
        envelope
            .into_completion()
            .ok_or(ProviderError::EmptyCompletion(Provider::Mistral))
    }

    async fn complete_gemini(&self, prompt: &str) -> Result<String, ProviderError> {
        let key = self
            .gemini_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential(Provider::Gemini))?;

        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(GEMINI_API_URL)
            .query(&[("key", key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GeminiResponse =
            serde_json::from_str(&body).map_err(|source| ProviderError::Decode {
                provider: Provider::Gemini,
                source,
            })?;
        envelope
            .into_completion()
            .ok_or(ProviderError::EmptyCompletion(Provider::Gemini))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mistral_envelope_decodes_documented_shape() {
        let body = r#"{
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"prenom_nom\": \"A\"}"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        }"#;
        let envelope: MistralResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            envelope.into_completion().unwrap(),
            "{\"prenom_nom\": \"A\"}"
        );
    }

    #[test]
    fn test_gemini_envelope_decodes_documented_shape() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "  {\"email\": \"a@b.c\"}\n"}]}, "finishReason": "STOP"}
            ]
        }"#;
        let envelope: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.into_completion().unwrap(), "{\"email\": \"a@b.c\"}");
    }

    #[test]
    fn test_unrecognized_envelope_is_a_decode_error() {
        let err = serde_json::from_str::<MistralResponse>(r#"{"output": "something else"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_candidate_list_yields_no_completion() {
        let envelope: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(envelope.into_completion().is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_any_network_call() {
        let client = ExtractionClient::new(None, None);
        let err = client.complete(Provider::Gemini, "prompt").await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::MissingCredential(Provider::Gemini)
        ));
    }

    #[test]
    fn test_provider_selector_deserializes_lowercase() {
        let p: Provider = serde_json::from_str(r#""mistral""#).unwrap();
        assert_eq!(p, Provider::Mistral);
    }
}
