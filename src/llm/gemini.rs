use crate::llm::TextGenerator;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini generateContent API
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(api_key: String, model: Option<&str>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.unwrap_or("gemini-pro").to_string(),
            api_key,
        }
    }

    /// Override the API base URL (used by tests and proxies)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let client = reqwest::Client::new();
        let response = client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .context("Failed to connect to Gemini API")?;

        if !response.status().is_success() {
            anyhow::bail!("Gemini API returned error: {}", response.status());
        }

        let reply: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let candidate = reply
            .candidates
            .into_iter()
            .next()
            .context("Gemini response contained no candidates")?;

        let text = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            anyhow::bail!("Gemini response contained no text parts");
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_client_endpoint() {
        let client = GeminiClient::new("test-key".to_string(), None);
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_gemini_client_custom_model_and_base() {
        let client = GeminiClient::new("test-key".to_string(), Some("gemini-1.5-flash"))
            .with_base_url("http://localhost:9090/".to_string());
        assert_eq!(
            client.endpoint(),
            "http://localhost:9090/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_gemini_response_deserialization() {
        let raw = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [{"text": "[{\"name\": \"Aadhaar Card\""}, {"text": ", \"status\": \"Required\", \"description\": \"Copy of Aadhaar Card\"}]"}],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }
            ]
        }"#;

        let parsed: GeminiResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.clone())
            .collect();
        assert!(text.starts_with("[{\"name\": \"Aadhaar Card\""));
        assert!(text.ends_with("}]"));
    }

    #[tokio::test]
    #[ignore] // Requires GOOGLE_API_KEY and network access
    async fn test_gemini_generate() {
        let api_key = std::env::var("GOOGLE_API_KEY").unwrap();
        let client = GeminiClient::new(api_key, None);
        let reply = client.generate("Reply with the single word: pong").await.unwrap();
        assert!(!reply.is_empty());
    }
}
