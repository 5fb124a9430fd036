//! Ollama 内容安全分类器客户端

use async_trait::async_trait;
use serde::Deserialize;

use super::SafetyClassifier;
use crate::error::{AppError, Result};
use crate::models::safety::SafetyClassification;

const LABELLING_INSTRUCTION: &str = "You are a content-safety classifier for a mental health \
journaling app. Classify the user's text for self-harm or suicide risk. Answer with exactly one \
label and nothing else: level_0_safe, level_1_mild_concern, level_2_moderate_risk, \
level_3_high_alert.";

pub struct OllamaSafetyClassifier {
    client: reqwest::Client,
    model_name: String,
    base_url: String,
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaSafetyClassifier {
    pub fn new(base_url: &str, model_name: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            model_name: model_name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SafetyClassifier for OllamaSafetyClassifier {
    async fn classify(&self, text: &str) -> Result<SafetyClassification> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&serde_json::json!({
                "model": self.model_name,
                "system": LABELLING_INSTRUCTION,
                "prompt": text,
                "stream": false,
                "options": { "temperature": 0 }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Classifier(format!(
                "Ollama classification failed ({}): {}",
                status, error_text
            )));
        }

        let generated: OllamaGenerateResponse = response.json().await?;
        let verdict = SafetyClassification::parse(&generated.response);
        tracing::debug!(model = %self.model_name, verdict = %verdict, "classifier verdict");
        Ok(verdict)
    }
}
