//! 安全分类器模块
//!
//! 外部内容安全模型的能力接口。本服务只定义对分类结果的处理策略，
//! 不实现分类模型本身。

pub mod keyword;
pub mod ollama;

use async_trait::async_trait;

use crate::config::config::{ClassifierBackend, GuardianConfig};
use crate::error::Result;
use crate::models::safety::SafetyClassification;

pub use keyword::KeywordSafetyClassifier;
pub use ollama::OllamaSafetyClassifier;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SafetyClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SafetyClassification>;
}

pub fn create_safety_classifier(config: &GuardianConfig) -> Result<Box<dyn SafetyClassifier>> {
    match config.backend {
        ClassifierBackend::Ollama => {
            let classifier = OllamaSafetyClassifier::new(
                &config.ollama_url,
                &config.model_name,
                config.timeout_secs,
            )?;
            Ok(Box::new(classifier))
        }
        ClassifierBackend::Keyword => Ok(Box::new(KeywordSafetyClassifier::default())),
    }
}
