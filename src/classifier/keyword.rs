//! 本地开发用的关键词分类器
//!
//! 无需远程模型即可运行服务，不能替代真正的安全模型。

use async_trait::async_trait;

use super::SafetyClassifier;
use crate::error::Result;
use crate::models::safety::SafetyClassification;

pub struct KeywordSafetyClassifier {
    high_alert: Vec<String>,
    moderate_risk: Vec<String>,
    mild_concern: Vec<String>,
}

fn owned(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

impl Default for KeywordSafetyClassifier {
    fn default() -> Self {
        Self::new(
            owned(&[
                "intihar",
                "kendimi öldür",
                "yaşamak istemiyorum",
                "hayatıma son",
                "end it",
                "kill myself",
                "suicide",
            ]),
            owned(&[
                "kendime zarar",
                "kendimi kes",
                "her şey anlamsız",
                "hurt myself",
                "self harm",
            ]),
            owned(&[
                "umutsuz",
                "çaresiz",
                "tükendim",
                "panik atak",
                "hopeless",
                "worthless",
            ]),
        )
    }
}

impl KeywordSafetyClassifier {
    /// 短语按子串匹配，不区分大小写
    pub fn new(high_alert: Vec<String>, moderate_risk: Vec<String>, mild_concern: Vec<String>) -> Self {
        let lower = |phrases: Vec<String>| -> Vec<String> {
            phrases.into_iter().map(|p| p.to_lowercase()).collect()
        };
        Self {
            high_alert: lower(high_alert),
            moderate_risk: lower(moderate_risk),
            mild_concern: lower(mild_concern),
        }
    }

    fn matches(text: &str, phrases: &[String]) -> bool {
        phrases.iter().any(|phrase| text.contains(phrase.as_str()))
    }
}

#[async_trait]
impl SafetyClassifier for KeywordSafetyClassifier {
    async fn classify(&self, text: &str) -> Result<SafetyClassification> {
        let text = text.to_lowercase();

        let verdict = if Self::matches(&text, &self.high_alert) {
            SafetyClassification::Level3HighAlert
        } else if Self::matches(&text, &self.moderate_risk) {
            SafetyClassification::Level2ModerateRisk
        } else if Self::matches(&text, &self.mild_concern) {
            SafetyClassification::Level1MildConcern
        } else {
            SafetyClassification::Level0Safe
        };
        Ok(verdict)
    }
}
