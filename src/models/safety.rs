//! 安全分级数据模型
//!
//! 外部内容安全分类器给出的严重级别，
//! 以及安全守卫据此得出的结果。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 分类器判定，按严重程度排序
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SafetyClassification {
    Level0Safe,
    Level1MildConcern,
    Level2ModerateRisk,
    Level3HighAlert,
    /// 分类器返回的非四个级别之一的标签
    Unrecognized(String),
}

impl SafetyClassification {
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "level_0_safe" => Self::Level0Safe,
            "level_1_mild_concern" => Self::Level1MildConcern,
            "level_2_moderate_risk" => Self::Level2ModerateRisk,
            "level_3_high_alert" => Self::Level3HighAlert,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Level0Safe => "level_0_safe",
            Self::Level1MildConcern => "level_1_mild_concern",
            Self::Level2ModerateRisk => "level_2_moderate_risk",
            Self::Level3HighAlert => "level_3_high_alert",
            Self::Unrecognized(label) => label.as_str(),
        }
    }
}

impl fmt::Display for SafetyClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 守卫结果级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardianLevel {
    Safe,
    SensitiveTopic,
    CriticalAlert,
}

impl GuardianLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardianLevel::Safe => "safe",
            GuardianLevel::SensitiveTopic => "sensitive_topic",
            GuardianLevel::CriticalAlert => "critical_alert",
        }
    }
}

/// 交给响应分发方的结果
///
/// `is_safe_for_ai` 为 false 时，`response` 必须原样展示，
/// 且不得调用模型。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianResult {
    pub level: GuardianLevel,
    pub response: Option<String>,
    #[serde(rename = "isSafeForAI")]
    pub is_safe_for_ai: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_ordering() {
        assert!(SafetyClassification::Level0Safe < SafetyClassification::Level1MildConcern);
        assert!(SafetyClassification::Level2ModerateRisk < SafetyClassification::Level3HighAlert);
    }

    #[test]
    fn test_parse_trims_and_flags_unknown_labels() {
        assert_eq!(
            SafetyClassification::parse(" level_2_moderate_risk\n"),
            SafetyClassification::Level2ModerateRisk
        );
        assert_eq!(
            SafetyClassification::parse("LEVEL_0_SAFE"),
            SafetyClassification::Unrecognized("LEVEL_0_SAFE".into())
        );
    }

    #[test]
    fn test_guardian_result_wire_format() {
        let result = GuardianResult {
            level: GuardianLevel::SensitiveTopic,
            response: None,
            is_safe_for_ai: true,
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"level": "sensitive_topic", "response": null, "isSafeForAI": true})
        );
    }
}
