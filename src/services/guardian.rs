//! 安全守卫：生成模型前的安全闸门
//!
//! 将外部分类器的判定映射为处理动作。失败即关闭：
//! 无法识别的判定或分类器错误均按严重警报处理。
//! 危机响应是固定文本，从不由模型生成。

use std::sync::Arc;

use crate::classifier::SafetyClassifier;
use crate::models::safety::{GuardianLevel, GuardianResult, SafetyClassification};
use crate::observability::{PipelineTelemetry, TracingTelemetry};

/// 文本被拦截时原样展示
pub const EMERGENCY_RESPONSE: &str = "Şu anda çok zor bir dönemden geçiyor olabilirsin ve bunu \
paylaştığın için teşekkür ederim. Yalnız değilsin. Lütfen hemen profesyonel destek al: \
Acil durumlarda 112 Acil Çağrı Merkezi'ni arayabilirsin. ALO 183 Sosyal Destek Hattı \
7/24 ücretsiz olarak yanında. Güvendiğin bir yakınına da ulaşmayı unutma.";

impl GuardianResult {
    fn safe() -> Self {
        Self {
            level: GuardianLevel::Safe,
            response: None,
            is_safe_for_ai: true,
        }
    }

    fn sensitive_topic() -> Self {
        Self {
            level: GuardianLevel::SensitiveTopic,
            response: None,
            is_safe_for_ai: true,
        }
    }

    fn critical_alert() -> Self {
        Self {
            level: GuardianLevel::CriticalAlert,
            response: Some(EMERGENCY_RESPONSE.to_string()),
            is_safe_for_ai: false,
        }
    }

    /// 分类器判定到结果的转换表
    pub fn from_classification(classification: &SafetyClassification) -> Self {
        match classification {
            SafetyClassification::Level0Safe => Self::safe(),
            SafetyClassification::Level1MildConcern => Self::sensitive_topic(),
            SafetyClassification::Level2ModerateRisk
            | SafetyClassification::Level3HighAlert
            | SafetyClassification::Unrecognized(_) => Self::critical_alert(),
        }
    }
}

/// 已通过守卫、可交给模型的文本
///
/// 只能由 [`Guardian::admit`] 构造，
/// 因此以 `ClearedText` 传递文本的代码无法绕过守卫。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedText {
    text: String,
    level: GuardianLevel,
}

impl ClearedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn level(&self) -> GuardianLevel {
        self.level
    }

    pub fn into_inner(self) -> String {
        self.text
    }
}

#[derive(Clone)]
pub struct Guardian {
    classifier: Arc<dyn SafetyClassifier>,
    telemetry: Arc<dyn PipelineTelemetry>,
}

impl Guardian {
    pub fn new(classifier: Arc<dyn SafetyClassifier>) -> Self {
        Self {
            classifier,
            telemetry: Arc::new(TracingTelemetry),
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn PipelineTelemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub async fn assess_text_safety(&self, text: &str) -> GuardianResult {
        if text.trim().is_empty() {
            return GuardianResult::safe();
        }

        let result = match self.classifier.classify(text).await {
            Ok(classification) => {
                if let SafetyClassification::Unrecognized(label) = &classification {
                    tracing::warn!(label = %label, "unrecognized classifier verdict, blocking");
                }
                GuardianResult::from_classification(&classification)
            }
            Err(e) => {
                tracing::error!(error = %e, "safety classifier failed, blocking");
                GuardianResult::critical_alert()
            }
        };

        self.telemetry.guardian_verdict(result.level);
        result
    }

    /// 检查 `text`：可交给模型时返回 `Ok`，
    /// 否则返回需分发给用户的结果。
    pub async fn admit(&self, text: &str) -> std::result::Result<ClearedText, GuardianResult> {
        let result = self.assess_text_safety(text).await;
        if result.is_safe_for_ai {
            Ok(ClearedText {
                text: text.to_string(),
                level: result.level,
            })
        } else {
            Err(result)
        }
    }
}
